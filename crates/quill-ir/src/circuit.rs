//! Circuit container and builder API.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// A quantum circuit over a fixed-size register.
///
/// Instructions are validated when appended, so every target lies in
/// `[1, qubit_count]` and every destination bit in `[1, bit_count]`.
/// Transpiler passes never mutate a circuit; they build a new one.
///
/// Deserialization replays every instruction through the same validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQuantumCircuit")]
pub struct QuantumCircuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits in the register.
    qubit_count: u32,
    /// Number of classical bits.
    bit_count: u32,
    /// Ordered instruction list.
    instructions: Vec<Instruction>,
}

/// Unvalidated wire form of [`QuantumCircuit`].
#[derive(Deserialize)]
struct RawQuantumCircuit {
    name: String,
    qubit_count: u32,
    bit_count: u32,
    instructions: Vec<Instruction>,
}

impl TryFrom<RawQuantumCircuit> for QuantumCircuit {
    type Error = IrError;

    fn try_from(raw: RawQuantumCircuit) -> IrResult<Self> {
        Self::from_instructions(raw.name, raw.qubit_count, raw.bit_count, raw.instructions)
    }
}

impl QuantumCircuit {
    /// Create an empty circuit with as many classical bits as qubits.
    pub fn new(qubit_count: u32) -> Self {
        Self::with_size("circuit", qubit_count, qubit_count)
    }

    /// Create an empty named circuit with explicit register sizes.
    pub fn with_size(name: impl Into<String>, qubit_count: u32, bit_count: u32) -> Self {
        Self {
            name: name.into(),
            qubit_count,
            bit_count,
            instructions: vec![],
        }
    }

    /// An empty circuit with the same name and register sizes.
    pub fn empty_like(&self) -> Self {
        Self::with_size(self.name.clone(), self.qubit_count, self.bit_count)
    }

    /// Build a circuit from an instruction list, validating each entry.
    pub fn from_instructions(
        name: impl Into<String>,
        qubit_count: u32,
        bit_count: u32,
        instructions: impl IntoIterator<Item = Instruction>,
    ) -> IrResult<Self> {
        let mut circuit = Self::with_size(name, qubit_count, bit_count);
        for instruction in instructions {
            circuit.append(instruction)?;
        }
        Ok(circuit)
    }

    /// Append an instruction after validating its operands.
    pub fn append(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    /// Append every instruction of `other`.
    ///
    /// `other` must not use a larger register than `self`.
    pub fn append_circuit(&mut self, other: &QuantumCircuit) -> IrResult<&mut Self> {
        if other.qubit_count > self.qubit_count {
            return Err(IrError::RegisterMismatch {
                expected: self.qubit_count,
                got: other.qubit_count,
            });
        }
        for instruction in &other.instructions {
            self.append(instruction.clone())?;
        }
        Ok(self)
    }

    /// Remove and return the last instruction.
    pub fn pop(&mut self) -> Option<Instruction> {
        self.instructions.pop()
    }

    /// A new circuit with the instructions reversed and each inverted.
    ///
    /// Fails when the circuit contains a readout or a non-invertible gate.
    pub fn inverse(&self) -> IrResult<Self> {
        let mut inverse = self.empty_like();
        for instruction in self.instructions.iter().rev() {
            inverse.instructions.push(instruction.inverse()?);
        }
        Ok(inverse)
    }

    /// Tally instructions by symbol.
    pub fn gate_counts(&self) -> FxHashMap<&'static str, usize> {
        let mut counts = FxHashMap::default();
        for instruction in &self.instructions {
            let symbol = match &instruction.kind {
                InstructionKind::Gate(g) => g.tag().symbol(),
                InstructionKind::Readout => "readout",
            };
            *counts.entry(symbol).or_insert(0) += 1;
        }
        counts
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let gate_name = || Some(instruction.name().to_string());

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if qubit.0 == 0 || qubit.0 > self.qubit_count {
                return Err(IrError::QubitOutOfRange {
                    qubit,
                    qubit_count: self.qubit_count,
                    gate_name: gate_name(),
                });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name(),
                });
            }
        }

        let expected = match &instruction.kind {
            InstructionKind::Gate(g) => g.num_qubits(),
            InstructionKind::Readout => {
                if instruction.clbits.len() != 1 {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: "readout".into(),
                        expected: 1,
                        got: instruction.clbits.len() as u32,
                    });
                }
                1
            }
        };
        if instruction.qubits.len() as u32 != expected {
            return Err(IrError::QubitCountMismatch {
                gate_name: instruction.name().to_string(),
                expected,
                got: instruction.qubits.len() as u32,
            });
        }

        for &clbit in &instruction.clbits {
            if clbit.0 == 0 || clbit.0 > self.bit_count {
                return Err(IrError::ClbitOutOfRange {
                    clbit,
                    bit_count: self.bit_count,
                });
            }
        }
        Ok(())
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    fn single(&mut self, gate: StandardGate, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(gate, qubit))
    }

    /// Apply identity gate.
    pub fn id(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Identity, qubit)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::X, qubit)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Y, qubit)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Z, qubit)
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Hadamard, qubit)
    }

    /// Apply π/8 gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Pi8, qubit)
    }

    /// Apply inverse π/8 gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Pi8Dagger, qubit)
    }

    /// Apply X90 gate.
    pub fn x90(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::X90, qubit)
    }

    /// Apply XM90 gate.
    pub fn xm90(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::XM90, qubit)
    }

    /// Apply Y90 gate.
    pub fn y90(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Y90, qubit)
    }

    /// Apply YM90 gate.
    pub fn ym90(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::YM90, qubit)
    }

    /// Apply Z90 gate.
    pub fn z90(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Z90, qubit)
    }

    /// Apply ZM90 gate.
    pub fn zm90(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::ZM90, qubit)
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::RotationX(theta), qubit)
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::RotationY(theta), qubit)
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::RotationZ(theta), qubit)
    }

    /// Apply equatorial-axis rotation gate.
    pub fn r(&mut self, theta: f64, phi: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Rotation(theta, phi), qubit)
    }

    /// Apply phase shift gate.
    pub fn phase_shift(&mut self, phi: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::PhaseShift(phi), qubit)
    }

    /// Apply universal U gate.
    pub fn u(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Universal(theta, phi, lambda), qubit)
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(
            StandardGate::ControlX,
            control,
            target,
        ))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(
            StandardGate::ControlZ,
            control,
            target,
        ))
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))
    }

    /// Apply iSWAP gate.
    pub fn iswap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::ISwap, q1, q2))
    }

    /// Apply inverse iSWAP gate.
    pub fn iswap_dg(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(
            StandardGate::ISwapDagger,
            q1,
            q2,
        ))
    }

    /// Apply Toffoli (CCX) gate.
    pub fn toffoli(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::gate(StandardGate::Toffoli, [c1, c2, target]))
    }

    /// Apply `kernel` controlled on `controls`, acting on `targets`.
    pub fn controlled(
        &mut self,
        kernel: StandardGate,
        controls: impl IntoIterator<Item = QubitId>,
        targets: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        let mut qubits: Vec<QubitId> = controls.into_iter().collect();
        let num_controls = qubits.len() as u32;
        qubits.extend(targets);
        self.append(Instruction::gate(
            StandardGate::controlled(kernel, num_controls),
            qubits,
        ))
    }

    /// Apply an arbitrary gate.
    pub fn gate(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.append(Instruction::gate(gate, qubits))
    }

    // =========================================================================
    // Readouts
    // =========================================================================

    /// Read a qubit into a classical bit.
    pub fn readout(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.append(Instruction::readout(qubit, clbit))
    }

    /// Read every qubit `q` into classical bit `q`.
    pub fn readout_all(&mut self) -> IrResult<&mut Self> {
        for q in 1..=self.qubit_count {
            self.readout(QubitId(q), ClbitId(q))?;
        }
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn qubit_count(&self) -> u32 {
        self.qubit_count
    }

    /// Get the number of classical bits.
    pub fn bit_count(&self) -> u32 {
        self.bit_count
    }

    /// Get the instruction list.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Consume the circuit and return its instructions.
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the circuit has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Whether any instruction is a readout.
    pub fn contains_readout(&self) -> bool {
        self.instructions.iter().any(Instruction::is_readout)
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2);
        circuit
            .h(QubitId(1))?
            .cx(QubitId(1), QubitId(2))?
            .readout_all()?;
        Ok(circuit)
    }

    /// Create a GHZ state circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::with_size("ghz", n, n);
        if n == 0 {
            return Ok(circuit);
        }

        circuit.h(QubitId(1))?;
        for q in 1..n {
            circuit.cx(QubitId(q), QubitId(q + 1))?;
        }
        circuit.readout_all()?;
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_new_circuit() {
        let circuit = QuantumCircuit::new(3);
        assert_eq!(circuit.name(), "circuit");
        assert_eq!(circuit.qubit_count(), 3);
        assert_eq!(circuit.bit_count(), 3);
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_append_validates_range() {
        let mut circuit = QuantumCircuit::new(2);
        assert!(matches!(
            circuit.h(QubitId(3)),
            Err(IrError::QubitOutOfRange { qubit: QubitId(3), qubit_count: 2, .. })
        ));
        assert!(matches!(
            circuit.h(QubitId(0)),
            Err(IrError::QubitOutOfRange { .. })
        ));
        assert!(matches!(
            circuit.readout(QubitId(1), ClbitId(5)),
            Err(IrError::ClbitOutOfRange { .. })
        ));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_append_validates_uniqueness_and_arity() {
        let mut circuit = QuantumCircuit::new(3);
        assert!(matches!(
            circuit.cx(QubitId(1), QubitId(1)),
            Err(IrError::DuplicateQubit { .. })
        ));
        assert!(matches!(
            circuit.gate(StandardGate::Toffoli, [QubitId(1), QubitId(2)]),
            Err(IrError::QubitCountMismatch { expected: 3, got: 2, .. })
        ));
    }

    #[test]
    fn test_pop() {
        let mut circuit = QuantumCircuit::new(1);
        circuit.h(QubitId(1)).unwrap().x(QubitId(1)).unwrap();
        let last = circuit.pop().unwrap();
        assert_eq!(last.as_gate(), Some(&StandardGate::X));
        assert_eq!(circuit.len(), 1);
    }

    #[test]
    fn test_inverse_reverses_and_inverts() {
        let mut circuit = QuantumCircuit::new(2);
        circuit
            .t(QubitId(1))
            .unwrap()
            .cx(QubitId(1), QubitId(2))
            .unwrap()
            .u(0.1, 0.2, 0.3, QubitId(2))
            .unwrap();

        let inverse = circuit.inverse().unwrap();
        let gates: Vec<_> = inverse
            .instructions()
            .iter()
            .map(|i| i.as_gate().unwrap().clone())
            .collect();
        assert_eq!(
            gates,
            vec![
                StandardGate::Universal(-0.1, -0.3, -0.2),
                StandardGate::ControlX,
                StandardGate::Pi8Dagger,
            ]
        );
        assert_eq!(inverse.inverse().unwrap(), circuit);
    }

    #[test]
    fn test_inverse_rejects_readout() {
        let circuit = QuantumCircuit::bell().unwrap();
        assert!(matches!(
            circuit.inverse(),
            Err(IrError::InverseNotImplemented(_))
        ));
    }

    #[test]
    fn test_gate_counts() {
        let circuit = QuantumCircuit::ghz(4).unwrap();
        let counts = circuit.gate_counts();
        assert_eq!(counts["h"], 1);
        assert_eq!(counts["cx"], 3);
        assert_eq!(counts["readout"], 4);
    }

    #[test]
    fn test_append_circuit() {
        let mut small = QuantumCircuit::new(1);
        small.rx(PI, QubitId(1)).unwrap();
        let mut big = QuantumCircuit::new(2);
        big.append_circuit(&small).unwrap();
        assert_eq!(big.len(), 1);

        assert!(matches!(
            small.append_circuit(&big),
            Err(IrError::RegisterMismatch { expected: 1, got: 2 })
        ));
    }

    #[test]
    fn test_controlled_builder() {
        let mut circuit = QuantumCircuit::new(3);
        circuit
            .controlled(StandardGate::Hadamard, [QubitId(1), QubitId(2)], [QubitId(3)])
            .unwrap();
        let gate = circuit.instructions()[0].as_gate().unwrap();
        assert_eq!(gate.num_qubits(), 3);
        assert!(!circuit.contains_readout());
    }

    #[test]
    fn test_serde_roundtrip() {
        let circuit = QuantumCircuit::bell().unwrap();
        let json = serde_json::to_string(&circuit).unwrap();
        let back: QuantumCircuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }

    #[test]
    fn test_deserialize_validates_instructions() {
        let mut circuit = QuantumCircuit::new(5);
        circuit.h(QubitId(5)).unwrap();
        let mut value = serde_json::to_value(&circuit).unwrap();

        value["qubit_count"] = serde_json::json!(2);
        let err = serde_json::from_value::<QuantumCircuit>(value.clone()).unwrap_err();
        assert!(err.to_string().contains("out of range"), "{err}");

        value["qubit_count"] = serde_json::json!(5);
        value["instructions"][0]["qubits"] = serde_json::json!([5, 4]);
        assert!(serde_json::from_value::<QuantumCircuit>(value.clone()).is_err());

        value["instructions"][0]["qubits"] = serde_json::json!([5]);
        let back: QuantumCircuit = serde_json::from_value(value).unwrap();
        assert_eq!(back, circuit);
    }
}
