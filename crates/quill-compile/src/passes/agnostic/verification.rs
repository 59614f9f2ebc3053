//! Validation passes.
//!
//! These stages never rewrite anything: they return an unchanged copy of
//! the circuit or abort the pipeline with a descriptive error.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use quill_ir::{ClbitId, QuantumCircuit, QubitId, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::{PassKind, Transpiler};
use crate::target::NativeGateSet;

/// Rejects gate kinds the rewrite passes cannot decompose
/// (`Controlled` and `Custom`).
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedGatesTranspiler;

impl Transpiler for UnsupportedGatesTranspiler {
    fn name(&self) -> &'static str {
        "unsupported_gates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
        let rejected = circuit.instructions().iter().find_map(|inst| {
            inst.as_gate()
                .filter(|g| matches!(g, StandardGate::Controlled { .. } | StandardGate::Custom(_)))
        });
        if let Some(gate) = rejected {
            return Err(CompileError::UnsupportedGate {
                gate: gate.to_string(),
                pass: self.name().into(),
            });
        }
        Ok(circuit.clone())
    }
}

/// Ensures no gate acts on a qubit after that qubit has been read out.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadoutsAreFinalInstructions;

impl Transpiler for ReadoutsAreFinalInstructions {
    fn name(&self) -> &'static str {
        "readouts_are_final"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn should_run(&self, circuit: &QuantumCircuit) -> bool {
        circuit.contains_readout()
    }

    fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
        // Qubit -> position of its first readout.
        let mut read: FxHashMap<QubitId, usize> = FxHashMap::default();
        for (position, inst) in circuit.instructions().iter().enumerate() {
            if inst.is_readout() {
                for &q in &inst.qubits {
                    read.entry(q).or_insert(position);
                }
                continue;
            }
            if let Some((&qubit, &position)) = inst
                .qubits
                .iter()
                .find_map(|q| read.get_key_value(q))
            {
                return Err(CompileError::ReadoutNotFinal { qubit, position });
            }
        }
        debug!(readouts = read.len(), "readouts are final");
        Ok(circuit.clone())
    }
}

/// Ensures every classical bit is written by at most one readout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadoutsDoNotConflict;

impl Transpiler for ReadoutsDoNotConflict {
    fn name(&self) -> &'static str {
        "readouts_do_not_conflict"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn should_run(&self, circuit: &QuantumCircuit) -> bool {
        circuit.contains_readout()
    }

    fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
        let mut written: FxHashSet<ClbitId> = FxHashSet::default();
        for inst in circuit.instructions().iter().filter(|i| i.is_readout()) {
            for &clbit in &inst.clbits {
                if !written.insert(clbit) {
                    return Err(CompileError::ConflictingReadout { clbit });
                }
            }
        }
        Ok(circuit.clone())
    }
}

/// Requires at least one readout.
#[derive(Debug, Clone, Copy, Default)]
pub struct CircuitContainsAReadout;

impl Transpiler for CircuitContainsAReadout {
    fn name(&self) -> &'static str {
        "circuit_contains_a_readout"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
        if !circuit.contains_readout() {
            return Err(CompileError::MissingReadout);
        }
        Ok(circuit.clone())
    }
}

/// Checks that every gate belongs to a native gate set.
///
/// Placed last in a pipeline, this catches any rewrite that left a
/// non-native gate behind.
#[derive(Debug, Clone)]
pub struct NativeGateVerification {
    native: NativeGateSet,
}

impl NativeGateVerification {
    /// Verify against the given native set.
    pub fn new(native: NativeGateSet) -> Self {
        Self { native }
    }
}

impl Transpiler for NativeGateVerification {
    fn name(&self) -> &'static str {
        "native_gate_verification"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
        let offending = circuit
            .instructions()
            .iter()
            .filter_map(|inst| inst.as_gate())
            .find(|gate| !self.native.contains(gate));
        if let Some(gate) = offending {
            return Err(CompileError::GateNotInNativeSet {
                gate: gate.name().to_string(),
                native: self.native.gates().join(", "),
            });
        }
        Ok(circuit.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_ir::{CustomGate, Instruction, Operator};

    #[test]
    fn test_unsupported_gates() {
        let mut circuit = QuantumCircuit::new(3);
        circuit.toffoli(QubitId(1), QubitId(2), QubitId(3)).unwrap();
        assert!(UnsupportedGatesTranspiler.transpile(&circuit).is_ok());

        circuit
            .controlled(StandardGate::Hadamard, [QubitId(1)], [QubitId(2)])
            .unwrap();
        let err = UnsupportedGatesTranspiler.transpile(&circuit).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedGate { .. }));

        let custom = CustomGate::new("noop", Operator::identity(1)).unwrap();
        let mut circuit = QuantumCircuit::new(1);
        circuit
            .gate(StandardGate::Custom(custom), [QubitId(1)])
            .unwrap();
        assert!(UnsupportedGatesTranspiler.transpile(&circuit).is_err());
    }

    #[test]
    fn test_readouts_are_final() {
        let mut circuit = QuantumCircuit::new(2);
        circuit
            .h(QubitId(1))
            .unwrap()
            .readout(QubitId(1), ClbitId(1))
            .unwrap()
            .x(QubitId(2))
            .unwrap();
        assert!(ReadoutsAreFinalInstructions.transpile(&circuit).is_ok());

        circuit.cx(QubitId(2), QubitId(1)).unwrap();
        let err = ReadoutsAreFinalInstructions
            .transpile(&circuit)
            .unwrap_err();
        assert!(matches!(
            err,
            CompileError::ReadoutNotFinal {
                qubit: QubitId(1),
                position: 1
            }
        ));
    }

    #[test]
    fn test_readouts_do_not_conflict() {
        let mut circuit = QuantumCircuit::new(2);
        circuit.readout_all().unwrap();
        assert!(ReadoutsDoNotConflict.transpile(&circuit).is_ok());

        circuit
            .append(Instruction::readout(QubitId(2), ClbitId(1)))
            .unwrap();
        let err = ReadoutsDoNotConflict.transpile(&circuit).unwrap_err();
        assert!(matches!(
            err,
            CompileError::ConflictingReadout { clbit: ClbitId(1) }
        ));
    }

    #[test]
    fn test_contains_a_readout() {
        let mut circuit = QuantumCircuit::new(1);
        circuit.h(QubitId(1)).unwrap();
        assert!(matches!(
            CircuitContainsAReadout.transpile(&circuit),
            Err(CompileError::MissingReadout)
        ));
        circuit.readout_all().unwrap();
        assert!(CircuitContainsAReadout.transpile(&circuit).is_ok());
    }

    #[test]
    fn test_native_gate_verification() {
        let pass = NativeGateVerification::new(NativeGateSet::cz_phase_x90());
        let mut circuit = QuantumCircuit::new(2);
        circuit
            .x90(QubitId(1))
            .unwrap()
            .cz(QubitId(1), QubitId(2))
            .unwrap()
            .phase_shift(0.2, QubitId(2))
            .unwrap()
            .readout_all()
            .unwrap();
        assert!(pass.transpile(&circuit).is_ok());

        circuit.pop();
        circuit.pop();
        circuit.h(QubitId(1)).unwrap();
        let err = pass.transpile(&circuit).unwrap_err();
        match err {
            CompileError::GateNotInNativeSet { gate, .. } => assert_eq!(gate, "h"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
