//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::qubit::{ClbitId, QubitId};

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A unitary gate.
    Gate(StandardGate),
    /// Terminal readout of one qubit into one classical bit.
    Readout,
}

/// A complete instruction with operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubits this instruction operates on, in gate order.
    pub qubits: Vec<QubitId>,
    /// Destination classical bits (readouts only).
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate),
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Create a readout instruction.
    pub fn readout(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Readout,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a readout.
    pub fn is_readout(&self) -> bool {
        matches!(self.kind, InstructionKind::Readout)
    }

    /// Get the gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&StandardGate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            InstructionKind::Readout => None,
        }
    }

    /// Whether this instruction is a gate on exactly one qubit.
    pub fn is_single_qubit_gate(&self) -> bool {
        self.as_gate().is_some_and(|g| g.is_single_qubit())
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Readout => "readout",
        }
    }

    /// Same instruction acting on different qubits.
    #[must_use]
    pub fn with_qubits(&self, qubits: Vec<QubitId>) -> Self {
        Self {
            kind: self.kind.clone(),
            qubits,
            clbits: self.clbits.clone(),
        }
    }

    /// The inverse instruction. Readouts have none.
    pub fn inverse(&self) -> IrResult<Self> {
        match &self.kind {
            InstructionKind::Gate(g) => Ok(Self::gate(g.inverse()?, self.qubits.iter().copied())),
            InstructionKind::Readout => Err(IrError::InverseNotImplemented("readout".into())),
        }
    }
}
