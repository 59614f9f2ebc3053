//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur in IR operations.
///
/// Every variant here belongs to the validation class: the caller handed
/// the IR something it cannot represent.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit index outside `[1, qubit_count]`.
    #[error(
        "Qubit {qubit} is out of range for a {qubit_count}-qubit circuit{}",
        format_gate_context(.gate_name)
    )]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Number of qubits in the circuit.
        qubit_count: u32,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Classical bit index outside `[1, bit_count]`.
    #[error("Classical bit {clbit} is out of range for a circuit with {bit_count} bits")]
    ClbitOutOfRange {
        /// The offending classical bit.
        clbit: ClbitId,
        /// Number of classical bits in the circuit.
        bit_count: u32,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate requires different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Matrix is not a valid operator.
    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    /// The instruction has no inverse.
    #[error("Inverse is not implemented for '{0}'")]
    InverseNotImplemented(String),

    /// Operation needs at least one qubit.
    #[error("Circuit '{0}' has no qubits")]
    EmptyCircuit(String),

    /// Two circuits do not share a register size.
    #[error("Circuit register mismatch: expected {expected} qubits, got {got}")]
    RegisterMismatch {
        /// Qubit count of the receiving circuit.
        expected: u32,
        /// Qubit count of the appended circuit.
        got: u32,
    },
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
