//! Error types for the simulator.

use quill_ir::QubitId;
use thiserror::Error;

/// Errors that can occur during simulation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Target qubit outside the register.
    #[error("Qubit {qubit} is outside a register of {qubit_count} qubits")]
    Domain {
        /// The offending target.
        qubit: QubitId,
        /// Register size.
        qubit_count: u32,
    },

    /// A qubit appears twice in one target list.
    #[error("Qubit {qubit} is targeted twice")]
    DuplicateTarget {
        /// The repeated target.
        qubit: QubitId,
    },

    /// Operator size does not match the number of targets.
    #[error("Operator acts on {operator_qubits} qubits but {targets} targets were given")]
    OperatorShape {
        /// Qubits the operator acts on.
        operator_qubits: u32,
        /// Number of targets supplied.
        targets: usize,
    },

    /// Amplitude buffer length is not a power of two.
    #[error("Amplitude buffer of length {0} is not a power of two")]
    BufferShape(usize),

    /// Basis index outside the state space.
    #[error("Basis index {index} is outside a state space of dimension {dim}")]
    BasisIndex {
        /// Requested index.
        index: usize,
        /// State-space dimension.
        dim: usize,
    },

    /// Register too large to allocate.
    #[error("Register of {qubit_count} qubits exceeds the limit of {max}")]
    RegisterTooLarge {
        /// Requested register size.
        qubit_count: u32,
        /// Largest supported register.
        max: u32,
    },

    /// Sampling weights were rejected.
    #[error("Cannot sample from state: {0}")]
    Sampling(String),

    /// IR error.
    #[error("IR error: {0}")]
    Ir(#[from] quill_ir::IrError),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
