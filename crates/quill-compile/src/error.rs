//! Error types for the compile crate.

use quill_ir::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur during transpilation.
///
/// Any error aborts the pipeline at the offending instruction; stages never
/// return a partially rewritten circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// IR error while building the rewritten circuit.
    #[error("IR error: {0}")]
    Ir(#[from] quill_ir::IrError),

    /// A gate follows a readout.
    #[error("Readout of qubit {qubit} at instruction {position} is followed by a gate")]
    ReadoutNotFinal {
        /// Qubit read by the offending readout.
        qubit: QubitId,
        /// Index of the readout in the instruction list.
        position: usize,
    },

    /// Two readouts write the same classical bit.
    #[error("Classical bit {clbit} is written by more than one readout")]
    ConflictingReadout {
        /// The contested classical bit.
        clbit: ClbitId,
    },

    /// The circuit contains no readout.
    #[error("Circuit contains no readout")]
    MissingReadout,

    /// Gate kind is not supported by the pipeline.
    #[error("Gate '{gate}' is not supported by {pass}")]
    UnsupportedGate {
        /// Name of the gate.
        gate: String,
        /// Stage that rejected it.
        pass: String,
    },

    /// Gate is not in the target's native set.
    #[error("Gate '{gate}' is not in the native gate set [{native}]")]
    GateNotInNativeSet {
        /// Name of the gate.
        gate: String,
        /// Comma-separated native set.
        native: String,
    },

    /// Operation is not available on this connectivity.
    #[error("Operation '{operation}' is not supported on {connectivity} connectivity")]
    UnsupportedConnectivity {
        /// Requested operation.
        operation: String,
        /// Connectivity kind.
        connectivity: String,
    },

    /// No path exists between two qubits.
    #[error("Routing failed: no path from {origin} to {target}")]
    RoutingFailed {
        /// Start of the requested path.
        origin: QubitId,
        /// End of the requested path.
        target: QubitId,
    },

    /// Qubit does not exist (or is excluded) on the connectivity.
    #[error("Qubit {qubit} is not part of the connectivity")]
    QubitNotInConnectivity {
        /// The offending qubit.
        qubit: QubitId,
    },

    /// A rewrite did not reproduce the operator it replaced.
    #[error("Numeric consistency check failed in {pass}: {detail}")]
    NumericConsistency {
        /// Stage whose reconstruction check failed.
        pass: String,
        /// Description of the mismatch.
        detail: String,
    },

    /// The block scheduler exceeded its round bound.
    #[error("Block scheduler made no progress after {rounds} rounds")]
    SchedulerStalled {
        /// Rounds executed before giving up.
        rounds: usize,
    },

    /// Target description could not be loaded.
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
