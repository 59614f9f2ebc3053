//! Device-specific stages.
//!
//! Routing moves qubits so multi-qubit gates land on coupled positions;
//! translation decomposes gates into the native vocabulary.

pub mod routing;
pub mod translation;

pub use routing::{RemoveSwapBySwappingGates, SwapQubitsForAdjacency};
pub use translation::{
    CastCXToCZGate, CastISwapToCZGate, CastRxToRzAndHalfRotationX, CastSwapToCZGate,
    CastToPhaseShiftAndHalfRotationX, CastToffoliToCXGate, CastUniversalToRzRxRz,
};
