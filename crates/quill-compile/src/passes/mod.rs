//! Built-in transpiler stages.
//!
//! Stages are organized into two categories:
//! - [`agnostic`]: stages that need no device information (fusion, angle
//!   canonicalization, validation)
//! - [`target`]: stages that rewrite towards a device (routing, native-gate
//!   decomposition)

pub mod agnostic;
pub mod target;

pub use agnostic::{
    CircuitContainsAReadout, CompressRzGates, CompressSingleQubitGates, NativeGateVerification,
    ReadoutsAreFinalInstructions, ReadoutsDoNotConflict, ScheduleOutcome, SimplifyRxGates,
    SimplifyRyGates, SimplifyRzGates, SimplifyTrivialGates, UnsupportedGatesTranspiler,
    schedule_blocks,
};
pub use target::{
    CastCXToCZGate, CastISwapToCZGate, CastRxToRzAndHalfRotationX, CastSwapToCZGate,
    CastToPhaseShiftAndHalfRotationX, CastToffoliToCXGate, CastUniversalToRzRxRz,
    RemoveSwapBySwappingGates, SwapQubitsForAdjacency,
};
