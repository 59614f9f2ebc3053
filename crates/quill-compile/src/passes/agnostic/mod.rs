//! Device-independent stages.
//!
//! These stages never consult a connectivity or native gate set, apart from
//! [`NativeGateVerification`] which only reads one.

pub mod optimization;
pub mod scheduler;
pub mod simplify;
pub mod verification;

pub use optimization::{CompressRzGates, CompressSingleQubitGates};
pub use scheduler::{ScheduleOutcome, schedule_blocks};
pub use simplify::{SimplifyRxGates, SimplifyRyGates, SimplifyRzGates, SimplifyTrivialGates};
pub use verification::{
    CircuitContainsAReadout, NativeGateVerification, ReadoutsAreFinalInstructions,
    ReadoutsDoNotConflict, UnsupportedGatesTranspiler,
};
