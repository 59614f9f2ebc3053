//! Quill Transpiler Pipeline
//!
//! This crate rewrites [`quill_ir::QuantumCircuit`]s into forms a target
//! device can execute. Every rewrite is a stage implementing [`Transpiler`]:
//! a pure function from circuit to circuit that preserves the circuit's
//! action up to global phase.
//!
//! # Overview
//!
//! The standard native pipeline built by [`TranspilerBuilder`]:
//! 1. **Validation**: reject unsupported gates and misplaced readouts
//! 2. **Routing**: insert `Swap` conveyors so multi-qubit gates act on
//!    coupled qubits
//! 3. **Two-qubit lowering**: Toffoli, iSWAP, Swap and CX to CZ networks
//! 4. **Single-qubit lowering**: fuse runs into `Universal`, re-express with
//!    `X90` pulses and phase gates, canonicalize angles
//! 5. **Verification**: every gate is in the target's native set
//!
//! ```text
//! Input Circuit
//!       │
//!       ▼
//! ┌──────────────────────┐
//! │ SequentialTranspiler │ ◄── Target (connectivity, native gates)
//! └──────────────────────┘
//!       │
//!       ├── UnsupportedGates / ReadoutsAreFinal / ReadoutsDoNotConflict
//!       ├── CastToffoliToCX ── SwapQubitsForAdjacency
//!       ├── CastISwapToCZ / CastSwapToCZ / CastCXToCZ
//!       ├── CompressSingleQubitGates ── CastUniversalToRzRxRz
//!       ├── SimplifyRx ── CastRxToRzAndHalfRotationX
//!       ├── CompressRzGates / Simplify*
//!       └── NativeGateVerification
//!       │
//!       ▼
//! Output Circuit (native)
//! ```
//!
//! # Example
//!
//! ```rust
//! use quill_compile::{Connectivity, NativeGateSet, Target, TranspilerBuilder, transpile};
//! use quill_ir::{QuantumCircuit, QubitId};
//!
//! let mut circuit = QuantumCircuit::new(3);
//! circuit.h(QubitId(1)).unwrap().cx(QubitId(1), QubitId(3)).unwrap();
//!
//! let target = Target::new(Connectivity::line(3), NativeGateSet::cz_phase_x90());
//! let pipeline = TranspilerBuilder::new().with_target(target.clone()).build();
//!
//! let native = transpile(&pipeline, &circuit).unwrap();
//! assert!(native
//!     .instructions()
//!     .iter()
//!     .filter_map(|i| i.as_gate())
//!     .all(|g| target.native_gates.contains(g)));
//! ```
//!
//! # Custom Stages
//!
//! Implement the [`Transpiler`] trait:
//!
//! ```rust
//! use quill_compile::{CompileResult, PassKind, Transpiler};
//! use quill_ir::QuantumCircuit;
//!
//! struct DropEverything;
//!
//! impl Transpiler for DropEverything {
//!     fn name(&self) -> &str { "drop_everything" }
//!     fn kind(&self) -> PassKind { PassKind::Transformation }
//!
//!     fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
//!         Ok(circuit.empty_like())
//!     }
//! }
//! ```

pub mod connectivity;
pub mod error;
pub mod manager;
pub mod pass;
pub mod target;
pub mod unitary;

// Built-in stages
pub mod passes;

pub use connectivity::{
    Connectivity, LatticeConnectivity, LatticeRow, LineConnectivity, path_search,
};
pub use error::{CompileError, CompileResult};
pub use manager::{SequentialTranspiler, TranspilerBuilder, transpile};
pub use pass::{PassKind, Transpiler};
pub use target::{NativeGateSet, Target};
pub use unitary::Unitary2x2;
