//! Quill Circuit Intermediate Representation
//!
//! This crate provides the gate algebra and circuit container shared by the
//! Quill transpiler and simulator.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`], 1-based; qubit 1
//!   is the most significant bit of a basis-state index
//! - **Operators**: [`Operator`] unitaries in dense, diagonal or
//!   anti-diagonal storage
//! - **Gates**: [`StandardGate`], a closed set of gate kinds with canonical
//!   operators and analytic inverses, plus [`CustomGate`]
//! - **Instructions**: [`Instruction`] combining a gate or readout with its
//!   operands
//! - **Circuit**: [`QuantumCircuit`] with a validating builder API
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use quill_ir::{QuantumCircuit, QubitId};
//!
//! let mut circuit = QuantumCircuit::new(2);
//! circuit.h(QubitId(1)).unwrap();
//! circuit.cx(QubitId(1), QubitId(2)).unwrap();
//! circuit.readout_all().unwrap();
//!
//! assert_eq!(circuit.len(), 4);
//! assert_eq!(circuit.gate_counts()["readout"], 2);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Storage |
//! |------|--------|---------|
//! | `Identity`, `Z`, `Pi8`, `Z90`, `RotationZ`, `PhaseShift`, ... | 1 | diagonal |
//! | `X`, `Y` | 1 | anti-diagonal |
//! | `Hadamard`, `X90`, `Y90`, `RotationX/Y`, `Rotation`, `Universal` | 1 | dense |
//! | `ControlZ` | 2 | diagonal |
//! | `ControlX`, `Swap`, `ISwap`, `ISwapDagger` | 2 | dense |
//! | `Toffoli` | 3 | dense |
//! | `Controlled`, `Custom` | any | kernel-dependent |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod operator;
pub mod qubit;

pub use circuit::QuantumCircuit;
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, GateTag, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use operator::{DEFAULT_TOLERANCE, Operator};
pub use qubit::{ClbitId, QubitId};
