//! Quill State-Vector Simulator
//!
//! Exact, deterministic simulation of [`quill_ir::QuantumCircuit`]s on a
//! dense amplitude buffer. Qubit 1 is the most significant bit of a basis
//! index, so the amplitude of `|q1 q2 … qn⟩` sits at the binary number
//! `q1 q2 … qn`.
//!
//! # Features
//!
//! - **Bit-mask kernels**: specialized loops for single-target dense,
//!   multi-target dense, diagonal and anti-diagonal operators
//! - **Shot sampling**: weighted draws from `|amplitude|²` with an optional
//!   caller-supplied RNG
//! - **Equivalence checks**: full circuit unitaries and comparison up to
//!   global phase
//!
//! # Memory
//!
//! | Qubits | Memory |
//! |--------|--------|
//! | 10 | 16 KiB |
//! | 20 | 16 MiB |
//! | 28 | 4 GiB (limit) |
//!
//! # Example
//!
//! ```
//! use quill_ir::QuantumCircuit;
//! use quill_sim::{simulate, simulate_shots};
//!
//! let bell = QuantumCircuit::bell().unwrap();
//! let state = simulate(&bell).unwrap();
//! assert!((state.probabilities()[0b11] - 0.5).abs() < 1e-12);
//!
//! let shots = simulate_shots(&bell, 100).unwrap();
//! assert!(shots.iter().all(|s| s == "00" || s == "11"));
//! ```

pub mod equivalence;
pub mod error;
pub mod kernel;
pub mod simulator;
pub mod statevector;

pub use equivalence::{circuit_unitary, compare_circuits, equal_up_to_global_phase};
pub use error::{SimError, SimResult};
pub use kernel::{apply_gate, apply_operator};
pub use simulator::{counts, simulate, simulate_from, simulate_shots, simulate_shots_with_rng};
pub use statevector::{MAX_QUBITS, Statevector};
