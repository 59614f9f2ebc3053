//! Circuit equivalence helpers.
//!
//! Two circuits are considered equivalent when they act identically on
//! every input state up to one global phase factor.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::debug;

use quill_ir::{IrError, Operator, QuantumCircuit};

use crate::error::SimResult;
use crate::simulator::simulate_from;
use crate::statevector::Statevector;

/// Full unitary of `circuit`, built one basis column at a time.
///
/// Column `j` is the final state when starting from basis state `j`.
/// A 0-qubit circuit has no operator and is rejected with
/// [`IrError::EmptyCircuit`].
pub fn circuit_unitary(circuit: &QuantumCircuit) -> SimResult<Operator> {
    let n = circuit.qubit_count();
    if n == 0 {
        return Err(IrError::EmptyCircuit(circuit.name().to_string()).into());
    }
    let dim = 1usize << n;
    let mut matrix = Array2::<Complex64>::zeros((dim, dim));
    for col in 0..dim {
        let state = simulate_from(circuit, Statevector::basis_state(n, col)?)?;
        matrix.column_mut(col).assign(&ndarray::ArrayView1::from(state.amplitudes()));
    }
    Ok(Operator::dense(matrix)?)
}

/// Whether two amplitude vectors agree up to a global phase.
///
/// The phase is taken from the largest amplitude of `a`.
pub fn equal_up_to_global_phase(a: &[Complex64], b: &[Complex64], tolerance: f64) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let Some(anchor) = a
        .iter()
        .enumerate()
        .max_by(|(_, x), (_, y)| x.norm_sqr().total_cmp(&y.norm_sqr()))
        .map(|(i, _)| i)
    else {
        return true;
    };
    if a[anchor].norm() < tolerance {
        return b.iter().all(|z| z.norm() < tolerance);
    }
    if b[anchor].norm() < tolerance {
        return false;
    }

    let phase = b[anchor] / a[anchor];
    let phase = phase / phase.norm();
    a.iter()
        .zip(b)
        .all(|(x, y)| (x * phase - y).norm() < tolerance)
}

/// Whether two circuits implement the same unitary up to global phase.
///
/// Circuits on different register sizes are never equivalent.
pub fn compare_circuits(
    a: &QuantumCircuit,
    b: &QuantumCircuit,
    tolerance: f64,
) -> SimResult<bool> {
    if a.qubit_count() != b.qubit_count() {
        return Ok(false);
    }
    let equal = circuit_unitary(a)?.equal_up_to_global_phase(&circuit_unitary(b)?, tolerance);
    debug!(equal, "compared circuits '{}' and '{}'", a.name(), b.name());
    Ok(equal)
}
