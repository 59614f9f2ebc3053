//! Bit-mask kernels applying operators to an amplitude buffer.
//!
//! The buffer holds `2^n` amplitudes. Qubit `q` (1-based) owns bit
//! `n - q` of a basis index, so qubit 1 is the most significant bit. An
//! operator acting on targets `[t0, t1, ..]` reads `t0` as the most
//! significant bit of its own row/column index.
//!
//! Four kernels are dispatched on the operator's storage:
//!
//! | Storage | Kernel |
//! |---------|--------|
//! | 2×2 dense | [`apply_single_dense`]: pair indices differing in one bit |
//! | dense, k > 1 targets | [`apply_multi_dense`]: gather / multiply / scatter |
//! | diagonal | [`apply_diagonal`]: scale each amplitude |
//! | 2×2 anti-diagonal | [`apply_anti_diagonal`]: scaled swap of pairs |

use ndarray::Array2;
use num_complex::Complex64;
use rustc_hash::FxHashSet;

use quill_ir::{Instruction, InstructionKind, Operator, QubitId};

use crate::error::{SimError, SimResult};

/// Number of qubits a buffer holds.
pub fn buffer_qubits(buffer: &[Complex64]) -> SimResult<u32> {
    if buffer.is_empty() || !buffer.len().is_power_of_two() {
        return Err(SimError::BufferShape(buffer.len()));
    }
    Ok(buffer.len().trailing_zeros())
}

/// Apply `operator` to `targets` of `buffer` in place.
pub fn apply_operator(
    buffer: &mut [Complex64],
    operator: &Operator,
    targets: &[QubitId],
) -> SimResult<()> {
    let qubit_count = buffer_qubits(buffer)?;
    validate_targets(targets, qubit_count)?;
    if operator.num_qubits() as usize != targets.len() {
        return Err(SimError::OperatorShape {
            operator_qubits: operator.num_qubits(),
            targets: targets.len(),
        });
    }

    let positions: Vec<u32> = targets
        .iter()
        .map(|q| q.bit_position(qubit_count))
        .collect();

    match operator {
        Operator::Diagonal(entries) => apply_diagonal(buffer, entries, &positions),
        Operator::AntiDiagonal { upper, lower } => {
            apply_anti_diagonal(buffer, *upper, *lower, positions[0]);
        }
        Operator::Dense(matrix) if positions.len() == 1 => {
            let m = [matrix[[0, 0]], matrix[[0, 1]], matrix[[1, 0]], matrix[[1, 1]]];
            apply_single_dense(buffer, &m, positions[0]);
        }
        Operator::Dense(matrix) => apply_multi_dense(buffer, matrix, &positions),
    }
    Ok(())
}

/// Apply one instruction to a buffer of `qubit_count` qubits.
///
/// Readouts leave the buffer unchanged.
pub fn apply_gate(
    buffer: &mut [Complex64],
    instruction: &Instruction,
    qubit_count: u32,
) -> SimResult<()> {
    let InstructionKind::Gate(gate) = &instruction.kind else {
        return Ok(());
    };
    validate_targets(&instruction.qubits, qubit_count)?;
    apply_operator(buffer, &gate.operator(), &instruction.qubits)
}

fn validate_targets(targets: &[QubitId], qubit_count: u32) -> SimResult<()> {
    let mut seen = FxHashSet::default();
    for &qubit in targets {
        if qubit.0 == 0 || qubit.0 > qubit_count {
            return Err(SimError::Domain { qubit, qubit_count });
        }
        if !seen.insert(qubit) {
            return Err(SimError::DuplicateTarget { qubit });
        }
    }
    Ok(())
}

/// Insert a zero bit at `position` of `index`.
#[inline]
fn insert_zero_bit(index: usize, position: u32) -> usize {
    let low = index & ((1 << position) - 1);
    ((index >> position) << (position + 1)) | low
}

/// In-place 2×2 multiply on every pair of indices that differ only in bit
/// `position`. `m` is row-major.
pub fn apply_single_dense(buffer: &mut [Complex64], m: &[Complex64; 4], position: u32) {
    let bit = 1usize << position;
    for i in 0..buffer.len() / 2 {
        let i0 = insert_zero_bit(i, position);
        let i1 = i0 | bit;
        let (a0, a1) = (buffer[i0], buffer[i1]);
        buffer[i0] = m[0] * a0 + m[1] * a1;
        buffer[i1] = m[2] * a0 + m[3] * a1;
    }
}

/// Dense operator on several targets.
///
/// `positions[0]` is the most significant bit of the operator index. The
/// buffer is walked once per `2^k` block: each block's amplitudes are
/// gathered through a precomputed offset table, multiplied and scattered
/// back.
pub fn apply_multi_dense(buffer: &mut [Complex64], matrix: &Array2<Complex64>, positions: &[u32]) {
    let k = positions.len();
    let block = 1usize << k;

    // offsets[l] = buffer offset of local index l.
    let offsets: Vec<usize> = (0..block)
        .map(|local| {
            positions
                .iter()
                .enumerate()
                .filter(|&(t, _)| (local >> (k - 1 - t)) & 1 == 1)
                .map(|(_, &p)| 1usize << p)
                .sum()
        })
        .collect();

    let mut sorted = positions.to_vec();
    sorted.sort_unstable();

    let mut scratch = vec![Complex64::new(0.0, 0.0); block];
    for i in 0..buffer.len() >> k {
        let base = sorted
            .iter()
            .fold(i, |index, &p| insert_zero_bit(index, p));

        for (s, &off) in scratch.iter_mut().zip(&offsets) {
            *s = buffer[base + off];
        }
        for (row, &off) in offsets.iter().enumerate() {
            buffer[base + off] = matrix
                .row(row)
                .iter()
                .zip(&scratch)
                .map(|(m, a)| m * a)
                .sum();
        }
    }
}

/// Scale every amplitude by the diagonal entry selected by its target bits.
pub fn apply_diagonal(buffer: &mut [Complex64], entries: &[Complex64], positions: &[u32]) {
    let k = positions.len();
    let local = |index: usize| {
        positions
            .iter()
            .enumerate()
            .fold(0usize, |acc, (t, &p)| acc | (((index >> p) & 1) << (k - 1 - t)))
    };

    // Lowest-order qubit among the targets: neighbouring amplitudes share
    // every other target bit, so one lookup serves the pair.
    if let Some(t) = positions.iter().position(|&p| p == 0) {
        let low = 1usize << (k - 1 - t);
        for (i, pair) in buffer.chunks_exact_mut(2).enumerate() {
            let even = local(i << 1);
            pair[0] *= entries[even];
            pair[1] *= entries[even | low];
        }
        return;
    }

    for (index, amp) in buffer.iter_mut().enumerate() {
        *amp *= entries[local(index)];
    }
}

/// `[[0, upper], [lower, 0]]` on bit `position`.
pub fn apply_anti_diagonal(
    buffer: &mut [Complex64],
    upper: Complex64,
    lower: Complex64,
    position: u32,
) {
    let bit = 1usize << position;
    for i in 0..buffer.len() / 2 {
        let i0 = insert_zero_bit(i, position);
        let i1 = i0 | bit;
        let (a0, a1) = (buffer[i0], buffer[i1]);
        buffer[i0] = upper * a1;
        buffer[i1] = lower * a0;
    }
}
