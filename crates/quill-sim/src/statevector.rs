//! Dense state vector.

use num_complex::Complex64;

use quill_ir::{Instruction, Operator, QubitId};

use crate::error::{SimError, SimResult};
use crate::kernel;

/// Largest register [`Statevector::new`] allocates (4 GiB of amplitudes).
pub const MAX_QUBITS: u32 = 28;

/// A pure state of `qubit_count` qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    qubit_count: u32,
}

impl Statevector {
    /// Create a statevector initialized to |0...0⟩.
    pub fn new(qubit_count: u32) -> SimResult<Self> {
        Self::basis_state(qubit_count, 0)
    }

    /// Create the computational basis state `index`.
    pub fn basis_state(qubit_count: u32, index: usize) -> SimResult<Self> {
        if qubit_count > MAX_QUBITS {
            return Err(SimError::RegisterTooLarge {
                qubit_count,
                max: MAX_QUBITS,
            });
        }
        let size = 1usize << qubit_count;
        if index >= size {
            return Err(SimError::BasisIndex { index, dim: size });
        }
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[index] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            qubit_count,
        })
    }

    /// Wrap an existing amplitude buffer.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        let qubit_count = kernel::buffer_qubits(&amplitudes)?;
        Ok(Self {
            amplitudes,
            qubit_count,
        })
    }

    /// Get the number of qubits.
    pub fn qubit_count(&self) -> u32 {
        self.qubit_count
    }

    /// Get the amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Consume into the amplitude buffer.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Apply an instruction. Readouts are no-ops.
    pub fn apply(&mut self, instruction: &Instruction) -> SimResult<()> {
        kernel::apply_gate(&mut self.amplitudes, instruction, self.qubit_count)
    }

    /// Apply an operator to `targets`.
    pub fn apply_operator(&mut self, operator: &Operator, targets: &[QubitId]) -> SimResult<()> {
        kernel::apply_operator(&mut self.amplitudes, operator, targets)
    }

    /// Outcome probabilities `|amplitude|²`.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.amplitudes
            .iter()
            .map(Complex64::norm_sqr)
            .sum::<f64>()
            .sqrt()
    }

    /// Bit-string label of a basis index, qubit 1 first.
    ///
    /// The single state of a 0-qubit register is labeled `""`.
    pub fn label(&self, index: usize) -> String {
        if self.qubit_count == 0 {
            return String::new();
        }
        format!("{:0width$b}", index, width = self.qubit_count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_ir::StandardGate;

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2).unwrap();
        assert_eq!(sv.qubit_count(), 2);
        assert_eq!(sv.probabilities(), vec![1.0, 0.0, 0.0, 0.0]);
        assert!((sv.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_register_limit() {
        assert!(matches!(
            Statevector::new(MAX_QUBITS + 1),
            Err(SimError::RegisterTooLarge { .. })
        ));
    }

    #[test]
    fn test_labels() {
        let sv = Statevector::new(3).unwrap();
        assert_eq!(sv.label(0), "000");
        assert_eq!(sv.label(0b100), "100");
        assert_eq!(sv.label(6), "110");

        let empty = Statevector::new(0).unwrap();
        assert_eq!(empty.amplitudes().len(), 1);
        assert_eq!(empty.label(0), "");
    }

    #[test]
    fn test_apply_keeps_norm() {
        let mut sv = Statevector::basis_state(2, 3).unwrap();
        sv.apply(&Instruction::single_qubit_gate(
            StandardGate::Universal(0.4, 1.2, -0.3),
            QubitId(2),
        ))
        .unwrap();
        sv.apply(&Instruction::two_qubit_gate(
            StandardGate::ISwap,
            QubitId(1),
            QubitId(2),
        ))
        .unwrap();
        assert!((sv.norm() - 1.0).abs() < 1e-12);
    }
}
