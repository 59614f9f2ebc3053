//! 2x2 unitary utilities for single-qubit rewrites.
//!
//! Provides the fixed-size matrix used by gate fusion, including the
//! decomposition of an arbitrary single-qubit unitary into the angles of a
//! `Universal(θ, φ, λ)` gate.

use num_complex::Complex64;
use quill_ir::{Operator, StandardGate};
use std::f64::consts::TAU;

/// A 2x2 unitary matrix in row-major order.
#[derive(Debug, Clone, Copy)]
pub struct Unitary2x2 {
    /// The matrix elements in row-major order: [[a, b], [c, d]].
    pub data: [Complex64; 4],
}

impl Unitary2x2 {
    /// Create a new 2x2 unitary matrix.
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    /// Create the identity matrix.
    pub fn identity() -> Self {
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        Self::new(one, zero, zero, one)
    }

    /// Copy a single-qubit operator.
    pub fn from_operator(operator: &Operator) -> Option<Self> {
        if operator.dim() != 2 {
            return None;
        }
        Some(Self::new(
            operator.get(0, 0),
            operator.get(0, 1),
            operator.get(1, 0),
            operator.get(1, 1),
        ))
    }

    /// The matrix of a single-qubit gate.
    pub fn from_gate(gate: &StandardGate) -> Option<Self> {
        if !gate.is_single_qubit() {
            return None;
        }
        Self::from_operator(&gate.operator())
    }

    /// Multiply this matrix by another: self * other.
    #[allow(clippy::many_single_char_names)]
    pub fn mul(&self, other: &Self) -> Self {
        let [a, b, c, d] = self.data;
        let [e, f, g, h] = other.data;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }

    /// Get the conjugate transpose (dagger).
    pub fn dagger(&self) -> Self {
        Self::new(
            self.data[0].conj(),
            self.data[2].conj(),
            self.data[1].conj(),
            self.data[3].conj(),
        )
    }

    /// Whether the off-diagonal entries vanish within `tolerance`.
    pub fn is_diagonal(&self, tolerance: f64) -> bool {
        self.data[1].norm() < tolerance && self.data[2].norm() < tolerance
    }

    /// Check if this is identity up to global phase.
    pub fn is_identity(&self, tolerance: f64) -> bool {
        let [a, _, _, d] = self.data;
        self.is_diagonal(tolerance) && (a - d).norm() < tolerance
    }

    /// Entry-wise comparison up to a global phase factor.
    pub fn equal_up_to_global_phase(&self, other: &Self, tolerance: f64) -> bool {
        // Anchor on the larger of the first column's entries.
        let k = if self.data[0].norm() >= self.data[2].norm() {
            0
        } else {
            2
        };
        if other.data[k].norm() < tolerance {
            return false;
        }
        let phase = other.data[k] / self.data[k];
        self.data
            .iter()
            .zip(&other.data)
            .all(|(a, b)| (a * phase - b).norm() < tolerance)
    }

    /// Decompose into `Universal(θ, φ, λ)` angles, dropping the global phase.
    ///
    /// The phase is removed using the argument of the top-left entry, which
    /// leaves it real and non-negative so `θ = 2·acos|U₀₀|` lies in `[0, π]`.
    /// When `sin(θ/2)` vanishes within `tolerance` the matrix is diagonal and
    /// the split between φ and λ is arbitrary; φ is then fixed to zero.
    pub fn universal_angles(&self, tolerance: f64) -> (f64, f64, f64) {
        let phase = Complex64::from_polar(1.0, -self.data[0].arg());
        let [a, b, c, d] = self.data.map(|z| z * phase);

        let theta = 2.0 * a.norm().clamp(0.0, 1.0).acos();
        if (theta / 2.0).sin() < tolerance {
            return (0.0, 0.0, d.arg());
        }
        (theta, c.arg(), (-b).arg())
    }

    /// Reduce an angle to `[0, 2π)`.
    pub fn wrap_angle(angle: f64) -> f64 {
        if !angle.is_finite() {
            return 0.0;
        }
        let wrapped = angle.rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU
        if wrapped >= TAU { 0.0 } else { wrapped }
    }
}

impl Default for Unitary2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Unitary2x2 {
    type Output = Self;

    #[allow(clippy::needless_pass_by_value)]
    fn mul(self, rhs: Self) -> Self::Output {
        Unitary2x2::mul(&self, &rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const TOL: f64 = 1e-9;

    fn gate(g: StandardGate) -> Unitary2x2 {
        Unitary2x2::from_gate(&g).unwrap()
    }

    fn roundtrip(u: Unitary2x2) {
        let (theta, phi, lambda) = u.universal_angles(TOL);
        let rebuilt = gate(StandardGate::Universal(theta, phi, lambda));
        assert!(
            u.equal_up_to_global_phase(&rebuilt, 1e-9),
            "U({theta}, {phi}, {lambda}) does not rebuild {u:?}"
        );
    }

    #[test]
    fn test_identity() {
        assert!(Unitary2x2::identity().is_identity(TOL));
        assert!(gate(StandardGate::RotationZ(2.0 * PI)).is_identity(TOL));
        assert!(!gate(StandardGate::Z).is_identity(TOL));
    }

    #[test]
    fn test_hadamard_squared() {
        let h = gate(StandardGate::Hadamard);
        assert!((h * h).is_identity(TOL));
    }

    #[test]
    fn test_pauli_squared() {
        for g in [StandardGate::X, StandardGate::Y, StandardGate::Z] {
            let m = gate(g);
            assert!((m * m).is_identity(TOL));
        }
    }

    #[test]
    fn test_universal_angles_roundtrip() {
        roundtrip(gate(StandardGate::Hadamard));
        roundtrip(gate(StandardGate::X));
        roundtrip(gate(StandardGate::Y));
        roundtrip(gate(StandardGate::Pi8));
        roundtrip(gate(StandardGate::Y90) * gate(StandardGate::Pi8Dagger));
        roundtrip(gate(StandardGate::Universal(2.5, -1.0, 0.7)));
        roundtrip(gate(StandardGate::Rotation(1.1, 0.4)) * gate(StandardGate::RotationZ(-2.2)));
    }

    #[test]
    fn test_universal_angles_degenerate() {
        let (theta, phi, lambda) = gate(StandardGate::RotationZ(0.8)).universal_angles(TOL);
        assert!(theta.abs() < TOL);
        assert_eq!(phi, 0.0);
        assert!((lambda - 0.8).abs() < TOL);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((Unitary2x2::wrap_angle(-PI / 2.0) - 1.5 * PI).abs() < TOL);
        assert!((Unitary2x2::wrap_angle(5.0 * PI) - PI).abs() < TOL);
        assert_eq!(Unitary2x2::wrap_angle(f64::NAN), 0.0);
    }

    #[test]
    fn test_dagger_is_inverse() {
        let u = gate(StandardGate::Universal(0.3, 0.2, 0.1));
        assert!((u * u.dagger()).is_identity(TOL));
    }
}
