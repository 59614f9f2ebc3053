//! Unitary operators in dense, diagonal and anti-diagonal storage.
//!
//! Gates map to an [`Operator`] through a pure function. The storage
//! specialization is chosen per gate kind so the simulation kernel can pick
//! a cheaper bit-mask algorithm: diagonal operators never pair amplitudes,
//! anti-diagonal ones only swap and scale them.

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};

/// Default tolerance for approximate operator comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Tolerance used by the `PartialEq` implementation.
const EQ_TOLERANCE: f64 = 1e-9;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A unitary matrix of dimension 2^k.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawOperator")]
pub enum Operator {
    /// Full row-major matrix.
    Dense(Array2<Complex64>),
    /// The 2^k diagonal entries.
    Diagonal(Vec<Complex64>),
    /// A 2×2 matrix `[[0, upper], [lower, 0]]`.
    AntiDiagonal {
        /// Entry at row 0, column 1.
        upper: Complex64,
        /// Entry at row 1, column 0.
        lower: Complex64,
    },
}

/// Unvalidated wire form of [`Operator`].
#[derive(Deserialize)]
enum RawOperator {
    Dense(Array2<Complex64>),
    Diagonal(Vec<Complex64>),
    AntiDiagonal { upper: Complex64, lower: Complex64 },
}

impl TryFrom<RawOperator> for Operator {
    type Error = IrError;

    fn try_from(raw: RawOperator) -> IrResult<Self> {
        match raw {
            RawOperator::Dense(matrix) => Operator::dense(matrix),
            RawOperator::Diagonal(entries) => Operator::diagonal(entries),
            RawOperator::AntiDiagonal { upper, lower } => Ok(Operator::anti_diagonal(upper, lower)),
        }
    }
}

impl Operator {
    /// Create a dense operator, validating its shape.
    pub fn dense(matrix: Array2<Complex64>) -> IrResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(IrError::InvalidOperator(format!(
                "matrix must be square, got {rows}x{cols}"
            )));
        }
        if rows < 2 || !rows.is_power_of_two() {
            return Err(IrError::InvalidOperator(format!(
                "dimension must be a power of two >= 2, got {rows}"
            )));
        }
        Ok(Operator::Dense(matrix))
    }

    /// Create a dense operator from row-major entries.
    pub fn from_rows(dim: usize, entries: Vec<Complex64>) -> IrResult<Self> {
        let matrix = Array2::from_shape_vec((dim, dim), entries)
            .map_err(|e| IrError::InvalidOperator(e.to_string()))?;
        Self::dense(matrix)
    }

    /// Create a diagonal operator, validating its length.
    pub fn diagonal(entries: Vec<Complex64>) -> IrResult<Self> {
        if entries.len() < 2 || !entries.len().is_power_of_two() {
            return Err(IrError::InvalidOperator(format!(
                "diagonal length must be a power of two >= 2, got {}",
                entries.len()
            )));
        }
        Ok(Operator::Diagonal(entries))
    }

    /// Create a 2×2 anti-diagonal operator.
    pub fn anti_diagonal(upper: Complex64, lower: Complex64) -> Self {
        Operator::AntiDiagonal { upper, lower }
    }

    /// The identity on `num_qubits` qubits.
    pub fn identity(num_qubits: u32) -> Self {
        Operator::Diagonal(vec![ONE; 1 << num_qubits])
    }

    /// Matrix dimension (2^k).
    #[inline]
    pub fn dim(&self) -> usize {
        match self {
            Operator::Dense(m) => m.nrows(),
            Operator::Diagonal(d) => d.len(),
            Operator::AntiDiagonal { .. } => 2,
        }
    }

    /// Number of qubits the operator acts on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.dim().trailing_zeros()
    }

    /// Entry at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        match self {
            Operator::Dense(m) => m[[row, col]],
            Operator::Diagonal(d) => {
                if row == col {
                    d[row]
                } else {
                    ZERO
                }
            }
            Operator::AntiDiagonal { upper, lower } => match (row, col) {
                (0, 1) => *upper,
                (1, 0) => *lower,
                _ => ZERO,
            },
        }
    }

    /// Expand into a full matrix.
    pub fn to_dense(&self) -> Array2<Complex64> {
        match self {
            Operator::Dense(m) => m.clone(),
            _ => {
                let dim = self.dim();
                Array2::from_shape_fn((dim, dim), |(r, c)| self.get(r, c))
            }
        }
    }

    /// Matrix product `self · rhs` (apply `rhs` first).
    ///
    /// Diagonal and anti-diagonal storage is kept whenever the product has
    /// that structure.
    pub fn matmul(&self, rhs: &Operator) -> IrResult<Operator> {
        if self.dim() != rhs.dim() {
            return Err(IrError::InvalidOperator(format!(
                "cannot multiply operators of dimension {} and {}",
                self.dim(),
                rhs.dim()
            )));
        }

        Ok(match (self, rhs) {
            (Operator::Diagonal(a), Operator::Diagonal(b)) => {
                Operator::Diagonal(a.iter().zip(b).map(|(x, y)| x * y).collect())
            }
            (
                Operator::AntiDiagonal { upper: a, lower: b },
                Operator::AntiDiagonal { upper: c, lower: d },
            ) => Operator::Diagonal(vec![a * d, b * c]),
            (Operator::Diagonal(p), Operator::AntiDiagonal { upper, lower }) => {
                Operator::AntiDiagonal {
                    upper: p[0] * upper,
                    lower: p[1] * lower,
                }
            }
            (Operator::AntiDiagonal { upper, lower }, Operator::Diagonal(p)) => {
                Operator::AntiDiagonal {
                    upper: upper * p[1],
                    lower: lower * p[0],
                }
            }
            _ => Operator::Dense(self.to_dense().dot(&rhs.to_dense())),
        })
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> Operator {
        match self {
            Operator::Dense(m) => Operator::Dense(m.t().mapv(|z| z.conj())),
            Operator::Diagonal(d) => Operator::Diagonal(d.iter().map(|z| z.conj()).collect()),
            Operator::AntiDiagonal { upper, lower } => Operator::AntiDiagonal {
                upper: lower.conj(),
                lower: upper.conj(),
            },
        }
    }

    /// Kronecker product `self ⊗ rhs`.
    pub fn kron(&self, rhs: &Operator) -> Operator {
        if let (Operator::Diagonal(a), Operator::Diagonal(b)) = (self, rhs) {
            return Operator::Diagonal(
                a.iter()
                    .flat_map(|x| b.iter().map(move |y| x * y))
                    .collect(),
            );
        }
        let (da, db) = (self.dim(), rhs.dim());
        Operator::Dense(Array2::from_shape_fn((da * db, da * db), |(r, c)| {
            self.get(r / db, c / db) * rhs.get(r % db, c % db)
        }))
    }

    /// Whether every off-diagonal entry is within `tolerance` of zero.
    pub fn is_diagonal(&self, tolerance: f64) -> bool {
        match self {
            Operator::Diagonal(_) => true,
            Operator::AntiDiagonal { upper, lower } => {
                upper.norm() < tolerance && lower.norm() < tolerance
            }
            Operator::Dense(m) => m
                .indexed_iter()
                .all(|((r, c), z)| r == c || z.norm() < tolerance),
        }
    }

    /// Diagonal entries (meaningful when [`is_diagonal`](Self::is_diagonal)).
    pub fn diagonal_entries(&self) -> Vec<Complex64> {
        (0..self.dim()).map(|i| self.get(i, i)).collect()
    }

    /// Entry-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Operator, tolerance: f64) -> bool {
        let dim = self.dim();
        if dim != other.dim() {
            return false;
        }
        (0..dim).all(|r| (0..dim).all(|c| (self.get(r, c) - other.get(r, c)).norm() <= tolerance))
    }

    /// Comparison up to a global phase factor.
    pub fn equal_up_to_global_phase(&self, other: &Operator, tolerance: f64) -> bool {
        let dim = self.dim();
        if dim != other.dim() {
            return false;
        }

        // Anchor the phase on the largest entry of `self`.
        let mut anchor = (0, 0);
        let mut largest = 0.0;
        for r in 0..dim {
            for c in 0..dim {
                let n = self.get(r, c).norm();
                if n > largest {
                    largest = n;
                    anchor = (r, c);
                }
            }
        }
        if largest < tolerance {
            return other.approx_eq(self, tolerance);
        }

        let phase = other.get(anchor.0, anchor.1) / self.get(anchor.0, anchor.1);
        if (phase.norm() - 1.0).abs() > tolerance {
            return false;
        }
        (0..dim).all(|r| {
            (0..dim).all(|c| (self.get(r, c) * phase - other.get(r, c)).norm() <= tolerance)
        })
    }

    /// Whether `self · self† = I` within `tolerance`.
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        match self.matmul(&self.adjoint()) {
            Ok(product) => product.approx_eq(&Operator::identity(self.num_qubits()), tolerance),
            Err(_) => false,
        }
    }

    /// Whether the operator equals its own adjoint within `tolerance`.
    pub fn is_self_adjoint(&self, tolerance: f64) -> bool {
        self.approx_eq(&self.adjoint(), tolerance)
    }
}

impl PartialEq for Operator {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, EQ_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_dense_rejects_bad_shapes() {
        let not_square = Array2::<Complex64>::zeros((2, 4));
        assert!(matches!(
            Operator::dense(not_square),
            Err(IrError::InvalidOperator(_))
        ));

        let not_pow2 = Array2::<Complex64>::zeros((3, 3));
        assert!(Operator::dense(not_pow2).is_err());
        assert!(Operator::diagonal(vec![ONE; 3]).is_err());
    }

    #[test]
    fn test_deserialize_checks_shape() {
        let good = Operator::diagonal(vec![ONE, -ONE]).unwrap();
        let json = serde_json::to_string(&good).unwrap();
        let back: Operator = serde_json::from_str(&json).unwrap();
        assert_eq!(back, good);

        let bad = serde_json::json!({ "Diagonal": [[1.0, 0.0], [1.0, 0.0], [1.0, 0.0]] });
        let err = serde_json::from_value::<Operator>(bad).unwrap_err();
        assert!(err.to_string().contains("power of two"), "{err}");

        let data = vec![[0.0, 0.0]; 8];
        let ragged = serde_json::json!({ "Dense": { "v": 1, "dim": [2, 4], "data": data } });
        assert!(serde_json::from_value::<Operator>(ragged).is_err());
    }

    #[test]
    fn test_structured_products_keep_storage() {
        let x = Operator::anti_diagonal(ONE, ONE);
        let y = Operator::anti_diagonal(c(0.0, -1.0), c(0.0, 1.0));
        let z = Operator::diagonal(vec![ONE, -ONE]).unwrap();

        // X·Y = iZ
        let xy = x.matmul(&y).unwrap();
        assert!(matches!(xy, Operator::Diagonal(_)));
        let iz = Operator::diagonal(vec![c(0.0, 1.0), c(0.0, -1.0)]).unwrap();
        assert!(xy.approx_eq(&iz, 1e-12));

        // Z·X is anti-diagonal
        let zx = z.matmul(&x).unwrap();
        assert!(matches!(zx, Operator::AntiDiagonal { .. }));
        let reference = Operator::Dense(z.to_dense().dot(&x.to_dense()));
        assert!(zx.approx_eq(&reference, 1e-12));
    }

    #[test]
    fn test_adjoint_and_unitarity() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let h = Operator::dense(array![[c(s, 0.0), c(s, 0.0)], [c(s, 0.0), c(-s, 0.0)]]).unwrap();
        assert!(h.is_unitary(1e-12));
        assert!(h.is_self_adjoint(1e-12));

        let y = Operator::anti_diagonal(c(0.0, -1.0), c(0.0, 1.0));
        assert!(y.is_self_adjoint(1e-12));

        let t = Operator::diagonal(vec![ONE, Complex64::from_polar(1.0, 0.3)]).unwrap();
        assert!(!t.is_self_adjoint(1e-12));
        assert!(t.matmul(&t.adjoint()).unwrap().approx_eq(&Operator::identity(1), 1e-12));
    }

    #[test]
    fn test_global_phase_comparison() {
        let z = Operator::diagonal(vec![ONE, -ONE]).unwrap();
        let phased = Operator::diagonal(vec![c(0.0, 1.0), c(0.0, -1.0)]).unwrap();
        assert!(z.equal_up_to_global_phase(&phased, 1e-12));
        assert!(!z.approx_eq(&phased, 1e-12));
        assert!(!z.equal_up_to_global_phase(&Operator::identity(1), 1e-12));
    }

    #[test]
    fn test_kron_dimensions() {
        let x = Operator::anti_diagonal(ONE, ONE);
        let id = Operator::identity(1);
        let xi = x.kron(&id);
        assert_eq!(xi.dim(), 4);
        assert_eq!(xi.num_qubits(), 2);
        // X ⊗ I maps |00⟩ to |10⟩
        assert_eq!(xi.get(2, 0), ONE);
        assert_eq!(xi.get(0, 0), ZERO);
    }
}
