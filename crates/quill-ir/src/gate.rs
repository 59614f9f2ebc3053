//! Quantum gate types.
//!
//! [`StandardGate`] is a closed set of gate kinds. Each kind maps to its
//! canonical [`Operator`] through a pure function and, where one exists, to
//! its analytic inverse.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};
use std::fmt;
use std::sync::LazyLock;

use ndarray::{Array2, array, s};
use num_complex::Complex64;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::operator::{DEFAULT_TOLERANCE, Operator};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

#[inline]
fn cis(angle: f64) -> Complex64 {
    Complex64::from_polar(1.0, angle)
}

/// Standard gates with known semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit fixed gates
    /// Identity gate.
    Identity,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    Hadamard,
    /// π/8 gate, `diag(1, e^{iπ/4})`.
    Pi8,
    /// Inverse of [`Pi8`](Self::Pi8).
    Pi8Dagger,
    /// Rotation by π/2 around X.
    X90,
    /// Rotation by -π/2 around X.
    XM90,
    /// Rotation by π/2 around Y.
    Y90,
    /// Rotation by -π/2 around Y.
    YM90,
    /// Phase gate `diag(1, i)`.
    Z90,
    /// Phase gate `diag(1, -i)`.
    ZM90,

    // Single-qubit parameterized gates
    /// Rotation around X.
    RotationX(f64),
    /// Rotation around Y.
    RotationY(f64),
    /// Rotation around Z, `diag(e^{-iθ/2}, e^{iθ/2})`.
    RotationZ(f64),
    /// Rotation by θ around the equatorial axis at azimuth φ.
    Rotation(f64, f64),
    /// Phase shift `diag(1, e^{iφ})`.
    PhaseShift(f64),
    /// Universal single-qubit gate U(θ, φ, λ).
    Universal(f64, f64, f64),

    // Multi-qubit gates
    /// Controlled-X (CNOT) gate.
    ControlX,
    /// Controlled-Z gate.
    ControlZ,
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,
    /// Inverse of [`ISwap`](Self::ISwap).
    ISwapDagger,
    /// Toffoli (CCX) gate.
    Toffoli,
    /// A kernel gate with `num_controls` control qubits in front.
    Controlled {
        /// The controlled gate.
        kernel: Box<StandardGate>,
        /// Number of leading control qubits.
        num_controls: u32,
    },
    /// A gate carrying a user-supplied operator.
    Custom(CustomGate),
}

/// The fieldless tag of a [`StandardGate`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateTag {
    Identity,
    X,
    Y,
    Z,
    Hadamard,
    Pi8,
    Pi8Dagger,
    X90,
    XM90,
    Y90,
    YM90,
    Z90,
    ZM90,
    RotationX,
    RotationY,
    RotationZ,
    Rotation,
    PhaseShift,
    Universal,
    ControlX,
    ControlZ,
    Swap,
    ISwap,
    ISwapDagger,
    Toffoli,
    Controlled,
    Custom,
}

impl GateTag {
    /// Every tag, in declaration order.
    pub const ALL: [GateTag; 27] = [
        GateTag::Identity,
        GateTag::X,
        GateTag::Y,
        GateTag::Z,
        GateTag::Hadamard,
        GateTag::Pi8,
        GateTag::Pi8Dagger,
        GateTag::X90,
        GateTag::XM90,
        GateTag::Y90,
        GateTag::YM90,
        GateTag::Z90,
        GateTag::ZM90,
        GateTag::RotationX,
        GateTag::RotationY,
        GateTag::RotationZ,
        GateTag::Rotation,
        GateTag::PhaseShift,
        GateTag::Universal,
        GateTag::ControlX,
        GateTag::ControlZ,
        GateTag::Swap,
        GateTag::ISwap,
        GateTag::ISwapDagger,
        GateTag::Toffoli,
        GateTag::Controlled,
        GateTag::Custom,
    ];

    /// The canonical symbol of this tag.
    pub fn symbol(self) -> &'static str {
        match self {
            GateTag::Identity => "id",
            GateTag::X => "x",
            GateTag::Y => "y",
            GateTag::Z => "z",
            GateTag::Hadamard => "h",
            GateTag::Pi8 => "t",
            GateTag::Pi8Dagger => "tdg",
            GateTag::X90 => "x90",
            GateTag::XM90 => "xm90",
            GateTag::Y90 => "y90",
            GateTag::YM90 => "ym90",
            GateTag::Z90 => "z90",
            GateTag::ZM90 => "zm90",
            GateTag::RotationX => "rx",
            GateTag::RotationY => "ry",
            GateTag::RotationZ => "rz",
            GateTag::Rotation => "r",
            GateTag::PhaseShift => "phase_shift",
            GateTag::Universal => "u",
            GateTag::ControlX => "cx",
            GateTag::ControlZ => "cz",
            GateTag::Swap => "swap",
            GateTag::ISwap => "iswap",
            GateTag::ISwapDagger => "iswap_dg",
            GateTag::Toffoli => "ccx",
            GateTag::Controlled => "controlled",
            GateTag::Custom => "custom",
        }
    }

    /// Resolve a symbol (`"x"`, `"cz"`, `"phase_shift"`, ...) to a tag.
    pub fn from_symbol(symbol: &str) -> Option<GateTag> {
        SYMBOL_TABLE.get(symbol).copied()
    }
}

impl fmt::Display for GateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

static SYMBOL_TABLE: LazyLock<FxHashMap<&'static str, GateTag>> = LazyLock::new(|| {
    let mut table: FxHashMap<&'static str, GateTag> =
        GateTag::ALL.iter().map(|t| (t.symbol(), *t)).collect();
    // Common aliases
    table.insert("i", GateTag::Identity);
    table.insert("cnot", GateTag::ControlX);
    table.insert("toffoli", GateTag::Toffoli);
    table.insert("p", GateTag::PhaseShift);
    table.insert("s", GateTag::Z90);
    table.insert("sdg", GateTag::ZM90);
    table
});

impl StandardGate {
    /// Wrap `kernel` with `num_controls` leading control qubits.
    pub fn controlled(kernel: StandardGate, num_controls: u32) -> Self {
        StandardGate::Controlled {
            kernel: Box::new(kernel),
            num_controls,
        }
    }

    /// The fieldless tag of this gate.
    pub fn tag(&self) -> GateTag {
        match self {
            StandardGate::Identity => GateTag::Identity,
            StandardGate::X => GateTag::X,
            StandardGate::Y => GateTag::Y,
            StandardGate::Z => GateTag::Z,
            StandardGate::Hadamard => GateTag::Hadamard,
            StandardGate::Pi8 => GateTag::Pi8,
            StandardGate::Pi8Dagger => GateTag::Pi8Dagger,
            StandardGate::X90 => GateTag::X90,
            StandardGate::XM90 => GateTag::XM90,
            StandardGate::Y90 => GateTag::Y90,
            StandardGate::YM90 => GateTag::YM90,
            StandardGate::Z90 => GateTag::Z90,
            StandardGate::ZM90 => GateTag::ZM90,
            StandardGate::RotationX(_) => GateTag::RotationX,
            StandardGate::RotationY(_) => GateTag::RotationY,
            StandardGate::RotationZ(_) => GateTag::RotationZ,
            StandardGate::Rotation(_, _) => GateTag::Rotation,
            StandardGate::PhaseShift(_) => GateTag::PhaseShift,
            StandardGate::Universal(_, _, _) => GateTag::Universal,
            StandardGate::ControlX => GateTag::ControlX,
            StandardGate::ControlZ => GateTag::ControlZ,
            StandardGate::Swap => GateTag::Swap,
            StandardGate::ISwap => GateTag::ISwap,
            StandardGate::ISwapDagger => GateTag::ISwapDagger,
            StandardGate::Toffoli => GateTag::Toffoli,
            StandardGate::Controlled { .. } => GateTag::Controlled,
            StandardGate::Custom(_) => GateTag::Custom,
        }
    }

    /// Get the name of this gate.
    ///
    /// Custom gates report their own name, every other gate its symbol.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            StandardGate::Custom(g) => &g.name,
            _ => self.tag().symbol(),
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::ControlX
            | StandardGate::ControlZ
            | StandardGate::Swap
            | StandardGate::ISwap
            | StandardGate::ISwapDagger => 2,
            StandardGate::Toffoli => 3,
            StandardGate::Controlled {
                kernel,
                num_controls,
            } => kernel.num_qubits() + num_controls,
            StandardGate::Custom(g) => g.num_qubits(),
            _ => 1,
        }
    }

    /// Whether this gate acts on a single qubit.
    #[inline]
    pub fn is_single_qubit(&self) -> bool {
        self.num_qubits() == 1
    }

    /// Whether this is one of the phase-type single-qubit gates.
    pub fn is_phase_type(&self) -> bool {
        matches!(
            self,
            StandardGate::Z
                | StandardGate::Pi8
                | StandardGate::Pi8Dagger
                | StandardGate::Z90
                | StandardGate::ZM90
                | StandardGate::RotationZ(_)
                | StandardGate::PhaseShift(_)
        )
    }

    /// Get the real parameters of this gate.
    pub fn parameters(&self) -> Vec<f64> {
        match self {
            StandardGate::RotationX(a)
            | StandardGate::RotationY(a)
            | StandardGate::RotationZ(a)
            | StandardGate::PhaseShift(a) => vec![*a],
            StandardGate::Rotation(theta, phi) => vec![*theta, *phi],
            StandardGate::Universal(theta, phi, lambda) => vec![*theta, *phi, *lambda],
            StandardGate::Controlled { kernel, .. } => kernel.parameters(),
            _ => vec![],
        }
    }

    /// The canonical unitary of this gate.
    ///
    /// For multi-qubit gates the first target is the most significant bit
    /// of the operator's row index.
    pub fn operator(&self) -> Operator {
        match self {
            StandardGate::Identity => Operator::identity(1),
            StandardGate::X => Operator::anti_diagonal(ONE, ONE),
            StandardGate::Y => Operator::anti_diagonal(-I, I),
            StandardGate::Z => Operator::Diagonal(vec![ONE, -ONE]),
            StandardGate::Hadamard => {
                let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
                Operator::Dense(array![[h, h], [h, -h]])
            }
            StandardGate::Pi8 => Operator::Diagonal(vec![ONE, cis(FRAC_PI_4)]),
            StandardGate::Pi8Dagger => Operator::Diagonal(vec![ONE, cis(-FRAC_PI_4)]),
            StandardGate::X90 => rotation(FRAC_PI_2, 0.0),
            StandardGate::XM90 => rotation(-FRAC_PI_2, 0.0),
            StandardGate::Y90 => rotation(FRAC_PI_2, FRAC_PI_2),
            StandardGate::YM90 => rotation(-FRAC_PI_2, FRAC_PI_2),
            StandardGate::Z90 => Operator::Diagonal(vec![ONE, I]),
            StandardGate::ZM90 => Operator::Diagonal(vec![ONE, -I]),
            StandardGate::RotationX(theta) => rotation(*theta, 0.0),
            StandardGate::RotationY(theta) => rotation(*theta, FRAC_PI_2),
            StandardGate::RotationZ(theta) => {
                Operator::Diagonal(vec![cis(-theta / 2.0), cis(theta / 2.0)])
            }
            StandardGate::Rotation(theta, phi) => rotation(*theta, *phi),
            StandardGate::PhaseShift(phi) => Operator::Diagonal(vec![ONE, cis(*phi)]),
            StandardGate::Universal(theta, phi, lambda) => universal(*theta, *phi, *lambda),
            StandardGate::ControlX => Operator::Dense(array![
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, ONE, ZERO, ZERO],
                [ZERO, ZERO, ZERO, ONE],
                [ZERO, ZERO, ONE, ZERO],
            ]),
            StandardGate::ControlZ => Operator::Diagonal(vec![ONE, ONE, ONE, -ONE]),
            StandardGate::Swap => Operator::Dense(array![
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, ZERO, ONE, ZERO],
                [ZERO, ONE, ZERO, ZERO],
                [ZERO, ZERO, ZERO, ONE],
            ]),
            StandardGate::ISwap => iswap(I),
            StandardGate::ISwapDagger => iswap(-I),
            StandardGate::Toffoli => controlled_operator(&StandardGate::X.operator(), 2),
            StandardGate::Controlled {
                kernel,
                num_controls,
            } => controlled_operator(&kernel.operator(), *num_controls),
            StandardGate::Custom(g) => g.operator.clone(),
        }
    }

    /// The analytic inverse of this gate.
    ///
    /// Custom gates are only invertible when their operator is self-adjoint.
    pub fn inverse(&self) -> IrResult<StandardGate> {
        Ok(match self {
            StandardGate::Identity
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::Hadamard
            | StandardGate::ControlX
            | StandardGate::ControlZ
            | StandardGate::Swap
            | StandardGate::Toffoli => self.clone(),
            StandardGate::Pi8 => StandardGate::Pi8Dagger,
            StandardGate::Pi8Dagger => StandardGate::Pi8,
            StandardGate::X90 => StandardGate::XM90,
            StandardGate::XM90 => StandardGate::X90,
            StandardGate::Y90 => StandardGate::YM90,
            StandardGate::YM90 => StandardGate::Y90,
            StandardGate::Z90 => StandardGate::ZM90,
            StandardGate::ZM90 => StandardGate::Z90,
            StandardGate::ISwap => StandardGate::ISwapDagger,
            StandardGate::ISwapDagger => StandardGate::ISwap,
            StandardGate::RotationX(theta) => StandardGate::RotationX(-theta),
            StandardGate::RotationY(theta) => StandardGate::RotationY(-theta),
            StandardGate::RotationZ(theta) => StandardGate::RotationZ(-theta),
            StandardGate::Rotation(theta, phi) => StandardGate::Rotation(-theta, *phi),
            StandardGate::PhaseShift(phi) => StandardGate::PhaseShift(-phi),
            StandardGate::Universal(theta, phi, lambda) => {
                StandardGate::Universal(-theta, -lambda, -phi)
            }
            StandardGate::Controlled {
                kernel,
                num_controls,
            } => StandardGate::Controlled {
                kernel: Box::new(kernel.inverse()?),
                num_controls: *num_controls,
            },
            StandardGate::Custom(g) => {
                if g.operator.is_self_adjoint(DEFAULT_TOLERANCE) {
                    self.clone()
                } else {
                    return Err(IrError::InverseNotImplemented(g.name.clone()));
                }
            }
        })
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StandardGate::Controlled {
                kernel,
                num_controls,
            } => write!(f, "c{num_controls}-{kernel}"),
            _ => {
                f.write_str(self.name())?;
                let params = self.parameters();
                if !params.is_empty() {
                    let joined: Vec<String> = params.iter().map(|p| format!("{p:.6}")).collect();
                    write!(f, "({})", joined.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

/// `[[cos θ/2, -i e^{-iφ} sin θ/2], [-i e^{iφ} sin θ/2, cos θ/2]]`
fn rotation(theta: f64, phi: f64) -> Operator {
    let (sin, cos) = (theta / 2.0).sin_cos();
    let c = Complex64::new(cos, 0.0);
    Operator::Dense(array![
        [c, -I * cis(-phi) * sin],
        [-I * cis(phi) * sin, c],
    ])
}

/// `[[cos θ/2, -e^{iλ} sin θ/2], [e^{iφ} sin θ/2, e^{i(φ+λ)} cos θ/2]]`
fn universal(theta: f64, phi: f64, lambda: f64) -> Operator {
    let (sin, cos) = (theta / 2.0).sin_cos();
    Operator::Dense(array![
        [Complex64::new(cos, 0.0), -cis(lambda) * sin],
        [cis(phi) * sin, cis(phi + lambda) * cos],
    ])
}

fn iswap(phase: Complex64) -> Operator {
    Operator::Dense(array![
        [ONE, ZERO, ZERO, ZERO],
        [ZERO, ZERO, phase, ZERO],
        [ZERO, phase, ZERO, ZERO],
        [ZERO, ZERO, ZERO, ONE],
    ])
}

/// Block-diagonal operator with `kernel` in the all-controls-set block.
fn controlled_operator(kernel: &Operator, num_controls: u32) -> Operator {
    let kernel_dim = kernel.dim();
    let dim = kernel_dim << num_controls;
    let offset = dim - kernel_dim;

    if let Operator::Diagonal(entries) = kernel {
        let mut diagonal = vec![ONE; offset];
        diagonal.extend_from_slice(entries);
        return Operator::Diagonal(diagonal);
    }

    let mut matrix = Array2::<Complex64>::eye(dim);
    matrix
        .slice_mut(s![offset.., offset..])
        .assign(&kernel.to_dense());
    Operator::Dense(matrix)
}

/// A user-defined gate carrying its own unitary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCustomGate")]
pub struct CustomGate {
    /// The name of the gate.
    pub name: String,
    /// The unitary it applies.
    pub operator: Operator,
}

#[derive(Deserialize)]
struct RawCustomGate {
    name: String,
    operator: Operator,
}

impl TryFrom<RawCustomGate> for CustomGate {
    type Error = IrError;

    fn try_from(raw: RawCustomGate) -> IrResult<Self> {
        Self::new(raw.name, raw.operator)
    }
}

impl CustomGate {
    /// Create a new custom gate, rejecting non-unitary operators.
    pub fn new(name: impl Into<String>, operator: Operator) -> IrResult<Self> {
        let name = name.into();
        if !operator.is_unitary(DEFAULT_TOLERANCE) {
            return Err(IrError::InvalidOperator(format!(
                "custom gate '{name}' is not unitary"
            )));
        }
        Ok(Self { name, operator })
    }

    /// The number of qubits it operates on.
    pub fn num_qubits(&self) -> u32 {
        self.operator.num_qubits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn all_fixed_gates() -> Vec<StandardGate> {
        vec![
            StandardGate::Identity,
            StandardGate::X,
            StandardGate::Y,
            StandardGate::Z,
            StandardGate::Hadamard,
            StandardGate::Pi8,
            StandardGate::Pi8Dagger,
            StandardGate::X90,
            StandardGate::XM90,
            StandardGate::Y90,
            StandardGate::YM90,
            StandardGate::Z90,
            StandardGate::ZM90,
            StandardGate::RotationX(0.7),
            StandardGate::RotationY(-1.3),
            StandardGate::RotationZ(2.1),
            StandardGate::Rotation(0.4, 1.1),
            StandardGate::PhaseShift(0.9),
            StandardGate::Universal(0.3, 1.2, -0.8),
            StandardGate::ControlX,
            StandardGate::ControlZ,
            StandardGate::Swap,
            StandardGate::ISwap,
            StandardGate::ISwapDagger,
            StandardGate::Toffoli,
            StandardGate::controlled(StandardGate::Y90, 2),
        ]
    }

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::Hadamard.num_qubits(), 1);
        assert_eq!(StandardGate::ControlX.num_qubits(), 2);
        assert_eq!(StandardGate::Toffoli.num_qubits(), 3);
        assert_eq!(StandardGate::controlled(StandardGate::Swap, 1).num_qubits(), 3);

        assert!(StandardGate::Hadamard.parameters().is_empty());
        assert_eq!(StandardGate::Universal(1.0, 2.0, 3.0).parameters(), vec![1.0, 2.0, 3.0]);
        assert_eq!(StandardGate::PhaseShift(0.5).name(), "phase_shift");
    }

    #[test]
    fn test_operators_are_unitary_with_matching_dimension() {
        for gate in all_fixed_gates() {
            let op = gate.operator();
            assert_eq!(op.num_qubits(), gate.num_qubits(), "{gate}");
            assert!(op.is_unitary(1e-12), "{gate} is not unitary");
        }
    }

    #[test]
    fn test_storage_specialization() {
        for gate in [
            StandardGate::Identity,
            StandardGate::Z,
            StandardGate::Pi8,
            StandardGate::Z90,
            StandardGate::RotationZ(0.3),
            StandardGate::PhaseShift(0.3),
            StandardGate::ControlZ,
        ] {
            assert!(matches!(gate.operator(), Operator::Diagonal(_)), "{gate}");
        }
        assert!(matches!(StandardGate::X.operator(), Operator::AntiDiagonal { .. }));
        assert!(matches!(StandardGate::Y.operator(), Operator::AntiDiagonal { .. }));
        assert!(matches!(StandardGate::Hadamard.operator(), Operator::Dense(_)));
    }

    #[test]
    fn test_inverse_is_adjoint() {
        for gate in all_fixed_gates() {
            let inverse = gate.inverse().unwrap();
            assert!(
                inverse.operator().approx_eq(&gate.operator().adjoint(), 1e-12),
                "inverse of {gate} is wrong"
            );
        }
    }

    #[test]
    fn test_named_rotations_match_parameterized() {
        assert!(StandardGate::X90
            .operator()
            .approx_eq(&StandardGate::RotationX(PI / 2.0).operator(), 1e-12));
        assert!(StandardGate::YM90
            .operator()
            .approx_eq(&StandardGate::RotationY(-PI / 2.0).operator(), 1e-12));
        assert!(StandardGate::X
            .operator()
            .equal_up_to_global_phase(&StandardGate::RotationX(PI).operator(), 1e-12));
        assert!(StandardGate::Z90
            .operator()
            .approx_eq(&StandardGate::PhaseShift(PI / 2.0).operator(), 1e-12));
    }

    #[test]
    fn test_toffoli_flips_target_only_when_both_controls_set() {
        let op = StandardGate::Toffoli.operator();
        assert_eq!(op.get(7, 6), ONE);
        assert_eq!(op.get(6, 7), ONE);
        assert_eq!(op.get(5, 5), ONE);
        assert_eq!(op.get(6, 6), ZERO);
    }

    #[test]
    fn test_custom_gate_inverse() {
        let hermitian = CustomGate::new("my_x", StandardGate::X.operator()).unwrap();
        let gate = StandardGate::Custom(hermitian);
        assert_eq!(gate.inverse().unwrap(), gate);
        assert_eq!(gate.name(), "my_x");

        let t = CustomGate::new("my_t", StandardGate::Pi8.operator()).unwrap();
        assert!(matches!(
            StandardGate::Custom(t).inverse(),
            Err(IrError::InverseNotImplemented(name)) if name == "my_t"
        ));
    }

    #[test]
    fn test_custom_gate_rejects_non_unitary() {
        let op = Operator::diagonal(vec![ONE, Complex64::new(2.0, 0.0)]).unwrap();
        assert!(CustomGate::new("bad", op).is_err());
    }

    #[test]
    fn test_custom_gate_deserialize_checks_unitarity() {
        let gate = CustomGate::new("my_x", StandardGate::X.operator()).unwrap();
        let mut value = serde_json::to_value(&gate).unwrap();
        let back: CustomGate = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(back, gate);

        value["operator"] = serde_json::to_value(
            Operator::diagonal(vec![ONE, Complex64::new(2.0, 0.0)]).unwrap(),
        )
        .unwrap();
        let err = serde_json::from_value::<CustomGate>(value).unwrap_err();
        assert!(err.to_string().contains("not unitary"), "{err}");
    }

    #[test]
    fn test_symbol_table() {
        assert_eq!(GateTag::from_symbol("x"), Some(GateTag::X));
        assert_eq!(GateTag::from_symbol("cz"), Some(GateTag::ControlZ));
        assert_eq!(GateTag::from_symbol("phase_shift"), Some(GateTag::PhaseShift));
        assert_eq!(GateTag::from_symbol("cnot"), Some(GateTag::ControlX));
        assert_eq!(GateTag::from_symbol("nope"), None);

        for tag in GateTag::ALL {
            assert_eq!(GateTag::from_symbol(tag.symbol()), Some(tag));
        }
    }
}
