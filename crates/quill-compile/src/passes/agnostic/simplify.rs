//! Angle canonicalization passes.
//!
//! Rotation angles are reduced modulo 2π and snapped to the named
//! right-angle gates when they match within the pass tolerance. Gates whose
//! effective angle is zero are removed. Every rewrite is exact up to global
//! phase.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use quill_ir::{DEFAULT_TOLERANCE, Instruction, QuantumCircuit, StandardGate};
use tracing::debug;

use crate::error::CompileResult;
use crate::pass::{PassKind, Transpiler};
use crate::unitary::Unitary2x2;

/// Rewrite of a single instruction.
enum Rewrite {
    Keep,
    Remove,
    Replace(StandardGate),
}

/// Apply `rewrite` to every gate, building a new circuit.
fn rewrite_gates<F>(
    circuit: &QuantumCircuit,
    pass: &str,
    rewrite: F,
) -> CompileResult<QuantumCircuit>
where
    F: Fn(&StandardGate) -> Rewrite,
{
    let mut output = circuit.empty_like();
    let mut removed = 0usize;
    for inst in circuit.instructions() {
        let action = inst.as_gate().map_or(Rewrite::Keep, &rewrite);
        match action {
            Rewrite::Keep => {
                output.append(inst.clone())?;
            }
            Rewrite::Remove => removed += 1,
            Rewrite::Replace(gate) => {
                output.append(Instruction::gate(gate, inst.qubits.iter().copied()))?;
            }
        }
    }
    debug!(pass, removed, "simplified gates");
    Ok(output)
}

/// Whether `angle` (already in `[0, 2π)`) is `target` modulo 2π.
fn near(angle: f64, target: f64, tolerance: f64) -> bool {
    let diff = (angle - target).rem_euclid(TAU);
    diff < tolerance || TAU - diff < tolerance
}

/// Snap a wrapped X/Y rotation angle to a named gate.
fn snap_rotation(
    angle: f64,
    tolerance: f64,
    full: StandardGate,
    half: StandardGate,
    minus_half: StandardGate,
    rebuild: fn(f64) -> StandardGate,
) -> Rewrite {
    let a = Unitary2x2::wrap_angle(angle);
    if near(a, 0.0, tolerance) {
        Rewrite::Remove
    } else if near(a, PI, tolerance) {
        Rewrite::Replace(full)
    } else if near(a, FRAC_PI_2, tolerance) {
        Rewrite::Replace(half)
    } else if near(a, 3.0 * FRAC_PI_2, tolerance) {
        Rewrite::Replace(minus_half)
    } else if a == angle {
        Rewrite::Keep
    } else {
        Rewrite::Replace(rebuild(a))
    }
}

macro_rules! tolerance_pass {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            tolerance: f64,
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $name {
            /// Create the pass with the default tolerance.
            pub fn new() -> Self {
                Self {
                    tolerance: DEFAULT_TOLERANCE,
                }
            }

            /// Set the numeric tolerance.
            #[must_use]
            pub fn with_tolerance(mut self, tolerance: f64) -> Self {
                self.tolerance = tolerance;
                self
            }
        }
    };
}

tolerance_pass!(
    /// Canonicalize `RotationX`: 0 is removed, π/2, π and 3π/2 become `X90`,
    /// `X` and `XM90`.
    SimplifyRxGates
);

tolerance_pass!(
    /// Canonicalize `RotationY`: 0 is removed, π/2, π and 3π/2 become `Y90`,
    /// `Y` and `YM90`.
    SimplifyRyGates
);

tolerance_pass!(
    /// Canonicalize `RotationZ` and `PhaseShift` into the phase-gate family:
    /// 0 is removed, π, ±π/2 and ±π/4 become `Z`, `Z90`/`ZM90` and
    /// `Pi8`/`Pi8Dagger`, anything else becomes a `PhaseShift`.
    SimplifyRzGates
);

tolerance_pass!(
    /// Remove `Identity` gates and `Universal` gates that equal identity up
    /// to global phase.
    SimplifyTrivialGates
);

impl Transpiler for SimplifyRxGates {
    fn name(&self) -> &'static str {
        "simplify_rx_gates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
        rewrite_gates(circuit, self.name(), |gate| match gate {
            StandardGate::RotationX(theta) => snap_rotation(
                *theta,
                self.tolerance,
                StandardGate::X,
                StandardGate::X90,
                StandardGate::XM90,
                StandardGate::RotationX,
            ),
            _ => Rewrite::Keep,
        })
    }
}

impl Transpiler for SimplifyRyGates {
    fn name(&self) -> &'static str {
        "simplify_ry_gates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
        rewrite_gates(circuit, self.name(), |gate| match gate {
            StandardGate::RotationY(theta) => snap_rotation(
                *theta,
                self.tolerance,
                StandardGate::Y,
                StandardGate::Y90,
                StandardGate::YM90,
                StandardGate::RotationY,
            ),
            _ => Rewrite::Keep,
        })
    }
}

impl Transpiler for SimplifyRzGates {
    fn name(&self) -> &'static str {
        "simplify_rz_gates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
        let tol = self.tolerance;
        rewrite_gates(circuit, self.name(), |gate| {
            let angle = match gate {
                StandardGate::RotationZ(theta) => *theta,
                StandardGate::PhaseShift(phi) => *phi,
                _ => return Rewrite::Keep,
            };
            let a = Unitary2x2::wrap_angle(angle);
            let snapped = [
                (PI, StandardGate::Z),
                (FRAC_PI_2, StandardGate::Z90),
                (-FRAC_PI_2, StandardGate::ZM90),
                (FRAC_PI_4, StandardGate::Pi8),
                (-FRAC_PI_4, StandardGate::Pi8Dagger),
            ]
            .into_iter()
            .find(|(target, _)| near(a, *target, tol));

            if near(a, 0.0, tol) {
                Rewrite::Remove
            } else if let Some((_, named)) = snapped {
                Rewrite::Replace(named)
            } else if matches!(gate, StandardGate::PhaseShift(phi) if *phi == a) {
                Rewrite::Keep
            } else {
                Rewrite::Replace(StandardGate::PhaseShift(a))
            }
        })
    }
}

impl Transpiler for SimplifyTrivialGates {
    fn name(&self) -> &'static str {
        "simplify_trivial_gates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
        rewrite_gates(circuit, self.name(), |gate| match gate {
            StandardGate::Identity => Rewrite::Remove,
            StandardGate::Universal(..) => {
                let trivial = Unitary2x2::from_gate(gate)
                    .is_some_and(|u| u.is_identity(self.tolerance));
                if trivial {
                    Rewrite::Remove
                } else {
                    Rewrite::Keep
                }
            }
            _ => Rewrite::Keep,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_ir::QubitId;

    fn single(gate: StandardGate) -> QuantumCircuit {
        let mut circuit = QuantumCircuit::new(1);
        circuit.gate(gate, [QubitId(1)]).unwrap();
        circuit
    }

    fn result(pass: &dyn Transpiler, gate: StandardGate) -> Option<StandardGate> {
        let out = pass.transpile(&single(gate)).unwrap();
        out.instructions().first().and_then(|i| i.as_gate().cloned())
    }

    #[test]
    fn test_zero_rotation_is_removed() {
        assert_eq!(result(&SimplifyRxGates::new(), StandardGate::RotationX(0.0)), None);
        assert_eq!(result(&SimplifyRyGates::new(), StandardGate::RotationY(TAU)), None);
        assert_eq!(result(&SimplifyRzGates::new(), StandardGate::RotationZ(-TAU)), None);
        assert_eq!(result(&SimplifyRzGates::new(), StandardGate::PhaseShift(1e-9)), None);
    }

    #[test]
    fn test_rx_snapping() {
        let pass = SimplifyRxGates::new();
        assert_eq!(result(&pass, StandardGate::RotationX(PI)), Some(StandardGate::X));
        assert_eq!(
            result(&pass, StandardGate::RotationX(FRAC_PI_2)),
            Some(StandardGate::X90)
        );
        assert_eq!(
            result(&pass, StandardGate::RotationX(-FRAC_PI_2)),
            Some(StandardGate::XM90)
        );
        assert_eq!(
            result(&pass, StandardGate::RotationX(0.3)),
            Some(StandardGate::RotationX(0.3))
        );
        // Other gates pass through
        assert_eq!(
            result(&pass, StandardGate::RotationY(PI)),
            Some(StandardGate::RotationY(PI))
        );
    }

    #[test]
    fn test_ry_snapping() {
        let pass = SimplifyRyGates::new();
        assert_eq!(result(&pass, StandardGate::RotationY(-PI)), Some(StandardGate::Y));
        assert_eq!(
            result(&pass, StandardGate::RotationY(5.0 * FRAC_PI_2)),
            Some(StandardGate::Y90)
        );
    }

    #[test]
    fn test_rz_snapping() {
        let pass = SimplifyRzGates::new();
        assert_eq!(result(&pass, StandardGate::RotationZ(PI)), Some(StandardGate::Z));
        assert_eq!(
            result(&pass, StandardGate::PhaseShift(FRAC_PI_2)),
            Some(StandardGate::Z90)
        );
        assert_eq!(
            result(&pass, StandardGate::PhaseShift(-FRAC_PI_2)),
            Some(StandardGate::ZM90)
        );
        assert_eq!(
            result(&pass, StandardGate::RotationZ(FRAC_PI_4)),
            Some(StandardGate::Pi8)
        );
        assert_eq!(
            result(&pass, StandardGate::PhaseShift(7.0 * FRAC_PI_4)),
            Some(StandardGate::Pi8Dagger)
        );
        assert_eq!(
            result(&pass, StandardGate::RotationZ(1.0)),
            Some(StandardGate::PhaseShift(1.0))
        );
    }

    #[test]
    fn test_snapped_gates_are_phase_equivalent() {
        let pass = SimplifyRzGates::new();
        for angle in [PI, FRAC_PI_2, -FRAC_PI_2, FRAC_PI_4, -FRAC_PI_4, 2.0] {
            let original = StandardGate::RotationZ(angle);
            let snapped = result(&pass, original.clone()).unwrap();
            assert!(
                snapped
                    .operator()
                    .equal_up_to_global_phase(&original.operator(), 1e-9),
                "{original} -> {snapped}"
            );
        }
    }

    #[test]
    fn test_trivial_gates() {
        let pass = SimplifyTrivialGates::new();
        assert_eq!(result(&pass, StandardGate::Identity), None);
        assert_eq!(result(&pass, StandardGate::Universal(0.0, 0.4, -0.4)), None);
        assert_eq!(
            result(&pass, StandardGate::Universal(0.0, 0.4, 0.4)),
            Some(StandardGate::Universal(0.0, 0.4, 0.4))
        );
    }
}
