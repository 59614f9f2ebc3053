//! Gate decomposition passes.
//!
//! Two families live here. Fixed templates expand Toffoli, CX, Swap and
//! iSWAP into CX/CZ networks. Basis-change rewrites re-express `Universal`
//! and `RotationX` gates with phase gates and half rotations around X, and
//! check every replacement against the operator it replaces.

use std::f64::consts::{FRAC_PI_2, PI};

use quill_ir::{DEFAULT_TOLERANCE, Instruction, QuantumCircuit, QubitId, StandardGate};
use tracing::{debug, instrument};

use crate::error::{CompileError, CompileResult};
use crate::pass::{PassKind, Transpiler};
use crate::unitary::Unitary2x2;

/// Rebuild `circuit`, replacing every instruction for which `expand`
/// returns a sequence.
fn expand_instructions<F>(
    circuit: &QuantumCircuit,
    pass: &str,
    mut expand: F,
) -> CompileResult<QuantumCircuit>
where
    F: FnMut(&Instruction) -> CompileResult<Option<Vec<Instruction>>>,
{
    let mut output = circuit.empty_like();
    let mut expanded = 0usize;
    for inst in circuit.instructions() {
        match expand(inst)? {
            Some(replacement) => {
                expanded += 1;
                for r in replacement {
                    output.append(r)?;
                }
            }
            None => {
                output.append(inst.clone())?;
            }
        }
    }
    debug!(pass, expanded, after = output.len(), "expanded gates");
    Ok(output)
}

// =============================================================================
// Fixed templates
// =============================================================================

fn h(q: QubitId) -> Instruction {
    Instruction::single_qubit_gate(StandardGate::Hadamard, q)
}

fn cz(a: QubitId, b: QubitId) -> Instruction {
    Instruction::two_qubit_gate(StandardGate::ControlZ, a, b)
}

fn cx(c: QubitId, t: QubitId) -> Instruction {
    Instruction::two_qubit_gate(StandardGate::ControlX, c, t)
}

/// CX(c, t) = H(t) · CZ(c, t) · H(t).
fn cx_to_cz(c: QubitId, t: QubitId) -> Vec<Instruction> {
    vec![h(t), cz(c, t), h(t)]
}

/// Swap as three alternating CX gates, each expanded to CZ.
fn swap_to_cz(a: QubitId, b: QubitId) -> Vec<Instruction> {
    [(a, b), (b, a), (a, b)]
        .into_iter()
        .flat_map(|(c, t)| cx_to_cz(c, t))
        .collect()
}

/// Two qubit operands of a gate, in order.
fn pair(inst: &Instruction, pass: &str) -> CompileResult<(QubitId, QubitId)> {
    match inst.qubits.as_slice() {
        [a, b] => Ok((*a, *b)),
        _ => Err(CompileError::UnsupportedGate {
            gate: inst.name().to_string(),
            pass: pass.into(),
        }),
    }
}

/// Toffoli to the 15-gate Clifford+T network on CX.
#[derive(Debug, Clone, Copy, Default)]
pub struct CastToffoliToCXGate;

impl Transpiler for CastToffoliToCXGate {
    fn name(&self) -> &'static str {
        "cast_toffoli_to_cx"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn should_run(&self, circuit: &QuantumCircuit) -> bool {
        circuit.gate_counts().contains_key("ccx")
    }

    fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
        expand_instructions(circuit, self.name(), |inst| {
            let (Some(StandardGate::Toffoli), [a, b, c]) = (inst.as_gate(), inst.qubits.as_slice())
            else {
                return Ok(None);
            };
            let (a, b, c) = (*a, *b, *c);
            let t = |q| Instruction::single_qubit_gate(StandardGate::Pi8, q);
            let tdg = |q| Instruction::single_qubit_gate(StandardGate::Pi8Dagger, q);
            Ok(Some(vec![
                h(c),
                cx(b, c),
                tdg(c),
                cx(a, c),
                t(c),
                cx(b, c),
                tdg(c),
                cx(a, c),
                t(b),
                t(c),
                h(c),
                cx(a, b),
                t(a),
                tdg(b),
                cx(a, b),
            ]))
        })
    }
}

/// CX to CZ conjugated by Hadamards on the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct CastCXToCZGate;

impl Transpiler for CastCXToCZGate {
    fn name(&self) -> &'static str {
        "cast_cx_to_cz"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
        expand_instructions(circuit, self.name(), |inst| {
            if inst.as_gate() != Some(&StandardGate::ControlX) {
                return Ok(None);
            }
            let (c, t) = pair(inst, self.name())?;
            Ok(Some(cx_to_cz(c, t)))
        })
    }
}

/// Swap to three CZ gates with Hadamard conjugation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CastSwapToCZGate;

impl Transpiler for CastSwapToCZGate {
    fn name(&self) -> &'static str {
        "cast_swap_to_cz"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
        expand_instructions(circuit, self.name(), |inst| {
            if inst.as_gate() != Some(&StandardGate::Swap) {
                return Ok(None);
            }
            let (a, b) = pair(inst, self.name())?;
            Ok(Some(swap_to_cz(a, b)))
        })
    }
}

/// iSWAP and its inverse to CZ, an expanded Swap and quarter phase gates.
///
/// `iSWAP(a, b) = (S ⊗ S) · SWAP · CZ`, applied right to left.
#[derive(Debug, Clone, Copy, Default)]
pub struct CastISwapToCZGate;

impl Transpiler for CastISwapToCZGate {
    fn name(&self) -> &'static str {
        "cast_iswap_to_cz"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
        expand_instructions(circuit, self.name(), |inst| {
            let forward = match inst.as_gate() {
                Some(StandardGate::ISwap) => true,
                Some(StandardGate::ISwapDagger) => false,
                _ => return Ok(None),
            };
            let (a, b) = pair(inst, self.name())?;
            let phase = |gate: StandardGate| {
                [
                    Instruction::single_qubit_gate(gate.clone(), a),
                    Instruction::single_qubit_gate(gate, b),
                ]
            };

            let mut seq = Vec::with_capacity(12);
            if forward {
                seq.push(cz(a, b));
                seq.extend(swap_to_cz(a, b));
                seq.extend(phase(StandardGate::Z90));
            } else {
                seq.extend(phase(StandardGate::ZM90));
                seq.extend(swap_to_cz(a, b));
                seq.push(cz(a, b));
            }
            Ok(Some(seq))
        })
    }
}

// =============================================================================
// Basis changes
// =============================================================================

/// Fail unless `replacement`, applied in order, equals `original` up to
/// global phase.
fn check_reconstruction(
    pass: &str,
    original: &StandardGate,
    replacement: &[StandardGate],
    tolerance: f64,
) -> CompileResult<()> {
    let mismatch = || CompileError::NumericConsistency {
        pass: pass.into(),
        detail: format!(
            "replacement for {original} does not reproduce its operator: [{}]",
            replacement
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };

    let target = Unitary2x2::from_gate(original).ok_or_else(mismatch)?;
    let mut rebuilt = Unitary2x2::identity();
    for gate in replacement {
        rebuilt = Unitary2x2::from_gate(gate).ok_or_else(mismatch)? * rebuilt;
    }
    if target.equal_up_to_global_phase(&rebuilt, tolerance) {
        Ok(())
    } else {
        Err(mismatch())
    }
}

/// Shared body of the basis-change passes.
fn rewrite_single_qubit<F>(
    circuit: &QuantumCircuit,
    pass: &str,
    tolerance: f64,
    decompose: F,
) -> CompileResult<QuantumCircuit>
where
    F: Fn(&StandardGate) -> Option<Vec<StandardGate>>,
{
    expand_instructions(circuit, pass, |inst| {
        let (Some(gate), [q]) = (inst.as_gate(), inst.qubits.as_slice()) else {
            return Ok(None);
        };
        let Some(seq) = decompose(gate) else {
            return Ok(None);
        };
        check_reconstruction(pass, gate, &seq, tolerance)?;
        Ok(Some(
            seq.into_iter()
                .map(|g| Instruction::single_qubit_gate(g, *q))
                .collect(),
        ))
    })
}

macro_rules! basis_change_pass {
    ($(#[$meta:meta])* $name:ident, $symbol:literal, $decompose:path) => {
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

            /// Set the tolerance of the reconstruction check.
            #[must_use]
            pub fn with_tolerance(mut self, tolerance: f64) -> Self {
                self.tolerance = tolerance;
                self
            }
        }

        impl Transpiler for $name {
            fn name(&self) -> &'static str {
                $symbol
            }

            fn kind(&self) -> PassKind {
                PassKind::Transformation
            }

            #[instrument(skip(self, circuit), fields(instructions = circuit.len()))]
            fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
                rewrite_single_qubit(circuit, self.name(), self.tolerance, $decompose)
            }
        }
    };
}

fn universal_to_rz_rx_rz(gate: &StandardGate) -> Option<Vec<StandardGate>> {
    let StandardGate::Universal(theta, phi, lambda) = *gate else {
        return None;
    };
    Some(vec![
        StandardGate::PhaseShift(lambda - FRAC_PI_2),
        StandardGate::RotationX(theta),
        StandardGate::PhaseShift(phi + FRAC_PI_2),
    ])
}

fn universal_to_phase_and_x90(gate: &StandardGate) -> Option<Vec<StandardGate>> {
    let StandardGate::Universal(theta, phi, lambda) = *gate else {
        return None;
    };
    Some(vec![
        StandardGate::PhaseShift(lambda),
        StandardGate::X90,
        StandardGate::PhaseShift(theta - PI),
        StandardGate::X90,
        StandardGate::PhaseShift(phi + PI),
    ])
}

fn rx_to_rz_and_x90(gate: &StandardGate) -> Option<Vec<StandardGate>> {
    let StandardGate::RotationX(theta) = *gate else {
        return None;
    };
    Some(vec![
        StandardGate::Z90,
        StandardGate::X90,
        StandardGate::PhaseShift(theta - PI),
        StandardGate::X90,
        StandardGate::Z90,
    ])
}

basis_change_pass!(
    /// `Universal(θ, φ, λ)` to `PhaseShift(λ - π/2) → RotationX(θ) →
    /// PhaseShift(φ + π/2)`.
    CastUniversalToRzRxRz,
    "cast_universal_to_rz_rx_rz",
    universal_to_rz_rx_rz
);

basis_change_pass!(
    /// `Universal(θ, φ, λ)` to two `X90` pulses framed by phase gates:
    /// `PhaseShift(λ) → X90 → PhaseShift(θ - π) → X90 → PhaseShift(φ + π)`.
    CastToPhaseShiftAndHalfRotationX,
    "cast_to_phase_shift_and_half_rotation_x",
    universal_to_phase_and_x90
);

basis_change_pass!(
    /// `RotationX(θ)` to `Z90 → X90 → PhaseShift(θ - π) → X90 → Z90`.
    CastRxToRzAndHalfRotationX,
    "cast_rx_to_rz_and_half_rotation_x",
    rx_to_rz_and_x90
);
