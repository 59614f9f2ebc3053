//! Gate fusion passes.

use num_complex::Complex64;
use quill_ir::{DEFAULT_TOLERANCE, QuantumCircuit, QubitId, StandardGate};
use tracing::{debug, instrument};

use crate::error::{CompileError, CompileResult};
use crate::pass::{PassKind, Transpiler};
use crate::passes::agnostic::scheduler::schedule_blocks;
use crate::unitary::Unitary2x2;

/// Product of a run of single-qubit gates in application order.
fn run_product(qubit: QubitId, run: &[StandardGate], pass: &str) -> CompileResult<Unitary2x2> {
    run.iter().try_fold(Unitary2x2::identity(), |acc, gate| {
        let u = Unitary2x2::from_gate(gate).ok_or_else(|| CompileError::NumericConsistency {
            pass: pass.into(),
            detail: format!("gate '{gate}' on {qubit} is not a single-qubit unitary"),
        })?;
        Ok(u * acc)
    })
}

/// Single-qubit gate fusion.
///
/// Per qubit, maximal runs of single-qubit gates between boundaries are
/// multiplied and replaced by one `Universal` gate. Runs that multiply to
/// identity (up to global phase) are dropped. Runs of a single gate are left
/// untouched unless [`fuse_singletons`](Self::fuse_singletons) is set.
#[derive(Debug, Clone)]
pub struct CompressSingleQubitGates {
    tolerance: f64,
    fuse_singletons: bool,
}

impl Default for CompressSingleQubitGates {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressSingleQubitGates {
    /// Create the pass with the default tolerance.
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            fuse_singletons: false,
        }
    }

    /// Set the numeric tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Also rewrite runs of one gate into `Universal`.
    #[must_use]
    pub fn fuse_singletons(mut self, enabled: bool) -> Self {
        self.fuse_singletons = enabled;
        self
    }

    fn fuse(&self, qubit: QubitId, run: &[StandardGate]) -> CompileResult<Vec<StandardGate>> {
        if run.len() == 1 && !self.fuse_singletons {
            return Ok(run.to_vec());
        }

        let product = run_product(qubit, run, self.name())?;
        if product.is_identity(self.tolerance) {
            return Ok(vec![]);
        }

        let (theta, phi, lambda) = product.universal_angles(self.tolerance);
        let fused = StandardGate::Universal(theta, phi, lambda);
        let rebuilt = Unitary2x2::from_operator(&fused.operator())
            .filter(|u| product.equal_up_to_global_phase(u, self.tolerance));
        if rebuilt.is_none() {
            return Err(CompileError::NumericConsistency {
                pass: self.name().into(),
                detail: format!("{fused} does not reproduce the fused run on {qubit}"),
            });
        }
        Ok(vec![fused])
    }
}

impl Transpiler for CompressSingleQubitGates {
    fn name(&self) -> &'static str {
        "compress_single_qubit_gates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    #[instrument(skip(self, circuit), fields(instructions = circuit.len()))]
    fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
        let outcome = schedule_blocks(circuit, |_| true, |q, run| self.fuse(q, run))?;
        debug!(
            rounds = outcome.rounds,
            before = circuit.len(),
            after = outcome.circuit.len(),
            "fused single-qubit runs"
        );
        Ok(outcome.circuit)
    }
}

/// Phase-gate fusion.
///
/// Runs of `Z`, `Pi8`, `Pi8Dagger`, `Z90`, `ZM90`, `RotationZ` and
/// `PhaseShift` are multiplied into a single `PhaseShift`. Any other gate,
/// single-qubit or not, ends a run.
#[derive(Debug, Clone)]
pub struct CompressRzGates {
    tolerance: f64,
}

impl Default for CompressRzGates {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressRzGates {
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

    fn fuse(&self, qubit: QubitId, run: &[StandardGate]) -> CompileResult<Vec<StandardGate>> {
        if run.len() == 1 {
            return Ok(run.to_vec());
        }

        let product = run_product(qubit, run, self.name())?;
        if !product.is_diagonal(self.tolerance) {
            return Err(CompileError::NumericConsistency {
                pass: self.name().into(),
                detail: format!("phase run on {qubit} is not diagonal"),
            });
        }
        let [a, _, _, d] = product.data;
        let relative: Complex64 = d / a;
        if (relative - Complex64::new(1.0, 0.0)).norm() < self.tolerance {
            return Ok(vec![]);
        }
        Ok(vec![StandardGate::PhaseShift(relative.arg())])
    }
}

impl Transpiler for CompressRzGates {
    fn name(&self) -> &'static str {
        "compress_rz_gates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    #[instrument(skip(self, circuit), fields(instructions = circuit.len()))]
    fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
        let outcome = schedule_blocks(circuit, StandardGate::is_phase_type, |q, run| {
            self.fuse(q, run)
        })?;
        debug!(
            rounds = outcome.rounds,
            before = circuit.len(),
            after = outcome.circuit.len(),
            "fused phase runs"
        );
        Ok(outcome.circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn gates(circuit: &QuantumCircuit) -> Vec<StandardGate> {
        circuit
            .instructions()
            .iter()
            .filter_map(|i| i.as_gate().cloned())
            .collect()
    }

    #[test]
    fn test_fuses_run_into_universal() {
        let mut circuit = QuantumCircuit::new(1);
        circuit
            .h(QubitId(1))
            .unwrap()
            .t(QubitId(1))
            .unwrap()
            .ry(0.3, QubitId(1))
            .unwrap();

        let out = CompressSingleQubitGates::new().transpile(&circuit).unwrap();
        assert_eq!(out.len(), 1);
        assert!(matches!(gates(&out)[0], StandardGate::Universal(..)));
    }

    #[test]
    fn test_identity_run_is_dropped() {
        let mut circuit = QuantumCircuit::new(1);
        circuit.h(QubitId(1)).unwrap().h(QubitId(1)).unwrap();
        let out = CompressSingleQubitGates::new().transpile(&circuit).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_singletons_kept_unless_enabled() {
        let mut circuit = QuantumCircuit::new(2);
        circuit
            .h(QubitId(1))
            .unwrap()
            .cz(QubitId(1), QubitId(2))
            .unwrap()
            .x(QubitId(2))
            .unwrap();

        let out = CompressSingleQubitGates::new().transpile(&circuit).unwrap();
        assert_eq!(out.instructions(), circuit.instructions());

        let fused = CompressSingleQubitGates::new()
            .fuse_singletons(true)
            .transpile(&circuit)
            .unwrap();
        let kinds: Vec<&str> = fused.instructions().iter().map(|i| i.name()).collect();
        assert_eq!(kinds, vec!["u", "cz", "u"]);
    }

    #[test]
    fn test_readout_is_a_boundary() {
        let mut circuit = QuantumCircuit::new(1);
        circuit
            .x(QubitId(1))
            .unwrap()
            .y(QubitId(1))
            .unwrap()
            .readout_all()
            .unwrap();
        let out = CompressSingleQubitGates::new().transpile(&circuit).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.instructions()[1].is_readout());
    }

    #[test]
    fn test_compress_rz_merges_phases() {
        let mut circuit = QuantumCircuit::new(1);
        circuit
            .t(QubitId(1))
            .unwrap()
            .z90(QubitId(1))
            .unwrap()
            .rz(0.5, QubitId(1))
            .unwrap()
            .h(QubitId(1))
            .unwrap()
            .z(QubitId(1))
            .unwrap();

        let out = CompressRzGates::new().transpile(&circuit).unwrap();
        let g = gates(&out);
        assert_eq!(g.len(), 3);
        match g[0] {
            StandardGate::PhaseShift(phi) => {
                assert!((phi - (PI / 4.0 + PI / 2.0 + 0.5)).abs() < 1e-9);
            }
            ref other => panic!("expected PhaseShift, got {other}"),
        }
        assert_eq!(g[1], StandardGate::Hadamard);
        assert_eq!(g[2], StandardGate::Z);
    }

    #[test]
    fn test_compress_rz_drops_cancelling_phases() {
        let mut circuit = QuantumCircuit::new(1);
        circuit.t(QubitId(1)).unwrap().tdg(QubitId(1)).unwrap();
        let out = CompressRzGates::new().transpile(&circuit).unwrap();
        assert!(out.is_empty());
    }
}
