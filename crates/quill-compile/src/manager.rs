//! Pipeline orchestration.

use tracing::{debug, info, instrument};

use quill_ir::{DEFAULT_TOLERANCE, QuantumCircuit};

use crate::error::CompileResult;
use crate::pass::{PassKind, Transpiler};
use crate::passes::{
    CastCXToCZGate, CastISwapToCZGate, CastRxToRzAndHalfRotationX, CastSwapToCZGate,
    CastToffoliToCXGate, CastUniversalToRzRxRz, CompressRzGates, CompressSingleQubitGates,
    NativeGateVerification, ReadoutsAreFinalInstructions, ReadoutsDoNotConflict, SimplifyRxGates,
    SimplifyRzGates, SimplifyTrivialGates, SwapQubitsForAdjacency, UnsupportedGatesTranspiler,
};
use crate::connectivity::Connectivity;
use crate::target::{NativeGateSet, Target};

/// Runs a sequence of stages left to right.
///
/// A `SequentialTranspiler` is itself a [`Transpiler`], so pipelines nest.
#[derive(Default)]
pub struct SequentialTranspiler {
    /// The stages to execute, in order.
    stages: Vec<Box<dyn Transpiler>>,
}

impl SequentialTranspiler {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self { stages: vec![] }
    }

    /// Append a stage.
    pub fn add_pass(&mut self, stage: impl Transpiler + 'static) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Append a stage, builder style.
    #[must_use]
    pub fn with_pass(mut self, stage: impl Transpiler + 'static) -> Self {
        self.add_pass(stage);
        self
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Get the number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Check if the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl std::fmt::Debug for SequentialTranspiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequentialTranspiler")
            .field("stages", &self.stage_names())
            .finish()
    }
}

impl Transpiler for SequentialTranspiler {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn kind(&self) -> PassKind {
        if self
            .stages
            .iter()
            .all(|s| s.kind() == PassKind::Analysis)
        {
            PassKind::Analysis
        } else {
            PassKind::Transformation
        }
    }

    #[instrument(skip(self, circuit), fields(stages = self.stages.len()))]
    fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
        info!(
            "Running {} stages on circuit '{}' with {} qubits and {} instructions",
            self.stages.len(),
            circuit.name(),
            circuit.qubit_count(),
            circuit.len()
        );

        let mut current = circuit.clone();
        for stage in &self.stages {
            if stage.should_run(&current) {
                debug!("Running stage: {}", stage.name());
                current = stage.transpile(&current)?;
                debug!("Stage {} completed, instructions: {}", stage.name(), current.len());
            } else {
                debug!("Skipping stage: {}", stage.name());
            }
        }

        info!("Pipeline completed, instructions: {}", current.len());
        Ok(current)
    }
}

/// Run `pipeline` on `circuit`.
pub fn transpile<T: Transpiler + ?Sized>(
    pipeline: &T,
    circuit: &QuantumCircuit,
) -> CompileResult<QuantumCircuit> {
    pipeline.transpile(circuit)
}

/// Builder for the standard native pipeline.
///
/// The pipeline validates the input, lowers Toffoli gates, routes onto the
/// target connectivity, lowers every two-qubit gate to CZ, fuses and
/// re-expresses single-qubit gates with `X90` pulses and phase gates, and
/// finally checks the result against the target's native gate set.
#[derive(Debug, Clone)]
pub struct TranspilerBuilder {
    /// Numeric tolerance handed to every stage that has one.
    tolerance: f64,
    /// Execution target.
    target: Target,
}

impl TranspilerBuilder {
    /// Create a builder for an all-to-all target with the default native set.
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            target: Target::new(Connectivity::AllToAll, NativeGateSet::default()),
        }
    }

    /// Set the numeric tolerance used by every stage.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the execution target.
    #[must_use]
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Build the pipeline.
    pub fn build(self) -> SequentialTranspiler {
        let tol = self.tolerance;
        let mut pipeline = SequentialTranspiler::new();

        // Validation
        pipeline
            .add_pass(UnsupportedGatesTranspiler)
            .add_pass(ReadoutsAreFinalInstructions)
            .add_pass(ReadoutsDoNotConflict);

        // Routing happens on CX so Toffoli is lowered first.
        pipeline
            .add_pass(CastToffoliToCXGate)
            .add_pass(SwapQubitsForAdjacency::new(self.target.connectivity))
            .add_pass(CastISwapToCZGate)
            .add_pass(CastSwapToCZGate)
            .add_pass(CastCXToCZGate);

        // Single-qubit lowering
        pipeline
            .add_pass(
                CompressSingleQubitGates::new()
                    .with_tolerance(tol)
                    .fuse_singletons(true),
            )
            .add_pass(SimplifyTrivialGates::new().with_tolerance(tol))
            .add_pass(CastUniversalToRzRxRz::new().with_tolerance(tol))
            .add_pass(SimplifyRxGates::new().with_tolerance(tol))
            .add_pass(CastRxToRzAndHalfRotationX::new().with_tolerance(tol))
            .add_pass(CompressRzGates::new().with_tolerance(tol))
            .add_pass(SimplifyRzGates::new().with_tolerance(tol))
            .add_pass(SimplifyTrivialGates::new().with_tolerance(tol));

        pipeline.add_pass(NativeGateVerification::new(self.target.native_gates));
        pipeline
    }
}

impl Default for TranspilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
