//! Transpiler trait and types for pipeline stages.

use quill_ir::QuantumCircuit;

use crate::error::CompileResult;

/// The kind of pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Validation stage that checks the circuit and returns it unchanged.
    Analysis,
    /// Rewrite stage that returns a new circuit.
    Transformation,
}

/// A pipeline stage: a pure function from circuit to circuit.
///
/// Stages hold only fixed configuration (tolerance, target). They never
/// mutate the input; a rewrite builds and returns a new circuit, and a
/// validation stage returns an unchanged copy or an error.
pub trait Transpiler: Send + Sync {
    /// Get the name of this stage.
    fn name(&self) -> &str;

    /// Get the kind of this stage.
    fn kind(&self) -> PassKind;

    /// Run the stage.
    fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit>;

    /// Check if this stage should run on the given circuit.
    ///
    /// Skipped stages pass the circuit through unchanged.
    fn should_run(&self, _circuit: &QuantumCircuit) -> bool {
        true
    }
}

impl<T: Transpiler + ?Sized> Transpiler for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn kind(&self) -> PassKind {
        (**self).kind()
    }

    fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
        (**self).transpile(circuit)
    }

    fn should_run(&self, circuit: &QuantumCircuit) -> bool {
        (**self).should_run(circuit)
    }
}
