//! Circuit simulation and shot sampling.

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use quill_ir::QuantumCircuit;

use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Run `circuit` on |0...0⟩ and return the final state.
///
/// Readouts do not collapse the state.
#[instrument(skip(circuit), fields(qubits = circuit.qubit_count()))]
pub fn simulate(circuit: &QuantumCircuit) -> SimResult<Statevector> {
    simulate_from(circuit, Statevector::new(circuit.qubit_count())?)
}

/// Run `circuit` on a given initial state.
pub fn simulate_from(circuit: &QuantumCircuit, mut state: Statevector) -> SimResult<Statevector> {
    debug!(
        "Simulating {} instructions on {} qubits",
        circuit.len(),
        state.qubit_count()
    );
    for instruction in circuit.instructions() {
        state.apply(instruction)?;
    }
    Ok(state)
}

/// Draw `shots` basis-state labels from the final state of `circuit`.
///
/// Samples are independent draws with replacement from `|amplitude|²`.
/// Labels list qubit 1 first.
pub fn simulate_shots(circuit: &QuantumCircuit, shots: usize) -> SimResult<Vec<String>> {
    simulate_shots_with_rng(circuit, shots, &mut rand::thread_rng())
}

/// [`simulate_shots`] with a caller-supplied random source.
#[instrument(skip(circuit, rng), fields(qubits = circuit.qubit_count()))]
pub fn simulate_shots_with_rng<R: Rng + ?Sized>(
    circuit: &QuantumCircuit,
    shots: usize,
    rng: &mut R,
) -> SimResult<Vec<String>> {
    let state = simulate(circuit)?;
    let weights = WeightedIndex::new(state.probabilities())
        .map_err(|e| SimError::Sampling(e.to_string()))?;

    let samples: Vec<String> = (0..shots)
        .map(|_| state.label(weights.sample(rng)))
        .collect();
    debug!("Drew {} shots", samples.len());
    Ok(samples)
}

/// Tally sampled labels.
pub fn counts(samples: &[String]) -> FxHashMap<&str, usize> {
    let mut counts = FxHashMap::default();
    for label in samples {
        *counts.entry(label.as_str()).or_insert(0) += 1;
    }
    counts
}
