//! Routing passes.
//!
//! [`SwapQubitsForAdjacency`] makes every multi-qubit gate act on coupled
//! qubits by wrapping it in a conveyor of `Swap` gates.
//! [`RemoveSwapBySwappingGates`] goes the other way and folds `Swap` gates
//! into a relabeling of the surrounding gates.

use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use quill_ir::{Instruction, QuantumCircuit, QubitId, StandardGate};

use crate::connectivity::Connectivity;
use crate::error::{CompileError, CompileResult};
use crate::pass::{PassKind, Transpiler};

/// A `Swap` between two qubits.
type Swap = (QubitId, QubitId);

/// Conveyor routing.
///
/// For a multi-qubit gate whose targets are not connected on the
/// connectivity, the smallest target becomes the anchor. The remaining
/// targets, nearest first, are swapped along a shortest path until they sit
/// next to an already placed target. The gate is applied to the new
/// positions and the swaps are then undone in reverse order, so every
/// qubit is back in place after the gate.
#[derive(Debug, Clone)]
pub struct SwapQubitsForAdjacency {
    connectivity: Connectivity,
}

impl SwapQubitsForAdjacency {
    /// Route for the given connectivity.
    pub fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }

    /// Get the connectivity.
    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// Swaps and remapped targets for one gate.
    fn route(&self, targets: &[QubitId]) -> CompileResult<(Vec<Swap>, Vec<QubitId>)> {
        let Some(&anchor) = targets.iter().min() else {
            return Ok((vec![], vec![]));
        };

        let mut order = Vec::with_capacity(targets.len() - 1);
        for &t in targets.iter().filter(|&&t| t != anchor) {
            order.push((self.connectivity.distance(t, anchor)?, t));
        }
        order.sort_unstable();

        // Current position of every target's state.
        let mut position: FxHashMap<QubitId, QubitId> =
            targets.iter().map(|&t| (t, t)).collect();
        let mut placed = vec![anchor];
        let mut swaps = vec![];

        for (_, target) in order {
            let mut current = position[&target];
            if !placed.iter().any(|&p| self.connectivity.are_adjacent(current, p)) {
                // Path from the nearest placed position back to `current`.
                let mut best: Option<Vec<QubitId>> = None;
                for &p in &placed {
                    let others: Vec<QubitId> =
                        placed.iter().copied().filter(|&o| o != p).collect();
                    let path = self.connectivity.path_search(current, p, &others)?;
                    if !path.is_empty() && best.as_ref().is_none_or(|b| path.len() < b.len()) {
                        best = Some(path);
                    }
                }
                let path = best.ok_or(CompileError::RoutingFailed {
                    origin: current,
                    target: anchor,
                })?;

                // path = [p, .., current]; walk from current down to path[1].
                for step in (1..path.len() - 1).rev() {
                    let next = path[step];
                    swaps.push((current, next));
                    for pos in position.values_mut() {
                        if *pos == current {
                            *pos = next;
                        } else if *pos == next {
                            *pos = current;
                        }
                    }
                    current = next;
                }
            }
            placed.push(current);
        }

        let remapped = targets.iter().map(|t| position[t]).collect();
        Ok((swaps, remapped))
    }
}

impl Transpiler for SwapQubitsForAdjacency {
    fn name(&self) -> &'static str {
        "swap_qubits_for_adjacency"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn should_run(&self, _circuit: &QuantumCircuit) -> bool {
        !matches!(self.connectivity, Connectivity::AllToAll)
    }

    #[instrument(skip(self, circuit), fields(connectivity = self.connectivity.kind()))]
    fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
        let mut output = circuit.empty_like();
        let mut inserted = 0usize;

        for inst in circuit.instructions() {
            let needs_routing = inst.is_gate()
                && inst.qubits.len() > 1
                && !self.connectivity.is_connected_set(&inst.qubits);
            if !needs_routing {
                output.append(inst.clone())?;
                continue;
            }

            let (swaps, remapped) = self.route(&inst.qubits)?;
            for &(a, b) in &swaps {
                output.append(Instruction::two_qubit_gate(StandardGate::Swap, a, b))?;
            }
            output.append(inst.with_qubits(remapped))?;
            for &(a, b) in swaps.iter().rev() {
                output.append(Instruction::two_qubit_gate(StandardGate::Swap, a, b))?;
            }
            inserted += 2 * swaps.len();
        }

        debug!(inserted, "routed multi-qubit gates");
        Ok(output)
    }
}

/// Remove `Swap` gates by relabeling the gates before them.
///
/// A swap acting on the all-zero state is a no-op, so each swap can be
/// pushed to the front of the circuit by exchanging its qubits in every
/// earlier instruction, and then dropped. The result is only equivalent for
/// the all-zero input, and relabeled gates may no longer respect a
/// restricted connectivity.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveSwapBySwappingGates;

impl Transpiler for RemoveSwapBySwappingGates {
    fn name(&self) -> &'static str {
        "remove_swap_by_swapping_gates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn should_run(&self, circuit: &QuantumCircuit) -> bool {
        circuit.gate_counts().contains_key("swap")
    }

    fn transpile(&self, circuit: &QuantumCircuit) -> CompileResult<QuantumCircuit> {
        // Relabeling applied to everything before the current position.
        let mut relabel: FxHashMap<QubitId, QubitId> = FxHashMap::default();
        let map = |relabel: &FxHashMap<QubitId, QubitId>, q: QubitId| {
            relabel.get(&q).copied().unwrap_or(q)
        };

        let mut reversed = Vec::with_capacity(circuit.len());
        for inst in circuit.instructions().iter().rev() {
            if inst.as_gate() == Some(&StandardGate::Swap) {
                if let [a, b] = inst.qubits[..] {
                    let (ma, mb) = (map(&relabel, a), map(&relabel, b));
                    for value in relabel.values_mut() {
                        if *value == ma {
                            *value = mb;
                        } else if *value == mb {
                            *value = ma;
                        }
                    }
                    // Labels not yet in the map are fixed points.
                    relabel.entry(a).or_insert(mb);
                    relabel.entry(b).or_insert(ma);
                    continue;
                }
            }
            let qubits = inst.qubits.iter().map(|&q| map(&relabel, q)).collect();
            reversed.push(inst.with_qubits(qubits));
        }

        let removed = circuit.len() - reversed.len();
        let output = QuantumCircuit::from_instructions(
            circuit.name(),
            circuit.qubit_count(),
            circuit.bit_count(),
            reversed.into_iter().rev(),
        )?;
        debug!(removed, "folded swaps into relabeling");
        Ok(output)
    }
}
