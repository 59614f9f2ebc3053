//! Block scheduler shared by the fusion passes.
//!
//! The scheduler splits each qubit's instruction stream into maximal runs
//! of fusible single-qubit gates separated by boundaries (multi-qubit gates,
//! readouts and single-qubit gates the caller does not fuse). It then works
//! in rounds:
//!
//! 1. every qubit drains the run at the head of its stream through the
//!    caller's fuse function;
//! 2. boundaries are emitted in their original global order while the next
//!    one is at the head of every stream it touches.
//!
//! Boundaries therefore keep their relative order, while independent runs on
//! different qubits may move relative to each other. The earliest pending
//! boundary is always ready after step 1, so each round emits at least one
//! boundary and the loop ends within `instruction_count + 1` rounds. The
//! bound is checked and exceeding it is reported as
//! [`CompileError::SchedulerStalled`].

use quill_ir::{Instruction, QuantumCircuit, QubitId, StandardGate};
use tracing::trace;

use crate::error::{CompileError, CompileResult};

/// Output of [`schedule_blocks`].
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    /// The rewritten circuit.
    pub circuit: QuantumCircuit,
    /// Rounds the scheduler needed.
    pub rounds: usize,
}

/// Fuse maximal per-qubit runs of instructions accepted by `is_fusible`.
///
/// `is_fusible` is only consulted for single-qubit gates. `fuse` receives a
/// qubit and the run's gates in application order and returns the gates to
/// emit in its place (possibly none).
pub fn schedule_blocks<P, F>(
    circuit: &QuantumCircuit,
    is_fusible: P,
    mut fuse: F,
) -> CompileResult<ScheduleOutcome>
where
    P: Fn(&StandardGate) -> bool,
    F: FnMut(QubitId, &[StandardGate]) -> CompileResult<Vec<StandardGate>>,
{
    let instructions = circuit.instructions();
    let fusible: Vec<bool> = instructions
        .iter()
        .map(|inst| {
            inst.as_gate()
                .is_some_and(|g| g.is_single_qubit() && is_fusible(g))
        })
        .collect();

    // Per-qubit streams of instruction indices (index 0 = qubit 1).
    let mut streams: Vec<Vec<usize>> = vec![vec![]; circuit.qubit_count() as usize];
    for (idx, inst) in instructions.iter().enumerate() {
        for q in &inst.qubits {
            streams[q.index()].push(idx);
        }
    }
    let boundaries: Vec<usize> = (0..instructions.len()).filter(|&i| !fusible[i]).collect();

    let mut cursors = vec![0usize; streams.len()];
    let mut next_boundary = 0;
    let mut output = circuit.empty_like();
    let max_rounds = instructions.len() + 1;
    let mut rounds = 0;

    loop {
        rounds += 1;
        if rounds > max_rounds {
            return Err(CompileError::SchedulerStalled { rounds: max_rounds });
        }

        // Drain the run at the head of every stream.
        for (q, stream) in streams.iter().enumerate() {
            let start = cursors[q];
            let mut end = start;
            while end < stream.len() && fusible[stream[end]] {
                end += 1;
            }
            if end == start {
                continue;
            }

            let run: Vec<StandardGate> = stream[start..end]
                .iter()
                .filter_map(|&i| instructions[i].as_gate().cloned())
                .collect();
            let qubit = QubitId(q as u32 + 1);
            for gate in fuse(qubit, &run)? {
                output.append(Instruction::single_qubit_gate(gate, qubit))?;
            }
            cursors[q] = end;
        }

        // Emit ready boundaries in global order.
        while let Some(&b) = boundaries.get(next_boundary) {
            let ready = instructions[b]
                .qubits
                .iter()
                .all(|q| streams[q.index()].get(cursors[q.index()]) == Some(&b));
            if !ready {
                break;
            }
            output.append(instructions[b].clone())?;
            for q in &instructions[b].qubits {
                cursors[q.index()] += 1;
            }
            next_boundary += 1;
        }

        let drained = cursors
            .iter()
            .zip(&streams)
            .all(|(&c, stream)| c == stream.len());
        if drained && next_boundary == boundaries.len() {
            trace!(rounds, "block schedule complete");
            return Ok(ScheduleOutcome {
                circuit: output,
                rounds,
            });
        }
    }
}
