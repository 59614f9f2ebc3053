//! Property-based tests for circuit inversion.
//!
//! Tests that inverting a circuit twice reproduces its instruction list
//! exactly and that every gate's inverse is its adjoint.

use quill_ir::{QuantumCircuit, QubitId, StandardGate};
use proptest::prelude::*;

/// Generate a random gate-only circuit with 1-5 qubits and 1-12 gates.
fn arb_circuit() -> impl Strategy<Value = QuantumCircuit> {
    (1_u32..=5).prop_flat_map(|num_qubits| {
        (
            Just(num_qubits),
            prop::collection::vec(arb_gate_op(num_qubits), 1..=12),
        )
            .prop_map(|(nq, ops)| {
                let mut circuit = QuantumCircuit::new(nq);
                for (gate, qubits) in ops {
                    let _ = circuit.gate(gate, qubits.into_iter().map(QubitId));
                }
                circuit
            })
    })
}

fn arb_angle() -> impl Strategy<Value = f64> {
    -10.0_f64..10.0
}

fn arb_single_gate() -> impl Strategy<Value = StandardGate> {
    prop_oneof![
        Just(StandardGate::Hadamard),
        Just(StandardGate::X),
        Just(StandardGate::Y),
        Just(StandardGate::Pi8),
        Just(StandardGate::X90),
        Just(StandardGate::YM90),
        Just(StandardGate::Z90),
        arb_angle().prop_map(StandardGate::RotationX),
        arb_angle().prop_map(StandardGate::RotationZ),
        (arb_angle(), arb_angle()).prop_map(|(t, p)| StandardGate::Rotation(t, p)),
        arb_angle().prop_map(StandardGate::PhaseShift),
        (arb_angle(), arb_angle(), arb_angle())
            .prop_map(|(t, p, l)| StandardGate::Universal(t, p, l)),
    ]
}

/// Generate a gate together with 1-based target qubits.
fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = (StandardGate, Vec<u32>)> {
    let single = (arb_single_gate(), 1..=num_qubits).prop_map(|(g, q)| (g, vec![q]));
    if num_qubits < 2 {
        return single.boxed();
    }
    let two = (
        prop_oneof![
            Just(StandardGate::ControlX),
            Just(StandardGate::ControlZ),
            Just(StandardGate::Swap),
            Just(StandardGate::ISwap),
            Just(StandardGate::ISwapDagger),
        ],
        1..=num_qubits,
        1..=num_qubits,
    )
        .prop_filter("targets must differ", |(_, a, b)| a != b)
        .prop_map(|(g, a, b)| (g, vec![a, b]));
    prop_oneof![3 => single, 1 => two].boxed()
}

proptest! {
    #[test]
    fn test_double_inverse_is_identity(circuit in arb_circuit()) {
        let twice = circuit.inverse().unwrap().inverse().unwrap();
        prop_assert_eq!(twice.instructions(), circuit.instructions());
        prop_assert_eq!(twice.qubit_count(), circuit.qubit_count());
    }

    #[test]
    fn test_gate_inverse_is_adjoint(gate in arb_single_gate()) {
        let inverse = gate.inverse().unwrap();
        prop_assert!(inverse.operator().approx_eq(&gate.operator().adjoint(), 1e-12));
    }
}
