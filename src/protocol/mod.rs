// src/protocol/mod.rs

//! Encodes the teleportation protocol as a circuit description.
//!
//! Qubit layout:
//! - `q0`: Alice's message qubit, prepared from her Bloch vector
//! - `q1`: Alice's half of the Bell pair
//! - `q2`: Bob's half of the Bell pair
//!
//! Alice's Bell-basis measurement lands in `c0` (from `q0`) and `c1` (from `q1`).

use crate::circuits::{Circuit, CircuitBuilder};
use crate::core::{ClbitId, QubitId};
use crate::geometry::{BlochVector, to_amplitudes};
use crate::operations::Operation;

pub const MESSAGE_QUBIT: QubitId = QubitId(0);
pub const ALICE_QUBIT: QubitId = QubitId(1);
pub const BOB_QUBIT: QubitId = QubitId(2);

/// Builds the 3-qubit, 2-bit teleportation circuit for Alice's vector:
/// state preparation, Bell pair, Bell-basis rotation, and measurement of
/// Alice's two qubits.
pub fn build_teleportation_circuit(alice: BlochVector) -> Circuit {
    let (alpha, beta) = to_amplitudes(alice);

    CircuitBuilder::new(3, 2)
        // 1. Prepare the message qubit
        .add_op(Operation::Initialize {
            target: MESSAGE_QUBIT,
            amplitudes: [alpha, beta],
        })
        .add_op(Operation::Barrier {
            qubits: vec![MESSAGE_QUBIT, ALICE_QUBIT, BOB_QUBIT],
        })
        // 2. Bell pair between Alice and Bob
        .add_op(Operation::Hadamard { target: ALICE_QUBIT })
        .add_op(Operation::ControlledNot {
            control: ALICE_QUBIT,
            target: BOB_QUBIT,
        })
        // 3. Rotate Alice's pair into the Bell basis
        .add_op(Operation::ControlledNot {
            control: MESSAGE_QUBIT,
            target: ALICE_QUBIT,
        })
        .add_op(Operation::Hadamard { target: MESSAGE_QUBIT })
        // 4. Measure Alice's qubits
        .add_op(Operation::Measure {
            qubit: MESSAGE_QUBIT,
            clbit: ClbitId(0),
        })
        .add_op(Operation::Measure {
            qubit: ALICE_QUBIT,
            clbit: ClbitId(1),
        })
        .build()
}
