// src/operations/mod.rs

//! Defines the gate-level operations a teleportation circuit is built from.
//!
//! The set is intentionally small: state preparation, the single-qubit Pauli
//! and Hadamard gates, controlled-NOT, a barrier, and terminal measurement.
//! That is everything the protocol and Bob's corrections need.

use crate::core::{ClbitId, QubitId};
use num_complex::Complex64;

/// A single step of a circuit description.
#[derive(Debug, Clone, PartialEq)] // f64 amplitudes rule out Eq
pub enum Operation {
    /// Prepares `target`, assumed to be in |0>, in the state
    /// `amplitudes[0]|0> + amplitudes[1]|1>`.
    ///
    /// Analogy: `qiskit.circuit.library.Initialize` on a fresh qubit.
    Initialize {
        /// The qubit being prepared.
        target: QubitId,
        /// Amplitudes of |0> and |1>; must be normalized.
        amplitudes: [Complex64; 2],
    },

    /// Hadamard gate.
    Hadamard {
        target: QubitId,
    },

    /// Bit-flip.
    PauliX {
        target: QubitId,
    },

    /// Combined bit and phase flip.
    PauliY {
        target: QubitId,
    },

    /// Phase-flip.
    PauliZ {
        target: QubitId,
    },

    /// Flips `target` when `control` is |1>.
    ControlledNot {
        /// The qubit whose |1> component triggers the flip.
        control: QubitId,
        /// The qubit being flipped.
        target: QubitId,
    },

    /// Visual separator; has no effect on the state.
    Barrier {
        qubits: Vec<QubitId>,
    },

    /// Measures `qubit` in the computational basis into classical bit `clbit`.
    /// Measurements are terminal: nothing may act on the qubit afterwards.
    Measure {
        qubit: QubitId,
        clbit: ClbitId,
    },
}

impl Operation {
    /// Returns a list of all qubits directly mentioned in the operation's parameters.
    pub fn involved_qubits(&self) -> Vec<QubitId> {
        match self {
            Operation::Initialize { target, .. }
            | Operation::Hadamard { target }
            | Operation::PauliX { target }
            | Operation::PauliY { target }
            | Operation::PauliZ { target } => vec![*target],
            Operation::ControlledNot { control, target } => vec![*control, *target],
            Operation::Barrier { qubits } => qubits.clone(),
            Operation::Measure { qubit, .. } => vec![*qubit],
        }
    }

    /// Whether the operation changes the quantum state (barriers and
    /// measurements do not).
    pub fn is_gate(&self) -> bool {
        !matches!(self, Operation::Barrier { .. } | Operation::Measure { .. })
    }
}
