// src/puzzle/round.rs

use crate::core::ClassicalBits;
use crate::correction::{Correction, bits_for_pair};
use crate::geometry::BlochVector;

/// Everything the puzzle knows about the round in progress.
///
/// Created when a round is dealt and thrown away on reset.
#[derive(Debug, Clone, PartialEq)]
pub struct PuzzleRound {
    /// Alice's state, the one being teleported.
    pub alice_vector: BlochVector,
    /// Bob's state before correction.
    pub bob_vector: BlochVector,
    /// Bits currently held for the round: the interpreted measurement after
    /// `measure`, then the player's choice after `send_bits`.
    pub classical_bits: Option<ClassicalBits>,
    /// The interpreted measurement, kept after `classical_bits` is replaced.
    pub measured_bits: Option<ClassicalBits>,
    pub chosen_correction: Option<Correction>,
    pub succeeded: Option<bool>,
    pub entangled: bool,
    /// Text for the player: the result, or why the round was aborted.
    pub message: Option<String>,
}

impl PuzzleRound {
    pub fn new(alice_vector: BlochVector, bob_vector: BlochVector) -> Self {
        Self {
            alice_vector,
            bob_vector,
            classical_bits: None,
            measured_bits: None,
            chosen_correction: None,
            succeeded: None,
            entangled: false,
            message: None,
        }
    }

    /// The bits whose correction maps Bob's vector back onto Alice's.
    pub fn expected_bits(&self) -> Option<ClassicalBits> {
        bits_for_pair(self.alice_vector, self.bob_vector)
    }

    /// The correction Bob needs for the bits currently held.
    pub fn required_correction(&self) -> Option<Correction> {
        self.classical_bits.map(ClassicalBits::required_correction)
    }
}
