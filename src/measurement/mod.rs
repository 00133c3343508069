// src/measurement/mod.rs

//! Turns a backend's outcome histogram into the bits Alice sends.

use crate::core::{ClassicalBits, QuestError};
use crate::simulation::Counts;
use tracing::debug;

/// Picks the most frequent bitstring and converts it to [`ClassicalBits`].
///
/// Backends list the highest classical bit first, while the puzzle reads the
/// qubit-0 result first, so the winning string is reversed before parsing.
/// Ties go to the first maximum in the map's lexicographic key order.
///
/// # Errors
/// * `QuestError::EmptyResult` if there are no observations at all.
/// * `QuestError::InvalidBits` if the winning key is not a 2-bit string.
pub fn interpret(counts: &Counts) -> Result<ClassicalBits, QuestError> {
    if counts.total() == 0 {
        return Err(QuestError::EmptyResult);
    }

    let mut best: Option<(&String, u64)> = None;
    for (bitstring, &n) in counts {
        if best.is_none_or(|(_, max)| n > max) {
            best = Some((bitstring, n));
        }
    }
    let (winner, n) = best.ok_or(QuestError::EmptyResult)?;

    let reversed: String = winner.chars().rev().collect();
    debug!(%winner, %reversed, count = n, "Interpreted measurement outcome");
    reversed.parse()
}
