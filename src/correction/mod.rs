// src/correction/mod.rs

//! The correction table Bob consults and the catalogue of vector pairs the
//! puzzle knows how to explain.
//!
//! Both are authored constant data. The checks here are deliberately coarse:
//! the puzzle only uses eight points spaced 45° apart, so a 0.4 tolerance per
//! coordinate separates them comfortably.

use crate::core::constants::quest_constants::S;
use crate::core::{CATALOGUE_TOLERANCE, ClassicalBits, IDENTITY_TOLERANCE, QubitId, QuestError};
use crate::geometry::BlochVector;
use crate::operations::Operation;
use crate::puzzle::PuzzleRound;
use std::fmt;
use std::str::FromStr;

/// The gate Bob applies to his qubit after receiving Alice's bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Correction {
    /// Identity, no correction needed.
    I,
    /// Bit-flip (0 <-> 1).
    X,
    /// Phase-flip (+ <-> -).
    Z,
    /// Bit and phase flip.
    XZ,
}

impl Correction {
    /// All corrections in button order.
    pub const ALL: [Correction; 4] = [Correction::I, Correction::X, Correction::Z, Correction::XZ];

    pub fn as_str(self) -> &'static str {
        match self {
            Correction::I => "I",
            Correction::X => "X",
            Correction::Z => "Z",
            Correction::XZ => "XZ",
        }
    }

    /// Effect of the correction on a point of the x–z great circle.
    /// X mirrors through the equator (z -> -z), Z mirrors through the
    /// z axis (x -> -x).
    pub fn apply(self, v: BlochVector) -> BlochVector {
        match self {
            Correction::I => v,
            Correction::X => BlochVector::new(v.x, -v.z),
            Correction::Z => BlochVector::new(-v.x, v.z),
            Correction::XZ => v.negate(),
        }
    }

    /// Gate sequence applying this correction to `target`: X first, then Z.
    pub fn operations(self, target: QubitId) -> Vec<Operation> {
        match self {
            Correction::I => Vec::new(),
            Correction::X => vec![Operation::PauliX { target }],
            Correction::Z => vec![Operation::PauliZ { target }],
            Correction::XZ => vec![Operation::PauliX { target }, Operation::PauliZ { target }],
        }
    }
}

impl FromStr for Correction {
    type Err = QuestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "I" => Ok(Correction::I),
            "X" => Ok(Correction::X),
            "Z" => Ok(Correction::Z),
            "XZ" => Ok(Correction::XZ),
            other => Err(QuestError::InvalidOperation {
                message: format!("Unknown correction '{}'", other),
            }),
        }
    }
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bits -> correction, one entry per pattern.
pub const CORRECTION_TABLE: [(ClassicalBits, Correction); 4] = [
    (ClassicalBits::B00, Correction::I),
    (ClassicalBits::B01, Correction::X),
    (ClassicalBits::B10, Correction::Z),
    (ClassicalBits::B11, Correction::XZ),
];

impl ClassicalBits {
    /// The correction Bob must apply for these bits.
    pub fn required_correction(self) -> Correction {
        match self {
            ClassicalBits::B00 => Correction::I,
            ClassicalBits::B01 => Correction::X,
            ClassicalBits::B10 => Correction::Z,
            ClassicalBits::B11 => Correction::XZ,
        }
    }
}

/// Looks up the correction for a textual bit pattern.
///
/// # Errors
/// `QuestError::InvalidBits` if `bits` is not one of the four legal patterns.
pub fn required_correction(bits: &str) -> Result<Correction, QuestError> {
    let bits: ClassicalBits = bits.parse()?;
    Ok(bits.required_correction())
}

/// One physically consistent (Alice, Bob) arrangement and the bits that
/// explain it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidCombo {
    pub bits: ClassicalBits,
    pub alice: BlochVector,
    pub bob: BlochVector,
}

const fn combo(bits: ClassicalBits, alice: (f64, f64), bob: (f64, f64)) -> ValidCombo {
    ValidCombo {
        bits,
        alice: BlochVector::new(alice.0, alice.1),
        bob: BlochVector::new(bob.0, bob.1),
    }
}

/// Catalogue of the non-trivial pairs. The identity relation ("00") is
/// handled separately by [`is_consistent_pair`].
pub const VALID_COMBOS: [ValidCombo; 16] = [
    // 01: bit-flip
    combo(ClassicalBits::B01, (0.0, 1.0), (0.0, -1.0)),
    combo(ClassicalBits::B01, (0.0, -1.0), (0.0, 1.0)),
    combo(ClassicalBits::B01, (S, S), (S, -S)),
    combo(ClassicalBits::B01, (-S, S), (-S, -S)),
    combo(ClassicalBits::B01, (S, -S), (S, S)),
    combo(ClassicalBits::B01, (-S, -S), (-S, S)),
    // 10: phase-flip
    combo(ClassicalBits::B10, (-1.0, 0.0), (1.0, 0.0)),
    combo(ClassicalBits::B10, (1.0, 0.0), (-1.0, 0.0)),
    combo(ClassicalBits::B10, (S, S), (-S, S)),
    combo(ClassicalBits::B10, (-S, S), (S, S)),
    combo(ClassicalBits::B10, (S, -S), (-S, -S)),
    combo(ClassicalBits::B10, (-S, -S), (S, -S)),
    // 11: both
    combo(ClassicalBits::B11, (S, S), (-S, -S)),
    combo(ClassicalBits::B11, (-S, S), (S, -S)),
    combo(ClassicalBits::B11, (S, -S), (-S, S)),
    combo(ClassicalBits::B11, (-S, -S), (S, S)),
];

impl ValidCombo {
    /// Whether `(alice, bob)` lies within the catalogue tolerance of this entry.
    pub fn matches(&self, alice: BlochVector, bob: BlochVector) -> bool {
        self.alice.approx_eq(&alice, CATALOGUE_TOLERANCE)
            && self.bob.approx_eq(&bob, CATALOGUE_TOLERANCE)
    }
}

/// Whether Alice's and Bob's vectors form a pair the puzzle can explain:
/// either they coincide, or some catalogue entry matches them.
pub fn is_consistent_pair(alice: BlochVector, bob: BlochVector) -> bool {
    alice.approx_eq(&bob, IDENTITY_TOLERANCE)
        || VALID_COMBOS.iter().any(|c| c.matches(alice, bob))
}

/// Judges the player's bit choice for the round.
///
/// "00" is always accepted without checking that the vectors coincide; any
/// other pattern must have a catalogue entry matching the round's pair.
pub fn is_valid_bit_selection(bits: ClassicalBits, round: &PuzzleRound) -> bool {
    if bits == ClassicalBits::B00 {
        return true;
    }
    VALID_COMBOS
        .iter()
        .filter(|c| c.bits == bits)
        .any(|c| c.matches(round.alice_vector, round.bob_vector))
}

/// The bit pattern whose relation links `alice` to `bob`, if any.
pub fn bits_for_pair(alice: BlochVector, bob: BlochVector) -> Option<ClassicalBits> {
    if alice.approx_eq(&bob, IDENTITY_TOLERANCE) {
        return Some(ClassicalBits::B00);
    }
    VALID_COMBOS.iter().find(|c| c.matches(alice, bob)).map(|c| c.bits)
}
