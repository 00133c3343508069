// src/core/bits.rs

use super::error::QuestError;
use std::fmt;
use std::str::FromStr;

/// The two classical bits Alice sends to Bob.
///
/// The first character of the textual form is the qubit-0 measurement, the
/// second the qubit-1 measurement, so `B01` reads as "qubit 0 gave 0, qubit 1
/// gave 1".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClassicalBits {
    B00,
    B01,
    B10,
    B11,
}

impl ClassicalBits {
    /// All four patterns in button order.
    pub const ALL: [ClassicalBits; 4] = [
        ClassicalBits::B00,
        ClassicalBits::B01,
        ClassicalBits::B10,
        ClassicalBits::B11,
    ];

    /// Builds the pattern from the two measurement results.
    pub fn from_measurements(qubit0: bool, qubit1: bool) -> Self {
        match (qubit0, qubit1) {
            (false, false) => ClassicalBits::B00,
            (false, true) => ClassicalBits::B01,
            (true, false) => ClassicalBits::B10,
            (true, true) => ClassicalBits::B11,
        }
    }

    /// Measurement result of qubit 0.
    pub fn qubit0(self) -> bool {
        matches!(self, ClassicalBits::B10 | ClassicalBits::B11)
    }

    /// Measurement result of qubit 1.
    pub fn qubit1(self) -> bool {
        matches!(self, ClassicalBits::B01 | ClassicalBits::B11)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClassicalBits::B00 => "00",
            ClassicalBits::B01 => "01",
            ClassicalBits::B10 => "10",
            ClassicalBits::B11 => "11",
        }
    }
}

impl FromStr for ClassicalBits {
    type Err = QuestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "00" => Ok(ClassicalBits::B00),
            "01" => Ok(ClassicalBits::B01),
            "10" => Ok(ClassicalBits::B10),
            "11" => Ok(ClassicalBits::B11),
            other => Err(QuestError::InvalidBits { bits: other.to_string() }),
        }
    }
}

impl fmt::Display for ClassicalBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_illegal_patterns() {
        for bad in ["", "0", "2", "001", "ab", " 01"] {
            assert_eq!(
                bad.parse::<ClassicalBits>(),
                Err(QuestError::InvalidBits { bits: bad.to_string() }),
                "'{}' should not parse",
                bad
            );
        }
    }

    #[test]
    fn test_measurement_positions() -> Result<(), QuestError> {
        let bits: ClassicalBits = "01".parse()?;
        assert!(!bits.qubit0());
        assert!(bits.qubit1());
        assert_eq!(ClassicalBits::from_measurements(true, false), ClassicalBits::B10);
        for b in ClassicalBits::ALL {
            assert_eq!(b.to_string().parse::<ClassicalBits>()?, b);
        }
        Ok(())
    }
}
