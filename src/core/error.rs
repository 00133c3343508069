// src/core/error.rs

//! Error handling logic

use std::fmt;
use thiserror::Error;

/// Index of a qubit inside a circuit's quantum register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QubitId(pub usize);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Index of a bit inside a circuit's classical register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClbitId(pub usize);

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Failures raised by the puzzle engine and its collaborators.
///
/// Player mistakes (wrong bits, wrong correction) are never errors; they end
/// the round with `succeeded = false`. Everything here aborts the round.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestError {
    /// A bit pattern outside `00`, `01`, `10`, `11` was looked up.
    #[error("Invalid classical bits '{bits}': expected one of 00, 01, 10, 11")]
    InvalidBits {
        /// The offending bit string
        bits: String,
    },

    /// The execution backend reported zero observations.
    #[error("Execution backend returned no observations")]
    EmptyResult,

    /// The vector sampler exhausted its retry budget without finding a
    /// consistent Alice/Bob pair.
    #[error("No consistent Bloch vector pair found after {attempts} attempts")]
    InconsistentVectorPair {
        /// Number of draws made before giving up
        attempts: u32,
    },

    /// A circuit operation is inconsistent with the circuit or the backend.
    #[error("Invalid Operation: {message}")]
    InvalidOperation {
        /// InvalidOperation failure message
        message: String,
    },

    /// General error encountered during the simulation process itself.
    #[error("Simulation Process Error: {message}")]
    SimulationError {
        /// SimulationError failure message
        message: String,
    },

    /// Configuration values out of range or unreadable.
    #[error("Configuration Error: {message}")]
    Configuration {
        /// Configuration failure message
        message: String,
    },
}

impl QuestError {
    /// Whether the error came from executing the circuit rather than from a
    /// puzzle-side programming fault.
    pub fn is_simulation_failure(&self) -> bool {
        matches!(
            self,
            QuestError::EmptyResult
                | QuestError::InvalidOperation { .. }
                | QuestError::SimulationError { .. }
        )
    }
}
