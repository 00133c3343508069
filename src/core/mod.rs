// src/core/mod.rs

//! Core data structures and types

pub mod bits;
pub mod error;

pub use bits::ClassicalBits;
pub use error::{ClbitId, QubitId, QuestError};

pub mod constants;
pub use constants::quest_constants::{
    CATALOGUE_TOLERANCE, DEFAULT_SHOTS, IDENTITY_TOLERANCE, MAX_SAMPLING_ATTEMPTS,
    NORM_TOLERANCE,
};
