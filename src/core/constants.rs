//! Numeric constants shared by the puzzle checks and the simulator.

/// Constants governing how forgiving the puzzle is and how the backend runs.
pub mod quest_constants {
    /// 1/√2, the coordinate of the four diagonal puzzle vectors.
    pub const S: f64 = std::f64::consts::FRAC_1_SQRT_2;
    /// Per-coordinate tolerance for treating two vectors as the same point.
    pub const IDENTITY_TOLERANCE: f64 = 0.1;
    /// Per-coordinate tolerance for matching a pair against the catalogue.
    pub const CATALOGUE_TOLERANCE: f64 = 0.4;
    /// Allowed deviation of |α|² + |β|² from 1.
    pub const NORM_TOLERANCE: f64 = 1e-9;
    /// Retry cap for the Alice/Bob vector sampler.
    pub const MAX_SAMPLING_ATTEMPTS: u32 = 100;
    /// Shots per circuit execution.
    pub const DEFAULT_SHOTS: u32 = 1024;
}
