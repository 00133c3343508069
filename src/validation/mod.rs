// src/validation/mod.rs

//! Provides functions to validate amplitude vectors before they reach the simulator.

use crate::core::{NORM_TOLERANCE, QuestError};
use num_complex::Complex64;

/// Checks if the amplitudes are normalized (sum of squared magnitudes ≈ 1.0).
///
/// # Arguments
/// * `amplitudes` - The amplitude vector to check.
/// * `tolerance` - Allowed deviation from 1.0. Defaults to `NORM_TOLERANCE`.
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(QuestError::InvalidOperation)` if normalization fails.
pub fn check_normalization(amplitudes: &[Complex64], tolerance: Option<f64>) -> Result<(), QuestError> {
    let effective_tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let norm_sq: f64 = amplitudes.iter().map(|c| c.norm_sqr()).sum();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(QuestError::InvalidOperation {
            message: format!(
                "State vector normalization failed. Sum(|c_i|^2) = {} (Deviation > {})",
                norm_sq, effective_tolerance
            ),
        })
    } else {
        Ok(())
    }
}
