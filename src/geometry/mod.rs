// src/geometry/mod.rs

//! Bloch-sphere geometry for the puzzle.
//!
//! The puzzle only ever places qubits on the x–z great circle of the Bloch
//! sphere (y = 0), and only at eight points spaced 45° apart. This module
//! holds that vector type, the canonical point set, the map from a point to
//! the qubit amplitudes it represents, and the sampler that deals Alice and
//! Bob their vectors for a round.

use crate::core::constants::quest_constants::S;
use crate::core::{MAX_SAMPLING_ATTEMPTS, QuestError};
use crate::correction::is_consistent_pair;
use num_complex::Complex64;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::fmt;
use tracing::{debug, warn};

/// A point `(x, z)` on the y = 0 great circle of the Bloch sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlochVector {
    pub x: f64,
    pub z: f64,
}

/// The eight vectors a round can start from: the four poles of the x and z
/// axes, then the four diagonals.
pub const CANONICAL_VECTORS: [BlochVector; 8] = [
    BlochVector::new(0.0, 1.0),
    BlochVector::new(0.0, -1.0),
    BlochVector::new(1.0, 0.0),
    BlochVector::new(-1.0, 0.0),
    BlochVector::new(S, S),
    BlochVector::new(-S, S),
    BlochVector::new(S, -S),
    BlochVector::new(-S, -S),
];

impl BlochVector {
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// The antipodal point `(-x, -z)`.
    pub fn negate(self) -> Self {
        Self::new(-self.x, -self.z)
    }

    /// Quarter turn `(x, z) -> (z, -x)`.
    pub fn rotate_cw(self) -> Self {
        Self::new(self.z, -self.x)
    }

    /// Quarter turn `(x, z) -> (-z, x)`.
    pub fn rotate_ccw(self) -> Self {
        Self::new(-self.z, self.x)
    }

    /// Per-coordinate comparison with an absolute tolerance.
    pub fn approx_eq(&self, other: &BlochVector, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.z - other.z).abs() <= tolerance
    }

    /// Whether the vector lies on the sphere's surface.
    pub fn is_unit(&self, tolerance: f64) -> bool {
        (self.x * self.x + self.z * self.z - 1.0).abs() <= tolerance
    }

    /// The four partners Bob may be dealt for this Alice vector: the vector
    /// itself, its negation, and both quarter turns.
    pub fn partner_candidates(self) -> [BlochVector; 4] {
        [self, self.negate(), self.rotate_cw(), self.rotate_ccw()]
    }
}

impl fmt::Display for BlochVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x={:.3}, z={:.3})", self.x, self.z)
    }
}

/// Converts a Bloch vector into the amplitude pair `(α, β)` of
/// `α|0> + β|1>`.
///
/// Uses θ = arccos(z) and φ = atan2(0, x), which is 0 or π because y = 0.
/// Only meaningful for unit vectors; callers pass canonical vectors.
pub fn to_amplitudes(v: BlochVector) -> (Complex64, Complex64) {
    let theta = v.z.clamp(-1.0, 1.0).acos();
    let phi = 0.0_f64.atan2(v.x);
    let alpha = Complex64::new((theta / 2.0).cos(), 0.0);
    let beta = Complex64::from_polar(1.0, phi) * (theta / 2.0).sin();
    (alpha, beta)
}

/// Deals Alice a canonical vector and Bob one of its partner candidates,
/// re-drawing until the pair is one the puzzle can explain.
///
/// # Errors
/// Returns `QuestError::InconsistentVectorPair` if no consistent pair turns
/// up within `MAX_SAMPLING_ATTEMPTS` draws.
pub fn sample_vector_pair<R: Rng + ?Sized>(
    rng: &mut R,
) -> Result<(BlochVector, BlochVector), QuestError> {
    sample_vector_pair_from(rng, &CANONICAL_VECTORS, MAX_SAMPLING_ATTEMPTS)
}

pub(crate) fn sample_vector_pair_from<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &[BlochVector],
    max_attempts: u32,
) -> Result<(BlochVector, BlochVector), QuestError> {
    for attempt in 1..=max_attempts {
        let alice = *pool.choose(rng).ok_or(QuestError::InconsistentVectorPair { attempts: 0 })?;
        let candidates = alice.partner_candidates();
        // `candidates` is a fixed non-empty array.
        let bob = candidates[rng.random_range(0..candidates.len())];

        if is_consistent_pair(alice, bob) {
            debug!(attempt, %alice, %bob, "Dealt vector pair");
            return Ok((alice, bob));
        }
    }
    warn!(max_attempts, "Vector sampler exhausted its retry budget");
    Err(QuestError::InconsistentVectorPair { attempts: max_attempts })
}
