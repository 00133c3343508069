// src/lib.rs

//! `teleport_quest` - A puzzle engine that walks a player through the
//! quantum teleportation protocol.
//!
//! Alice holds a qubit described by a Bloch vector on the x-z great circle,
//! Bob holds one half of a Bell pair. The player entangles, lets Alice
//! measure on an execution backend, picks the classical bits Alice sends and
//! finally the Pauli correction Bob applies. The engine judges each choice
//! against the geometry of the round.

pub mod core;
pub mod geometry;
pub mod correction;
pub mod operations;
pub mod circuits;
pub mod validation;
pub mod simulation;
pub mod protocol;
pub mod measurement;
pub mod puzzle;
pub mod config;

// Re-export the most common types for easier top-level use
pub use core::{ClassicalBits, ClbitId, QubitId, QuestError};
pub use geometry::{BlochVector, CANONICAL_VECTORS, sample_vector_pair, to_amplitudes};
pub use correction::{Correction, is_consistent_pair, is_valid_bit_selection, required_correction};
pub use operations::Operation;
pub use circuits::{Circuit, CircuitBuilder};
pub use validation::check_normalization;
pub use simulation::{
    Counts, ExecutionBackend, ExecutionMode, ExecutionResult, NoiseParams, StatevectorSimulator,
};
pub use protocol::build_teleportation_circuit;
pub use measurement::interpret;
pub use puzzle::{Action, ActionKind, Phase, PuzzleEngine, PuzzleRound, PuzzleSnapshot};
pub use config::QuestConfig;

// Example 1: Running the teleportation circuit
// Builds the protocol circuit for one of Alice's vectors and samples it on
// the ideal statevector backend.
/// ```
/// use teleport_quest::{
///     build_teleportation_circuit, interpret, BlochVector, ExecutionBackend, ExecutionMode,
///     QuestError, StatevectorSimulator,
/// };
///
/// let alice = BlochVector::new(0.0, 1.0);
/// let circuit = build_teleportation_circuit(alice);
/// println!("Circuit:\n{}", circuit);
///
/// let mut backend = StatevectorSimulator::new().with_seed(11).with_shots(256);
/// let result = backend.execute(&circuit, ExecutionMode::Ideal)?;
/// println!("Result:\n{}", result);
///
/// // Alice's Bell-basis measurement is uniform over all four outcomes.
/// assert_eq!(result.counts().total(), 256);
/// assert_eq!(result.counts().len(), 4);
///
/// let bits = interpret(result.counts())?;
/// println!("Alice sends {}", bits);
/// # Ok::<(), QuestError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Playing a round
// Drives the engine through a whole round with the right answers.
/// ```
/// use teleport_quest::{
///     BlochVector, ExecutionMode, Phase, PuzzleEngine, QuestError, StatevectorSimulator,
/// };
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let backend = StatevectorSimulator::new().with_seed(3);
/// let mut engine = PuzzleEngine::with_round(
///     backend,
///     ExecutionMode::Ideal,
///     StdRng::seed_from_u64(3),
///     BlochVector::new(0.0, 1.0),
///     BlochVector::new(0.0, -1.0),
/// );
///
/// while engine.phase() != Phase::SendBits {
///     engine.advance()?;
/// }
/// println!("Alice measured {:?}", engine.round().measured_bits);
///
/// // Bob's vector is Alice's flipped: the bits to send are "01".
/// let bits = engine.round().expected_bits().ok_or(QuestError::EmptyResult)?;
/// assert_eq!(bits.as_str(), "01");
///
/// engine.select_bits(bits)?;
/// engine.animation_complete()?;
/// engine.select_correction(bits.required_correction())?;
///
/// assert_eq!(engine.phase(), Phase::Result);
/// assert_eq!(engine.round().succeeded, Some(true));
/// println!("{}", engine.round().message.as_deref().unwrap_or_default());
/// # Ok::<(), QuestError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item
