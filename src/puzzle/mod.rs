// src/puzzle/mod.rs

//! The teleportation puzzle as an explicit state machine.
//!
//! A [`PuzzleEngine`] walks the player through one round of the protocol:
//! entangle, measure on a backend, send the classical bits to Bob, pick Bob's
//! correction, see the result. Each round starts from a freshly dealt pair of
//! Bloch vectors.
//!
//! The interaction layer drives the engine with [`Action`]s and renders from
//! [`PuzzleEngine::snapshot`]. Actions that the current [`Phase`] does not
//! accept are ignored and leave the engine untouched.

mod phase;
mod round;

pub use phase::{Action, ActionKind, Phase};
pub use round::PuzzleRound;

use crate::config::QuestConfig;
use crate::core::{ClassicalBits, QuestError};
use crate::correction::{Correction, is_valid_bit_selection};
use crate::geometry::{BlochVector, sample_vector_pair};
use crate::measurement::interpret;
use crate::protocol::build_teleportation_circuit;
use crate::simulation::{ExecutionBackend, ExecutionMode, StatevectorSimulator};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, error, info, trace};

pub const SUCCESS_MESSAGE: &str = "Teleportation successful! Bob got |ψ>.";

/// Read-only view of the engine for one frame of rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PuzzleSnapshot {
    pub phase: Phase,
    pub round: PuzzleRound,
    pub available_actions: &'static [ActionKind],
}

/// Drives the puzzle from [`Phase::Intro`] to [`Phase::Result`] and back.
pub struct PuzzleEngine<B: ExecutionBackend = StatevectorSimulator> {
    backend: B,
    mode: ExecutionMode,
    rng: StdRng,
    phase: Phase,
    round: PuzzleRound,
}

impl PuzzleEngine<StatevectorSimulator> {
    /// Builds an engine on the local simulator described by `config`.
    ///
    /// A configured seed drives both the simulator and the vector dealer.
    pub fn from_config(config: &QuestConfig) -> Result<Self, QuestError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config.simulator(), config.mode, rng)
    }
}

impl<B: ExecutionBackend> PuzzleEngine<B> {
    /// Creates an engine in [`Phase::Intro`] with a freshly dealt round.
    ///
    /// # Errors
    /// Returns `QuestError::InconsistentVectorPair` if no round can be dealt.
    pub fn new(backend: B, mode: ExecutionMode) -> Result<Self, QuestError> {
        Self::with_rng(backend, mode, StdRng::from_os_rng())
    }

    /// Like [`PuzzleEngine::new`], dealing vectors from the given generator.
    pub fn with_rng(backend: B, mode: ExecutionMode, mut rng: StdRng) -> Result<Self, QuestError> {
        let (alice, bob) = sample_vector_pair(&mut rng)?;
        info!(backend = backend.name(), %mode, %alice, %bob, "Puzzle engine ready");
        Ok(Self {
            backend,
            mode,
            rng,
            phase: Phase::Intro,
            round: PuzzleRound::new(alice, bob),
        })
    }

    /// Creates an engine whose first round uses the given vectors.
    ///
    /// Later rounds are dealt from `rng` as usual.
    pub fn with_round(
        backend: B,
        mode: ExecutionMode,
        rng: StdRng,
        alice: BlochVector,
        bob: BlochVector,
    ) -> Self {
        Self {
            backend,
            mode,
            rng,
            phase: Phase::Intro,
            round: PuzzleRound::new(alice, bob),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> &PuzzleRound {
        &self.round
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn available_actions(&self) -> &'static [ActionKind] {
        self.phase.available_actions()
    }

    pub fn snapshot(&self) -> PuzzleSnapshot {
        PuzzleSnapshot {
            phase: self.phase,
            round: self.round.clone(),
            available_actions: self.available_actions(),
        }
    }

    pub fn advance(&mut self) -> Result<Phase, QuestError> {
        self.handle(Action::Advance)
    }

    pub fn select_bits(&mut self, bits: ClassicalBits) -> Result<Phase, QuestError> {
        self.handle(Action::SelectBits(bits))
    }

    pub fn select_correction(&mut self, correction: Correction) -> Result<Phase, QuestError> {
        self.handle(Action::SelectCorrection(correction))
    }

    pub fn animation_complete(&mut self) -> Result<Phase, QuestError> {
        self.handle(Action::AnimationComplete)
    }

    /// Applies one action and returns the phase the engine ends up in.
    ///
    /// Actions the current phase does not accept change nothing.
    ///
    /// # Errors
    /// A backend failure or an unusable measurement aborts the round: the
    /// engine deals a fresh round in [`Phase::Intro`], records a message
    /// for the player, and returns the error.
    pub fn handle(&mut self, action: Action) -> Result<Phase, QuestError> {
        let phase = self.phase;
        let next = match phase {
            Phase::Intro => match action {
                Action::Advance => Some(Phase::Entangle),
                _ => None,
            },
            Phase::Entangle => match action {
                Action::Advance => {
                    self.round.entangled = true;
                    Some(Phase::Measure)
                }
                _ => None,
            },
            Phase::Measure => match action {
                Action::Advance => match self.measure() {
                    Ok(bits) => {
                        self.round.measured_bits = Some(bits);
                        self.round.classical_bits = Some(bits);
                        Some(Phase::Measured)
                    }
                    Err(e) => return self.abort_round(e),
                },
                _ => None,
            },
            Phase::Measured => match action {
                Action::Advance => Some(Phase::BitExplanation),
                _ => None,
            },
            Phase::BitExplanation => match action {
                Action::Advance => Some(Phase::SendBits),
                _ => None,
            },
            Phase::SendBits => match action {
                Action::SelectBits(bits) => Some(self.send_bits(bits)),
                _ => None,
            },
            Phase::BitsFly => match action {
                Action::AnimationComplete => Some(Phase::ExplainGates),
                _ => None,
            },
            Phase::ExplainGates => match action {
                Action::SelectCorrection(correction) => match self.apply_correction(correction) {
                    Ok(phase) => Some(phase),
                    Err(e) => return self.abort_round(e),
                },
                _ => None,
            },
            Phase::Result => match action {
                Action::Advance => {
                    self.reset()?;
                    Some(Phase::Intro)
                }
                _ => None,
            },
        };

        match next {
            Some(to) => {
                info!(from = %self.phase, %to, "Phase transition");
                self.phase = to;
            }
            None => trace!(phase = %self.phase, ?action, "Ignoring action"),
        }
        Ok(self.phase)
    }

    /// Runs the teleportation circuit and reads Alice's bits from the counts.
    fn measure(&mut self) -> Result<ClassicalBits, QuestError> {
        let circuit = build_teleportation_circuit(self.round.alice_vector);
        debug!(backend = self.backend.name(), mode = %self.mode, "Executing teleportation circuit\n{}", circuit);
        let result = self.backend.execute(&circuit, self.mode)?;
        debug!(%result, "Backend returned");
        interpret(result.counts())
    }

    fn send_bits(&mut self, bits: ClassicalBits) -> Phase {
        if is_valid_bit_selection(bits, &self.round) {
            debug!(%bits, "Bits accepted");
            self.round.classical_bits = Some(bits);
            Phase::BitsFly
        } else {
            debug!(%bits, "Bits rejected");
            self.round.succeeded = Some(false);
            self.round.message = Some(format!("Incorrect bits ({bits}) for current Bloch vectors!"));
            Phase::Result
        }
    }

    fn apply_correction(&mut self, correction: Correction) -> Result<Phase, QuestError> {
        let bits = self
            .round
            .classical_bits
            .ok_or_else(|| QuestError::InvalidBits { bits: String::new() })?;
        let required = bits.required_correction();
        let succeeded = correction == required;

        self.round.chosen_correction = Some(correction);
        self.round.succeeded = Some(succeeded);
        self.round.message = Some(if succeeded {
            SUCCESS_MESSAGE.to_string()
        } else {
            format!("Teleportation failed. You applied {correction}, but needed {required}.")
        });
        info!(%bits, %correction, %required, succeeded, "Correction applied");
        Ok(Phase::Result)
    }

    /// Replaces the round with a freshly dealt one.
    fn reset(&mut self) -> Result<(), QuestError> {
        let (alice, bob) = sample_vector_pair(&mut self.rng)?;
        debug!(%alice, %bob, "New round");
        self.round = PuzzleRound::new(alice, bob);
        Ok(())
    }

    fn abort_round(&mut self, e: QuestError) -> Result<Phase, QuestError> {
        error!(phase = %self.phase, error = %e, "Aborting round");
        self.reset()?;
        self.phase = Phase::Intro;
        let message = if e.is_simulation_failure() {
            format!("Simulation failed: {e}")
        } else {
            format!("Internal error: {e}")
        };
        self.round.message = Some(message);
        Err(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::Circuit;
    use crate::simulation::{Counts, ExecutionResult};

    /// Backend that replays a fixed histogram.
    struct ReplayBackend {
        counts: Counts,
        calls: usize,
    }

    impl ReplayBackend {
        fn new(pairs: &[(&str, u64)]) -> Self {
            Self {
                counts: pairs.iter().map(|&(k, v)| (k, v)).collect(),
                calls: 0,
            }
        }
    }

    impl ExecutionBackend for ReplayBackend {
        fn name(&self) -> &str {
            "replay"
        }

        fn execute(&mut self, circuit: &Circuit, _mode: ExecutionMode) -> Result<ExecutionResult, QuestError> {
            assert_eq!(circuit.num_qubits(), 3);
            self.calls += 1;
            let shots = self.counts.total() as u32;
            Ok(ExecutionResult::new(self.counts.clone(), shots))
        }
    }

    struct FailingBackend;

    impl ExecutionBackend for FailingBackend {
        fn name(&self) -> &str {
            "failing"
        }

        fn execute(&mut self, _circuit: &Circuit, _mode: ExecutionMode) -> Result<ExecutionResult, QuestError> {
            Err(QuestError::SimulationError { message: "device offline".to_string() })
        }
    }

    fn engine<B: ExecutionBackend>(backend: B, alice: BlochVector, bob: BlochVector) -> PuzzleEngine<B> {
        PuzzleEngine::with_round(backend, ExecutionMode::Ideal, StdRng::seed_from_u64(7), alice, bob)
    }

    fn to_send_bits<B: ExecutionBackend>(engine: &mut PuzzleEngine<B>) -> Result<(), QuestError> {
        assert_eq!(engine.advance()?, Phase::Entangle);
        assert_eq!(engine.advance()?, Phase::Measure);
        assert_eq!(engine.advance()?, Phase::Measured);
        assert_eq!(engine.advance()?, Phase::BitExplanation);
        assert_eq!(engine.advance()?, Phase::SendBits);
        Ok(())
    }

    #[test]
    fn test_full_round_success() -> Result<(), QuestError> {
        let backend = ReplayBackend::new(&[("10", 1024)]);
        let mut engine = engine(backend, BlochVector::new(0.0, 1.0), BlochVector::new(0.0, -1.0));

        to_send_bits(&mut engine)?;
        assert!(engine.round().entangled);
        assert_eq!(engine.round().measured_bits, Some(ClassicalBits::B01));
        assert_eq!(engine.backend().calls, 1);

        assert_eq!(engine.select_bits(ClassicalBits::B01)?, Phase::BitsFly);
        assert_eq!(engine.animation_complete()?, Phase::ExplainGates);
        assert_eq!(engine.select_correction(Correction::X)?, Phase::Result);

        let round = engine.round();
        assert_eq!(round.succeeded, Some(true));
        assert_eq!(round.chosen_correction, Some(Correction::X));
        assert_eq!(round.message.as_deref(), Some(SUCCESS_MESSAGE));
        Ok(())
    }

    #[test]
    fn test_wrong_correction_names_required_gate() -> Result<(), QuestError> {
        let backend = ReplayBackend::new(&[("01", 1024)]);
        let mut engine = engine(backend, BlochVector::new(1.0, 0.0), BlochVector::new(-1.0, 0.0));

        to_send_bits(&mut engine)?;
        engine.select_bits(ClassicalBits::B10)?;
        engine.animation_complete()?;
        engine.select_correction(Correction::X)?;

        assert_eq!(engine.round().succeeded, Some(false));
        assert_eq!(
            engine.round().message.as_deref(),
            Some("Teleportation failed. You applied X, but needed Z.")
        );
        Ok(())
    }

    #[test]
    fn test_incorrect_bits_skip_to_result() -> Result<(), QuestError> {
        let backend = ReplayBackend::new(&[("00", 1024)]);
        let mut engine = engine(backend, BlochVector::new(0.0, 1.0), BlochVector::new(0.0, 1.0));

        to_send_bits(&mut engine)?;
        assert_eq!(engine.select_bits(ClassicalBits::B01)?, Phase::Result);
        assert_eq!(engine.round().succeeded, Some(false));
        assert_eq!(
            engine.round().message.as_deref(),
            Some("Incorrect bits (01) for current Bloch vectors!")
        );
        assert_eq!(engine.round().chosen_correction, None);
        Ok(())
    }

    #[test]
    fn test_unlisted_actions_are_ignored() -> Result<(), QuestError> {
        let backend = ReplayBackend::new(&[("00", 1024)]);
        let mut engine = engine(backend, BlochVector::new(0.0, 1.0), BlochVector::new(0.0, 1.0));
        let before = engine.snapshot();

        assert_eq!(engine.select_bits(ClassicalBits::B11)?, Phase::Intro);
        assert_eq!(engine.select_correction(Correction::Z)?, Phase::Intro);
        assert_eq!(engine.animation_complete()?, Phase::Intro);
        assert_eq!(engine.snapshot(), before);
        Ok(())
    }

    #[test]
    fn test_result_advance_deals_fresh_round() -> Result<(), QuestError> {
        let backend = ReplayBackend::new(&[("00", 1024)]);
        let mut engine = engine(backend, BlochVector::new(0.0, 1.0), BlochVector::new(0.0, 1.0));

        to_send_bits(&mut engine)?;
        engine.select_bits(ClassicalBits::B00)?;
        engine.animation_complete()?;
        engine.select_correction(Correction::I)?;
        assert_eq!(engine.round().succeeded, Some(true));

        assert_eq!(engine.advance()?, Phase::Intro);
        let round = engine.round();
        assert!(!round.entangled);
        assert_eq!(round.classical_bits, None);
        assert_eq!(round.succeeded, None);
        assert_eq!(round.message, None);
        assert!(round.expected_bits().is_some());
        Ok(())
    }

    #[test]
    fn test_empty_counts_abort_round() -> Result<(), QuestError> {
        let backend = ReplayBackend::new(&[]);
        let mut engine = engine(backend, BlochVector::new(0.0, 1.0), BlochVector::new(0.0, 1.0));

        engine.advance()?;
        engine.advance()?;
        assert_eq!(engine.advance(), Err(QuestError::EmptyResult));
        assert_eq!(engine.phase(), Phase::Intro);
        assert!(!engine.round().entangled);
        let message = engine.round().message.clone().unwrap_or_default();
        assert!(message.starts_with("Simulation failed"), "{message}");
        Ok(())
    }

    #[test]
    fn test_malformed_counts_are_internal_errors() -> Result<(), QuestError> {
        let backend = ReplayBackend::new(&[("1", 1024)]);
        let mut engine = engine(backend, BlochVector::new(0.0, 1.0), BlochVector::new(0.0, 1.0));

        engine.advance()?;
        engine.advance()?;
        assert!(matches!(engine.advance(), Err(QuestError::InvalidBits { .. })));
        assert_eq!(engine.phase(), Phase::Intro);
        let message = engine.round().message.clone().unwrap_or_default();
        assert!(message.starts_with("Internal error"), "{message}");
        Ok(())
    }

    #[test]
    fn test_backend_failure_aborts_round() -> Result<(), QuestError> {
        let mut engine = engine(FailingBackend, BlochVector::new(1.0, 0.0), BlochVector::new(1.0, 0.0));

        engine.advance()?;
        engine.advance()?;
        assert!(matches!(engine.advance(), Err(QuestError::SimulationError { .. })));
        assert_eq!(engine.phase(), Phase::Intro);
        assert_eq!(engine.available_actions(), &[ActionKind::Advance]);
        Ok(())
    }
}
