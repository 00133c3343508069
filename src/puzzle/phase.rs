// src/puzzle/phase.rs

use crate::core::ClassicalBits;
use crate::correction::Correction;
use std::fmt;

/// Where the player is in the protocol walkthrough.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Welcome screen.
    #[default]
    Intro,
    /// Alice's and Bob's qubits are about to be entangled.
    Entangle,
    /// Alice is about to measure.
    Measure,
    /// Alice has measured; her classical bits are known.
    Measured,
    /// How the bits map to Bob's correction gates.
    BitExplanation,
    /// The player picks which bits Alice sends.
    SendBits,
    /// The bits are travelling to Bob.
    BitsFly,
    /// The player picks Bob's correction.
    ExplainGates,
    /// Round outcome.
    Result,
}

impl Phase {
    /// Every phase in walkthrough order.
    pub const ALL: [Phase; 9] = [
        Phase::Intro,
        Phase::Entangle,
        Phase::Measure,
        Phase::Measured,
        Phase::BitExplanation,
        Phase::SendBits,
        Phase::BitsFly,
        Phase::ExplainGates,
        Phase::Result,
    ];

    /// The only actions that can move the puzzle out of this phase.
    pub fn available_actions(self) -> &'static [ActionKind] {
        match self {
            Phase::Intro
            | Phase::Entangle
            | Phase::Measure
            | Phase::Measured
            | Phase::BitExplanation
            | Phase::Result => &[ActionKind::Advance],
            Phase::SendBits => &[ActionKind::SelectBits],
            Phase::BitsFly => &[ActionKind::AnimationComplete],
            Phase::ExplainGates => &[ActionKind::SelectCorrection],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Intro => "intro",
            Phase::Entangle => "entangle",
            Phase::Measure => "measure",
            Phase::Measured => "measured",
            Phase::BitExplanation => "bit_explanation",
            Phase::SendBits => "send_bits",
            Phase::BitsFly => "bits_fly",
            Phase::ExplainGates => "explain_gates",
            Phase::Result => "result",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discrete player or animation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Generic "continue".
    Advance,
    /// The player chose the bits Alice sends.
    SelectBits(ClassicalBits),
    /// The player chose Bob's correction.
    SelectCorrection(Correction),
    /// The bit token reached Bob.
    AnimationComplete,
}

/// An [`Action`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Advance,
    SelectBits,
    SelectCorrection,
    AnimationComplete,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Advance => ActionKind::Advance,
            Action::SelectBits(_) => ActionKind::SelectBits,
            Action::SelectCorrection(_) => ActionKind::SelectCorrection,
            Action::AnimationComplete => ActionKind::AnimationComplete,
        }
    }
}
