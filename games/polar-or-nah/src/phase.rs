//! Phase machine: which action is legal in which phase, and what it does.

use serde::Serialize;

use crate::catalog::BondId;

/// Game state machine phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    Menu,
    /// Step 1: draw an arrow on every polar bond.
    BondSetup,
    /// Step 2: check symmetry and call polar or non-polar.
    PolarityDecision,
    /// Step 3: score and feedback.
    Result,
    GameOver,
}

impl GamePhase {
    /// The round clock only runs while the player is still deciding.
    pub fn clock_runs(self) -> bool {
        matches!(self, Self::BondSetup | Self::PolarityDecision)
    }

    /// Wire code sent to the host in numeric events.
    pub fn code(self) -> u32 {
        match self {
            Self::Menu => 0,
            Self::BondSetup => 1,
            Self::PolarityDecision => 2,
            Self::Result => 3,
            Self::GameOver => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUp {
    /// Show electronegativity labels on every atom.
    EnScanner,
    /// Show the molecule's hint text.
    Hint,
}

/// Everything the player (or the clock) can do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Start,
    BondClick(BondId),
    Advance,
    Back,
    Guess { polar: bool },
    Timeout,
    Next,
    Restart,
    TogglePowerUp(PowerUp),
}

/// What the controller must do in response to an action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Action is not legal in this phase.
    Ignored,
    /// Reset score and begin round 0.
    BeginGame,
    CycleBond(BondId),
    TogglePowerUp(PowerUp),
    ToDecision,
    BackToSetup,
    Judge { polar: bool },
    TimeUp,
    /// Next molecule, or game over once the catalog is exhausted.
    NextRound,
}

/// The transition table.
pub fn transition(phase: GamePhase, action: Action) -> Transition {
    use Action as A;
    use GamePhase as P;

    match (phase, action) {
        (P::Menu, A::Start) => Transition::BeginGame,
        (P::GameOver, A::Restart) => Transition::BeginGame,

        (P::BondSetup, A::BondClick(bond)) => Transition::CycleBond(bond),
        (P::BondSetup, A::TogglePowerUp(kind)) => Transition::TogglePowerUp(kind),
        (P::BondSetup, A::Advance) => Transition::ToDecision,

        (P::PolarityDecision, A::Back) => Transition::BackToSetup,
        (P::PolarityDecision, A::Guess { polar }) => Transition::Judge { polar },

        (P::BondSetup | P::PolarityDecision, A::Timeout) => Transition::TimeUp,

        (P::Result, A::Next) => Transition::NextRound,

        (P::Menu, _)
        | (P::BondSetup, _)
        | (P::PolarityDecision, _)
        | (P::Result, _)
        | (P::GameOver, _) => Transition::Ignored,
    }
}
