//! Session state machine.
//!
//! `PhaseController` owns everything that changes during a game: phase,
//! cumulative score, the player's arrows, power-ups, the round clock and the
//! pending explanation. Actions go through the `phase::transition` table,
//! which decides legality. This module applies the effects.

use quiz_engine::SecondTicker;

use crate::catalog::{BondId, Catalog, Molecule};
use crate::cues::Cue;
use crate::dipole::{DipoleDirection, UserDipoleMap};
use crate::explain::{Explanation, ExplanationReply, ExplanationRequest, ExplanationService, Ticket};
use crate::phase::{transition, Action, GamePhase, PowerUp, Transition};
use crate::scoring::{self, RoundScore};

/// Per-round tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundConfig {
    /// Countdown length for each molecule.
    pub round_seconds: u32,
    /// The HUD flags the clock once fewer seconds than this remain.
    pub low_time_threshold: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            round_seconds: 60,
            low_time_threshold: 10,
        }
    }
}

pub struct PhaseController<S: ExplanationService> {
    catalog: Catalog,
    service: S,
    config: RoundConfig,

    phase: GamePhase,
    round: usize,
    /// Bumped every time a round begins; never reset, even across games.
    ticket: Ticket,
    /// Ticket of the explanation request still in flight, if any.
    pending: Option<Ticket>,

    score: u32,
    round_score: RoundScore,
    dipoles: UserDipoleMap,
    en_scanner: bool,
    show_hint: bool,

    time_left: u32,
    ticker: SecondTicker,

    explanation: Option<Explanation>,
    last_guess_correct: bool,

    cues: Vec<Cue>,
    explanation_ready: bool,
    dirty: bool,
}

impl<S: ExplanationService> PhaseController<S> {
    pub fn new(catalog: Catalog, service: S) -> Self {
        Self::with_config(catalog, service, RoundConfig::default())
    }

    pub fn with_config(catalog: Catalog, service: S, config: RoundConfig) -> Self {
        Self {
            catalog,
            service,
            config,
            phase: GamePhase::Menu,
            round: 0,
            ticket: Ticket(0),
            pending: None,
            score: 0,
            round_score: RoundScore::ZERO,
            dipoles: UserDipoleMap::new(),
            en_scanner: false,
            show_hint: false,
            time_left: config.round_seconds,
            ticker: SecondTicker::new(),
            explanation: None,
            last_guess_correct: false,
            cues: Vec::new(),
            explanation_ready: false,
            dirty: true,
        }
    }

    /// Apply a player action. Returns the transition taken, `Ignored` when
    /// the action is not legal in the current phase.
    pub fn dispatch(&mut self, action: Action) -> Transition {
        let step = match action {
            Action::Timeout if self.time_left > 0 => Transition::Ignored,
            _ => transition(self.phase, action),
        };
        match step {
            Transition::Ignored => {
                log::debug!("{:?} ignored in {:?}", action, self.phase);
                return step;
            }
            Transition::BeginGame => {
                self.score = 0;
                self.begin_round(0);
                self.cues.push(Cue::Start);
            }
            Transition::CycleBond(bond) => {
                let known = self
                    .catalog
                    .get(self.round)
                    .is_some_and(|m| m.bond(bond).is_some());
                if !known {
                    log::debug!("click on unknown bond {}", bond);
                    return Transition::Ignored;
                }
                self.dipoles.cycle(bond);
                self.cues.push(Cue::Pop);
            }
            Transition::TogglePowerUp(kind) => {
                match kind {
                    PowerUp::EnScanner => self.en_scanner = !self.en_scanner,
                    PowerUp::Hint => self.show_hint = !self.show_hint,
                }
                self.cues.push(Cue::PowerUp);
            }
            Transition::ToDecision => {
                self.phase = GamePhase::PolarityDecision;
                self.cues.push(Cue::Click);
            }
            Transition::BackToSetup => {
                self.phase = GamePhase::BondSetup;
                self.cues.push(Cue::Click);
            }
            Transition::Judge { polar } => self.judge(polar),
            Transition::TimeUp => self.time_up(),
            Transition::NextRound => {
                self.cues.push(Cue::Click);
                let next = self.round + 1;
                if next < self.catalog.len() {
                    self.begin_round(next);
                } else {
                    self.game_over();
                }
            }
        }
        self.dirty = true;
        step
    }

    /// Run the round clock for `dt` seconds of game time. Fires the timeout
    /// when the countdown hits zero; returns true on that frame.
    pub fn advance_clock(&mut self, dt: f32) -> bool {
        if !self.phase.clock_runs() {
            return false;
        }
        let seconds = self.ticker.advance(dt);
        if seconds == 0 {
            return false;
        }
        self.time_left = self.time_left.saturating_sub(seconds);
        self.dirty = true;
        if self.time_left == 0 {
            return self.dispatch(Action::Timeout) == Transition::TimeUp;
        }
        false
    }

    /// Drain finished replies from the service. Returns how many were
    /// applied to the current round.
    pub fn pump_explanations(&mut self) -> usize {
        let mut applied = 0;
        while let Some(reply) = self.service.poll() {
            if self.resolve_explanation(reply) {
                applied += 1;
            }
        }
        applied
    }

    /// Apply one reply. Replies for any ticket other than the one in flight
    /// are stale and dropped.
    pub fn resolve_explanation(&mut self, reply: ExplanationReply) -> bool {
        if self.pending != Some(reply.ticket) {
            log::debug!("dropping stale explanation for ticket {:?}", reply.ticket);
            return false;
        }
        self.pending = None;

        let explanation = match reply.outcome {
            Ok(explanation) => explanation,
            Err(err) => {
                log::warn!("explanation service failed, using fallback: {}", err);
                match self.catalog.get(self.round) {
                    Some(molecule) => Explanation::fallback(molecule, self.last_guess_correct),
                    None => return false,
                }
            }
        };
        self.set_explanation(explanation);
        true
    }

    fn begin_round(&mut self, index: usize) {
        self.round = index;
        self.ticket = Ticket(self.ticket.0.wrapping_add(1));
        self.reset_round_state();
        self.phase = GamePhase::BondSetup;
        if let Some(molecule) = self.catalog.get(index) {
            log::info!(
                "round {}/{}: {}",
                index + 1,
                self.catalog.len(),
                molecule.id
            );
        }
    }

    fn reset_round_state(&mut self) {
        self.pending = None;
        self.dipoles.clear();
        self.en_scanner = false;
        self.show_hint = false;
        self.time_left = self.config.round_seconds;
        self.ticker.reset();
        self.explanation = None;
        self.round_score = RoundScore::ZERO;
        self.last_guess_correct = false;
    }

    fn judge(&mut self, polar: bool) {
        let Some(molecule) = self.catalog.get(self.round) else {
            return;
        };
        let round_score = scoring::score(molecule, &self.dipoles, polar, self.time_left, false);
        let correct = polar == molecule.is_polar;
        let request = ExplanationRequest::new(self.ticket, molecule, correct);
        let fallback = Explanation::fallback(molecule, correct);
        log::info!(
            "{}: guessed {}, {} (polarity {}, bonds {}, time {})",
            molecule.id,
            if polar { "polar" } else { "non-polar" },
            if correct { "correct" } else { "wrong" },
            round_score.polarity_points,
            round_score.bond_points,
            round_score.time_bonus
        );

        self.finish_round(round_score, correct);
        self.cues.push(if correct { Cue::Success } else { Cue::Wrong });

        match self.service.request(request) {
            Ok(()) => self.pending = Some(self.ticket),
            Err(err) => {
                log::warn!("explanation unavailable, using fallback: {}", err);
                self.set_explanation(fallback);
            }
        }
    }

    fn time_up(&mut self) {
        if let Some(molecule) = self.catalog.get(self.round) {
            log::info!("{}: time up", molecule.id);
        }
        self.finish_round(RoundScore::ZERO, false);
        self.cues.push(Cue::Wrong);
        self.set_explanation(Explanation::time_up());
    }

    fn finish_round(&mut self, round_score: RoundScore, correct: bool) {
        self.round_score = round_score;
        self.score += round_score.total();
        self.last_guess_correct = correct;
        self.explanation = None;
        self.pending = None;
        self.ticker.reset();
        self.phase = GamePhase::Result;
    }

    fn game_over(&mut self) {
        self.reset_round_state();
        self.phase = GamePhase::GameOver;
        self.cues.push(Cue::Success);
        log::info!("game over: {} points, {}", self.score, scoring::final_verdict(self.score));
    }

    fn set_explanation(&mut self, explanation: Explanation) {
        self.explanation = Some(explanation);
        self.explanation_ready = true;
        self.dirty = true;
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Zero-based index of the current molecule.
    pub fn round(&self) -> usize {
        self.round
    }

    pub fn total_rounds(&self) -> usize {
        self.catalog.len()
    }

    /// Molecule on screen; `None` on the menu and game-over screens.
    pub fn molecule(&self) -> Option<&Molecule> {
        match self.phase {
            GamePhase::Menu | GamePhase::GameOver => None,
            _ => self.catalog.get(self.round),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn round_score(&self) -> RoundScore {
        self.round_score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_low_time(&self) -> bool {
        self.time_left < self.config.low_time_threshold
    }

    pub fn dipoles(&self) -> &UserDipoleMap {
        &self.dipoles
    }

    pub fn dipole(&self, bond: BondId) -> DipoleDirection {
        self.dipoles.get(bond)
    }

    pub fn en_scanner(&self) -> bool {
        self.en_scanner
    }

    pub fn show_hint(&self) -> bool {
        self.show_hint
    }

    pub fn explanation(&self) -> Option<&Explanation> {
        self.explanation.as_ref()
    }

    /// An explanation request is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_guess_correct(&self) -> bool {
        self.last_guess_correct
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut S {
        &mut self.service
    }

    /// Cues emitted since the last drain, in order.
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// True once after an explanation lands.
    pub fn take_explanation_ready(&mut self) -> bool {
        std::mem::take(&mut self.explanation_ready)
    }

    /// True once after any state change the view should reflect.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
