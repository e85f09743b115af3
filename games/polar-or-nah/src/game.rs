//! Polar or Nah? game - thin adapter between the engine and the controller.
//!
//! Turns host input into controller actions and publishes cues, numeric
//! events and JSON snapshots back out.

use quiz_engine::api::game::GameConfig;
use quiz_engine::input::queue::{InputEvent, InputQueue};
use quiz_engine::{EngineContext, Game, GameEvent};
use serde_json::Value;

use crate::catalog::{BondId, Catalog};
use crate::controller::PhaseController;
use crate::explain::BridgeExplainer;
use crate::messages::{GameMessage, HostMessage};
use crate::phase::{Action, GamePhase, PowerUp};
use crate::view::RoundView;

/// Custom event kinds from the UI.
pub mod events {
    pub const START: u32 = 1;
    pub const BOND_CLICK: u32 = 2; // a: bond id
    pub const ADVANCE: u32 = 3;
    pub const BACK: u32 = 4;
    pub const GUESS: u32 = 5; // a: 1 polar, 0 non-polar
    pub const NEXT: u32 = 6;
    pub const RESTART: u32 = 7;
    pub const POWER_UP: u32 = 8; // a: 0 EN scanner, 1 hint
}

/// Game event kinds to the UI.
pub mod game_events {
    pub const PHASE: f32 = 1.0;
    pub const SCORE: f32 = 2.0;
    pub const TIME_LEFT: f32 = 3.0;
    pub const ROUND_SCORE: f32 = 4.0;
    pub const EXPLANATION_READY: f32 = 5.0;
}

pub struct PolarOrNah {
    controller: PhaseController<BridgeExplainer>,
}

impl PolarOrNah {
    pub fn new() -> Self {
        let catalog = Catalog::load().expect("Failed to load molecule catalog");
        Self::with_controller(PhaseController::new(catalog, BridgeExplainer::new()))
    }

    pub fn with_controller(controller: PhaseController<BridgeExplainer>) -> Self {
        Self { controller }
    }

    pub fn controller(&self) -> &PhaseController<BridgeExplainer> {
        &self.controller
    }

    /// Map a custom event to a controller action.
    fn action_for(kind: u32, a: f32) -> Option<Action> {
        match kind {
            events::START => Some(Action::Start),
            events::BOND_CLICK if a >= 0.0 && a.is_finite() => Some(Action::BondClick(BondId(a as u32))),
            events::ADVANCE => Some(Action::Advance),
            events::BACK => Some(Action::Back),
            events::GUESS => Some(Action::Guess { polar: a >= 0.5 }),
            events::NEXT => Some(Action::Next),
            events::RESTART => Some(Action::Restart),
            events::POWER_UP => match a as i32 {
                0 => Some(Action::TogglePowerUp(PowerUp::EnScanner)),
                1 => Some(Action::TogglePowerUp(PowerUp::Hint)),
                _ => None,
            },
            _ => None,
        }
    }

    fn handle_message(&mut self, value: &Value) {
        match HostMessage::from_value(value) {
            Ok(HostMessage::Explainer { online }) => {
                self.controller.service_mut().set_online(online);
            }
            Ok(HostMessage::Explanation(reply)) => {
                self.controller.service_mut().deliver(reply);
            }
            Err(err) => log::warn!("dropping host message: {}", err),
        }
    }

    /// Forward everything the controller produced this step.
    fn publish(&mut self, ctx: &mut EngineContext) {
        for cue in self.controller.drain_cues() {
            ctx.emit_sound(cue.sound());
        }

        for request in self.controller.service_mut().take_requests() {
            ctx.post_message(&GameMessage::Explain(request));
        }

        if self.controller.take_explanation_ready() {
            ctx.emit_event(GameEvent::new(game_events::EXPLANATION_READY, 0.0, 0.0, 0.0));
        }

        if !self.controller.take_dirty() {
            return;
        }

        let phase = self.controller.phase();
        let round_score = self.controller.round_score();
        ctx.emit_event(GameEvent::new(game_events::PHASE, phase.code() as f32, 0.0, 0.0));
        ctx.emit_event(GameEvent::new(
            game_events::SCORE,
            self.controller.score() as f32,
            round_score.total() as f32,
            0.0,
        ));
        ctx.emit_event(GameEvent::new(
            game_events::TIME_LEFT,
            self.controller.time_left() as f32,
            0.0,
            0.0,
        ));
        if phase == GamePhase::Result {
            ctx.emit_event(GameEvent::new(
                game_events::ROUND_SCORE,
                round_score.polarity_points as f32,
                round_score.bond_points as f32,
                round_score.time_bonus as f32,
            ));
        }

        ctx.post_message(&GameMessage::View(RoundView::capture(&self.controller)));
    }
}

impl Default for PolarOrNah {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for PolarOrNah {
    fn config(&self) -> GameConfig {
        GameConfig {
            max_sounds: 16,
            max_events: 16,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        log::info!("Polar or Nah: {} molecules loaded", self.controller.total_rounds());
        self.publish(ctx);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue, dt: f32) {
        for event in input.iter() {
            match event {
                InputEvent::Custom { kind, a, .. } => match Self::action_for(*kind, *a) {
                    Some(action) => {
                        self.controller.dispatch(action);
                    }
                    None => log::debug!("unhandled custom event {} ({})", kind, a),
                },
                InputEvent::Message(value) => self.handle_message(value),
            }
        }

        self.controller.advance_clock(dt);
        self.controller.pump_explanations();
        self.publish(ctx);
    }
}
