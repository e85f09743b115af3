use serde::Serialize;
use serde_json::Value;

use crate::api::types::{SoundEvent, GameEvent};
use crate::input::queue::InputQueue;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Maximum number of sound events per frame (default: 32).
    pub max_sounds: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_sounds: 32,
            max_events: 32,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state and publish the first snapshot.
    fn init(&mut self, ctx: &mut EngineContext);

    /// The game loop tick. `dt` is the fixed timestep.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue, dt: f32);
}

/// Mutable access to engine output, passed to Game::init and Game::update.
///
/// Sounds and events are per-frame and cleared before every tick. Messages
/// accumulate until the host drains them with `take_messages`.
pub struct EngineContext {
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
    messages: Vec<Value>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self {
            sounds: Vec::new(),
            events: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Emit a sound event to be forwarded to TypeScript.
    pub fn emit_sound(&mut self, event: SoundEvent) {
        self.sounds.push(event);
    }

    /// Emit a game event to be forwarded to TypeScript.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Queue a structured message for the host.
    pub fn post_message<T: Serialize>(&mut self, message: &T) {
        match serde_json::to_value(message) {
            Ok(value) => self.messages.push(value),
            Err(err) => log::warn!("failed to serialize outbound message: {err}"),
        }
    }

    /// Number of messages waiting for the host.
    pub fn pending_messages(&self) -> usize {
        self.messages.len()
    }

    /// Take all queued messages, oldest first.
    pub fn take_messages(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.messages)
    }

    /// Clear per-frame transient data (sounds, events).
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}
