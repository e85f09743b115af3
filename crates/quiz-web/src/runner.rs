use quiz_engine::{
    Game, GameConfig, EngineContext,
    InputEvent, InputQueue,
    FixedTimestep, ProtocolLayout,
};
use quiz_engine::bridge::protocol::HEADER_FLOATS;

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    /// Empty queue handed to the extra fixed steps of a slow frame.
    idle: InputQueue,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    initialized: bool,
    frame: u64,
    header: [f32; HEADER_FLOATS],
    /// Flat buffer of sound event IDs for host reads.
    sound_buffer: Vec<u8>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt);
        let layout = ProtocolLayout::from_config(&config);
        let sound_buffer = Vec::with_capacity(config.max_sounds);

        Self {
            game,
            ctx: EngineContext::new(),
            input: InputQueue::new(),
            idle: InputQueue::new(),
            timestep,
            layout,
            config,
            initialized: false,
            frame: 0,
            header: [0.0; HEADER_FLOATS],
            sound_buffer,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.config = self.game.config();
        self.layout = ProtocolLayout::from_config(&self.config);
        self.timestep = FixedTimestep::new(self.config.fixed_dt);
        self.game.init(&mut self.ctx);
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Parse a JSON message from the host and queue it.
    pub fn push_message(&mut self, json: &str) {
        self.input.push_json(json);
    }

    /// Run one frame tick: update the game at the fixed rate and pack output.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();

        // Input is delivered to the first fixed step only, so a click is
        // never applied twice when a slow frame runs several steps.
        let steps = self.timestep.accumulate(dt);
        let fixed_dt = self.timestep.dt();
        let mut delivered = false;
        for _ in 0..steps {
            let input = if delivered { &self.idle } else { &self.input };
            self.game.update(&mut self.ctx, input, fixed_dt);
            delivered = true;
        }

        // Drain input only once it reached the game
        if delivered {
            self.input.drain();
        }

        if self.ctx.sounds.len() > self.layout.max_sounds {
            log::warn!(
                "frame {}: {} sounds exceed capacity {}, truncating",
                self.frame,
                self.ctx.sounds.len(),
                self.layout.max_sounds
            );
        }
        if self.ctx.events.len() > self.layout.max_events {
            log::warn!(
                "frame {}: {} events exceed capacity {}, truncating",
                self.frame,
                self.ctx.events.len(),
                self.layout.max_events
            );
        }

        // Pack sound events into flat buffer
        self.sound_buffer.clear();
        for sound in self.ctx.sounds.iter().take(self.layout.max_sounds) {
            self.sound_buffer.push(sound.0 as u8);
        }

        self.frame += 1;
        self.layout.write_header(
            &mut self.header,
            self.frame,
            self.ctx.sounds.len(),
            self.ctx.events.len(),
            self.ctx.pending_messages(),
            fixed_dt,
        );
    }

    /// Serialize and clear all queued outbound messages as a JSON array.
    pub fn take_messages(&mut self) -> String {
        let messages = self.ctx.take_messages();
        serde_json::to_string(&messages).unwrap_or_else(|err| {
            log::warn!("failed to encode outbound messages: {err}");
            "[]".to_string()
        })
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    // ---- Pointer accessors for host reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn sound_events(&self) -> &[u8] {
        &self.sound_buffer
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len().min(self.layout.max_events) as u32
    }

    pub fn game_events(&self) -> &[quiz_engine::GameEvent] {
        let len = self.game_events_len() as usize;
        &self.ctx.events[..len]
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_sounds(&self) -> u32 {
        self.layout.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}
