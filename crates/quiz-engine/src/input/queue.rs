use serde_json::Value;

/// Input delivered to the game. The engine attaches no meaning to kinds
/// or message contents.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A custom event from the UI layer (React buttons, 3D picking, etc.).
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
    /// A structured JSON message from the host (service replies, settings).
    Message(Value),
}

/// Events pushed by the host between frames, drained once a fixed step
/// has seen them.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Queue one event.
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Parse and push a JSON message. Malformed JSON is logged and dropped.
    pub fn push_json(&mut self, json: &str) -> bool {
        match serde_json::from_str::<Value>(json) {
            Ok(value) => {
                self.events.push(InputEvent::Message(value));
                true
            }
            Err(err) => {
                log::warn!("dropping malformed host message: {err}");
                false
            }
        }
    }

    /// Take every pending event, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pending events in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
