use quiz_engine::SoundEvent;

/// Named audio cues. The numeric ids are what the host's audio layer keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Click,
    Pop,
    Success,
    Wrong,
    Start,
    PowerUp,
}

impl Cue {
    pub fn name(self) -> &'static str {
        match self {
            Cue::Click => "click",
            Cue::Pop => "pop",
            Cue::Success => "success",
            Cue::Wrong => "wrong",
            Cue::Start => "start",
            Cue::PowerUp => "powerup",
        }
    }

    pub fn sound(self) -> SoundEvent {
        SoundEvent(match self {
            Cue::Click => 1,
            Cue::Pop => 2,
            Cue::Success => 3,
            Cue::Wrong => 4,
            Cue::Start => 5,
            Cue::PowerUp => 6,
        })
    }
}
