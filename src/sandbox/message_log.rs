//! Recording message sink.

use glam::IVec3;

use crate::messages::{MessageSink, MsgKind, SoundKind};

/// A sound heard in the sandbox.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sound {
    /// Origin.
    pub pos: IVec3,
    /// Audible range in tiles.
    pub volume: i32,
    /// Category.
    pub kind: SoundKind,
    /// What it sounded like.
    pub description: String,
}

/// Keeps every message and sound in arrival order.
#[derive(Clone, Debug, Default)]
pub struct MessageLog {
    messages: Vec<(MsgKind, String)>,
    sounds: Vec<Sound>,
}

impl MessageLog {
    /// Empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages so far.
    #[must_use]
    pub fn messages(&self) -> &[(MsgKind, String)] {
        &self.messages
    }

    /// Sounds so far.
    #[must_use]
    pub fn sounds(&self) -> &[Sound] {
        &self.sounds
    }

    /// Whether any message contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|(_, text)| text.contains(needle))
    }

    /// Whether any sound was described as `description`.
    #[must_use]
    pub fn heard(&self, description: &str) -> bool {
        self.sounds.iter().any(|s| s.description == description)
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.sounds.clear();
    }

    /// Move the recorded messages out, leaving the sounds.
    pub fn drain_messages(&mut self) -> Vec<(MsgKind, String)> {
        std::mem::take(&mut self.messages)
    }
}

impl MessageSink for MessageLog {
    fn add_msg(&mut self, kind: MsgKind, text: String) {
        self.messages.push((kind, text));
    }

    fn sound(&mut self, p: IVec3, volume: i32, kind: SoundKind, description: &str) {
        self.sounds.push(Sound {
            pos: p,
            volume,
            kind,
            description: description.to_owned(),
        });
    }
}
