//! Player-facing notifications.
//!
//! Messages and sounds are fire-and-forget. Diagnostics never go through this
//! sink; they use the `log` macros instead.

use glam::IVec3;

/// Tone of a message shown to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MsgKind {
    /// Plain narration.
    Neutral,
    /// Status information.
    Info,
    /// Something went well.
    Good,
    /// Something went badly.
    Bad,
    /// Imminent danger.
    Warning,
}

/// Category of a sound for hearing and reaction purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundKind {
    /// Crashes, impacts and traps going off.
    Combat,
    /// Engines and other machinery.
    Movement,
}

/// Receiver of messages and sounds produced while moving vehicles.
pub trait MessageSink {
    /// Show `text` to the player.
    fn add_msg(&mut self, kind: MsgKind, text: String);

    /// Emit a sound at `p` audible up to `volume` tiles away.
    fn sound(&mut self, p: IVec3, volume: i32, kind: SoundKind, description: &str);
}
