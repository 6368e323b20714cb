//! Channel voice slots.

use crate::sink::VoiceHandle;

/// One of the four channel slots, owning at most one sounding voice.
///
/// Channels are never polyphonic: holding a new voice stops and discards
/// the previous one first.
#[derive(Default)]
pub struct ChannelSlot {
    handle: Option<Box<dyn VoiceHandle>>,
}

impl ChannelSlot {
    /// Is a voice currently held?
    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop and discard the held voice, if any.
    pub fn silence(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.stop();
        }
    }

    /// Take ownership of a new voice, stopping the previous one first.
    pub fn hold(&mut self, handle: Box<dyn VoiceHandle>) {
        self.silence();
        self.handle = Some(handle);
    }
}
