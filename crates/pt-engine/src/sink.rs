//! Audio output capability consumed by the engine.
//!
//! The engine never talks to an audio device directly; it is handed
//! something that can start a mono PCM buffer at a playback rate and gain
//! and hand back a stoppable voice. `pt-audio` provides the cpal-backed
//! implementation; tests substitute a recording mock.

use std::sync::Arc;

/// An audio output sink.
pub trait AudioSink {
    /// Output device sample rate in Hz.
    fn sample_rate(&self) -> u32;

    /// Start playing a mono PCM buffer at the given playback-rate
    /// multiplier and linear gain, returning a handle for the new voice.
    fn start_voice(&mut self, pcm: Arc<[f32]>, rate: f64, gain: f32) -> Box<dyn VoiceHandle>;
}

/// A single sounding voice started through an [`AudioSink`].
pub trait VoiceHandle {
    /// Silence the voice immediately.
    ///
    /// Dropping a handle without calling this lets the one-shot sample run
    /// to completion; the engine always stops a channel's previous voice
    /// before starting its replacement.
    fn stop(&mut self);
}
