//! cpal audio output backend for the protrack player.

mod cpal_backend;

pub use cpal_backend::CpalSink;

use thiserror::Error;

/// Error type for audio device operations.
#[derive(Debug, Error)]
pub enum AudioError {
    /// No audio output device available.
    #[error("no audio output device available")]
    NoDevice,
    /// Failed to query the device configuration.
    #[error("device init error: {0}")]
    DeviceInit(String),
    /// Failed to create the audio stream.
    #[error("stream create error: {0}")]
    StreamCreate(String),
    /// Playback error.
    #[error("playback error: {0}")]
    Playback(String),
}
