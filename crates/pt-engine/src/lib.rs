//! Pattern-sequenced playback engine for the protrack player.
//!
//! The engine owns a logical transport (pattern, row) and four channel
//! voice slots. A row clock drives [`PlaybackEngine::tick`] once per row at
//! the PAL rate; each tick reads the current row, triggers voices through
//! the injected [`AudioSink`] capability, and advances the transport.

mod channel;
mod engine;
mod sink;
mod transport;

pub use channel::ChannelSlot;
pub use engine::{EngineError, PlaybackEngine};
pub use sink::{AudioSink, VoiceHandle};
pub use transport::Transport;

use std::time::Duration;

/// Row interval at the PAL rate: 50 Hz, 20 ms per row.
pub const ROW_INTERVAL: Duration = Duration::from_millis(20);
