//! Song data model for the protrack MOD player.
//!
//! A decoded module is an immutable [`Song`]: a title, 31 sample slots,
//! a bank of 64-row by 4-channel patterns, and the position/order table.
//! The decoder in `pt-formats` produces these values and the engine in
//! `pt-engine` consumes them; nothing mutates a Song after decode.

mod frequency;
mod pattern;
mod sample;
mod song;

pub use frequency::{
    gain_for_volume, note_name, period_to_frequency, playback_rate, AMIGA_PAL_CLOCK, PERIOD_MAX,
    PERIOD_MIN, PERIOD_TABLE,
};
pub use pattern::{NoteCell, Pattern, CHANNELS, ROWS};
pub use sample::SampleSlot;
pub use song::Song;
