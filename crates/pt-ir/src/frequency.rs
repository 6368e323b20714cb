//! Period-to-frequency conversion for Amiga sample playback.
//!
//! ProTracker encodes pitch as a Paula period value; the output frequency
//! is `AMIGA_PAL_CLOCK / (period * 2)`. Period 428 (C-2) gives the
//! familiar ~8287 Hz reference rate.

/// Amiga PAL master clock in Hz.
pub const AMIGA_PAL_CLOCK: f64 = 7_093_789.2;

/// Lowest valid period (highest pitch, B-3).
pub const PERIOD_MIN: u16 = 113;

/// Highest valid period (lowest pitch, C-1).
pub const PERIOD_MAX: u16 = 856;

/// The ProTracker period table, C-1 to B-3.
pub const PERIOD_TABLE: [u16; 36] = [
    856, 808, 762, 720, 678, 640, 604, 570, 538, 508, 480, 453, // C-1 to B-1
    428, 404, 381, 360, 339, 320, 302, 285, 269, 254, 240, 226, // C-2 to B-2
    214, 202, 190, 180, 170, 160, 151, 143, 135, 127, 120, 113, // C-3 to B-3
];

/// Note names matching `PERIOD_TABLE` entry for entry.
const NOTE_NAMES: [&str; 36] = [
    "C-1", "C#1", "D-1", "D#1", "E-1", "F-1", "F#1", "G-1", "G#1", "A-1", "A#1", "B-1",
    "C-2", "C#2", "D-2", "D#2", "E-2", "F-2", "F#2", "G-2", "G#2", "A-2", "A#2", "B-2",
    "C-3", "C#3", "D-3", "D#3", "E-3", "F-3", "F#3", "G-3", "G#3", "A-3", "A#3", "B-3",
];

/// Convert an Amiga period to an output frequency in Hz.
///
/// Returns 0.0 for period 0 (no note).
pub fn period_to_frequency(period: u16) -> f64 {
    if period == 0 {
        return 0.0;
    }
    AMIGA_PAL_CLOCK / (period as f64 * 2.0)
}

/// Playback-rate multiplier for a sample whose native rate equals the
/// output device rate.
///
/// Returns 0.0 when either the period or the output rate is 0.
pub fn playback_rate(period: u16, output_rate: u32) -> f64 {
    if period == 0 || output_rate == 0 {
        return 0.0;
    }
    period_to_frequency(period) / output_rate as f64
}

/// Linear gain for a sample volume (0-64 scale, clamped).
pub fn gain_for_volume(volume: u8) -> f32 {
    volume.min(64) as f32 / 64.0
}

/// Look up the note name for an exact period table value.
pub fn note_name(period: u16) -> Option<&'static str> {
    PERIOD_TABLE
        .iter()
        .position(|&p| p == period)
        .map(|i| NOTE_NAMES[i])
}
