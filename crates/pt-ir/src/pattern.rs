//! Pattern and note cell types.

use crate::frequency::period_to_frequency;

/// Rows per pattern. Fixed by the ProTracker format.
pub const ROWS: u16 = 64;

/// Channels per pattern. Fixed by the ProTracker format.
pub const CHANNELS: u8 = 4;

/// A single note cell in a pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoteCell {
    /// Amiga period (0 = no note, otherwise 113-856).
    pub period: u16,
    /// Sample number (0 = no retrigger, 1-31 references `samples[n - 1]`).
    pub sample_number: u8,
    /// Raw effect command (0-15). Decoded but not executed by the engine.
    pub effect: u8,
    /// Raw effect parameter.
    pub effect_param: u8,
}

impl NoteCell {
    /// Output frequency implied by the cell's period (0.0 for no note).
    pub fn frequency_hz(&self) -> f64 {
        period_to_frequency(self.period)
    }

    /// Does this cell carry both a sample and a pitch?
    pub fn is_note_trigger(&self) -> bool {
        self.period > 0 && self.sample_number > 0
    }

    /// Returns true if the cell is completely empty.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A fixed 64-row by 4-channel grid of note cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    /// Cell data, stored row-major: `data[row * 4 + channel]`.
    pub data: Vec<NoteCell>,
}

impl Pattern {
    /// Create an empty pattern.
    pub fn new() -> Self {
        Self {
            data: vec![NoteCell::default(); ROWS as usize * CHANNELS as usize],
        }
    }

    /// Get a reference to a cell.
    pub fn cell(&self, row: u16, channel: u8) -> &NoteCell {
        debug_assert!(row < ROWS);
        debug_assert!(channel < CHANNELS);
        &self.data[row as usize * CHANNELS as usize + channel as usize]
    }

    /// Get a mutable reference to a cell.
    pub fn cell_mut(&mut self, row: u16, channel: u8) -> &mut NoteCell {
        debug_assert!(row < ROWS);
        debug_assert!(channel < CHANNELS);
        &mut self.data[row as usize * CHANNELS as usize + channel as usize]
    }

    /// All cells of one row.
    pub fn row(&self, row: u16) -> &[NoteCell] {
        let start = row as usize * CHANNELS as usize;
        &self.data[start..start + CHANNELS as usize]
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self::new()
    }
}
