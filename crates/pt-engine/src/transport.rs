//! Logical playback position.

use pt_ir::ROWS;

/// Playback position: pattern index, row, and sub-row tick.
///
/// Created at play, reset to (0, 0) on stop, advanced once per row clock
/// tick. Pattern advancement wraps by raw pattern count; the order table
/// is not consulted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Transport {
    /// Index into the song's pattern list.
    pub pattern_index: usize,
    /// Current row, 0-63.
    pub row: u16,
    /// Sub-row tick. A single tick per row in this engine, so always 0.
    pub tick: u8,
}

impl Transport {
    /// Back to pattern 0, row 0.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance one row. Returns true when the position wrapped into the
    /// next pattern.
    pub fn advance_row(&mut self, pattern_count: usize) -> bool {
        self.row += 1;
        if self.row < ROWS {
            return false;
        }
        self.row = 0;
        self.pattern_index = (self.pattern_index + 1) % pattern_count.max(1);
        true
    }
}
