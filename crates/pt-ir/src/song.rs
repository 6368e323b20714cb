//! The decoded song.

use arrayvec::ArrayString;

use crate::pattern::Pattern;
use crate::sample::SampleSlot;

/// A complete decoded module.
///
/// Immutable once decoded: decoding the same bytes twice yields songs that
/// compare equal field by field.
#[derive(Clone, Debug, PartialEq)]
pub struct Song {
    /// Song title, trimmed from the 20-byte header field.
    pub title: ArrayString<32>,
    /// The 31 sample slots. Pattern cells reference these 1-based.
    pub samples: Vec<SampleSlot>,
    /// Patterns 0 through the highest index named by the order table.
    pub patterns: Vec<Pattern>,
    /// Used entries of the 128-byte position/order table.
    ///
    /// Parsed and exposed for inspection, but the transport wraps by raw
    /// pattern count and does not consult this table.
    pub order: Vec<u8>,
}

impl Song {
    /// Number of sample slots that carry audio data.
    pub fn loaded_sample_count(&self) -> usize {
        self.samples.iter().filter(|s| s.has_pcm()).count()
    }

    /// Look up a sample by its 1-based pattern-cell number.
    pub fn sample_for_number(&self, sample_number: u8) -> Option<&SampleSlot> {
        if sample_number == 0 {
            return None;
        }
        self.samples.get(sample_number as usize - 1)
    }
}
