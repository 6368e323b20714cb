//! Sample slot type.

use std::sync::Arc;

use arrayvec::ArrayString;

/// One of the 31 sample slots in a module.
///
/// `pcm` is `None` until the decoder has extracted the sample payload; a
/// slot with `length_words == 0` never gets PCM data and is never
/// triggered. Decoded values are floats in [-1, 1), shared behind an `Arc`
/// so triggering a note never copies the sample.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleSlot {
    /// Sample name, trimmed from the 22-byte header field.
    pub name: ArrayString<26>,
    /// Sample length in 16-bit words (byte length = value * 2).
    pub length_words: u16,
    /// Finetune, a signed nibble. Parsed but not applied during playback.
    pub finetune: i8,
    /// Default volume (0-64).
    pub volume: u8,
    /// Loop start in words. Parsed but not applied during playback.
    pub repeat_point_words: u16,
    /// Loop length in words. Parsed but not applied during playback.
    pub repeat_length_words: u16,
    /// Decoded PCM data, `None` until loaded.
    pub pcm: Option<Arc<[f32]>>,
}

impl Default for SampleSlot {
    fn default() -> Self {
        Self {
            name: ArrayString::new(),
            length_words: 0,
            finetune: 0,
            volume: 64,
            repeat_point_words: 0,
            repeat_length_words: 0,
            pcm: None,
        }
    }
}

impl SampleSlot {
    /// Sample length in bytes.
    pub fn len_bytes(&self) -> usize {
        self.length_words as usize * 2
    }

    /// Returns true if the slot holds no audio.
    pub fn is_empty(&self) -> bool {
        self.length_words == 0
    }

    /// Returns true once PCM data has been loaded.
    pub fn has_pcm(&self) -> bool {
        self.pcm.is_some()
    }
}
