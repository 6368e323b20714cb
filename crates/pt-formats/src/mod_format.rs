//! ProTracker MOD format decoder.
//!
//! Fixed layout: 20-byte title, 31 x 30-byte sample headers, order length
//! at 950, 128-byte order table at 952, pattern data from 1084 (1024 bytes
//! per pattern, contiguous up to the highest ordered index), then the
//! sample PCM payloads concatenated in header order.

use arrayvec::ArrayString;
use log::debug;
use pt_ir::{NoteCell, Pattern, SampleSlot, Song, CHANNELS, ROWS};

use crate::DecodeError;

const TITLE_LEN: usize = 20;
const SAMPLE_HEADERS_OFFSET: usize = 20;
const SAMPLE_HEADER_LEN: usize = 30;
const SAMPLE_COUNT: usize = 31;
const ORDER_LEN_OFFSET: usize = 950;
const ORDER_TABLE_OFFSET: usize = 952;
const ORDER_TABLE_LEN: usize = 128;
const PATTERN_DATA_OFFSET: usize = 1084;
const PATTERN_BYTES: usize = 1024; // 64 rows * 4 channels * 4 bytes

/// Decode a ProTracker module from raw bytes.
///
/// Pure: no side effects, and the same bytes always decode to structurally
/// equal songs. Fails with [`DecodeError::Truncated`] if the buffer ends
/// before any region the header declares; zero-length samples are valid
/// and simply carry no PCM.
pub fn decode_module(data: &[u8]) -> Result<Song, DecodeError> {
    ensure_len(data, PATTERN_DATA_OFFSET)?;

    let title = parse_string::<32>(&data[..TITLE_LEN]);

    let mut samples = Vec::with_capacity(SAMPLE_COUNT);
    for i in 0..SAMPLE_COUNT {
        let offset = SAMPLE_HEADERS_OFFSET + i * SAMPLE_HEADER_LEN;
        samples.push(parse_sample_header(&data[offset..offset + SAMPLE_HEADER_LEN]));
    }

    let order_len = (data[ORDER_LEN_OFFSET] as usize).min(ORDER_TABLE_LEN);
    let order_table = &data[ORDER_TABLE_OFFSET..ORDER_TABLE_OFFSET + ORDER_TABLE_LEN];
    let order = order_table[..order_len].to_vec();

    // The pattern region covers every index the table can reach, including
    // entries past the used position count.
    let max_pattern = order_table.iter().copied().max().unwrap_or(0) as usize;

    let mut patterns = Vec::with_capacity(max_pattern + 1);
    for index in 0..=max_pattern {
        let offset = PATTERN_DATA_OFFSET + index * PATTERN_BYTES;
        ensure_len(data, offset + PATTERN_BYTES)?;
        patterns.push(parse_pattern(&data[offset..offset + PATTERN_BYTES]));
    }

    let mut pcm_offset = PATTERN_DATA_OFFSET + (max_pattern + 1) * PATTERN_BYTES;
    for slot in &mut samples {
        let len = slot.len_bytes();
        if len == 0 {
            continue;
        }
        ensure_len(data, pcm_offset + len)?;
        slot.pcm = Some(
            data[pcm_offset..pcm_offset + len]
                .iter()
                .map(|&b| (b as f32 - 128.0) / 128.0)
                .collect(),
        );
        pcm_offset += len;
    }

    debug!(
        "decoded module '{}': {} patterns, {} positions, {} samples with data",
        title,
        patterns.len(),
        order.len(),
        samples.iter().filter(|s| s.has_pcm()).count(),
    );

    Ok(Song { title, samples, patterns, order })
}

fn ensure_len(data: &[u8], needed: usize) -> Result<(), DecodeError> {
    if data.len() < needed {
        return Err(DecodeError::Truncated { needed, len: data.len() });
    }
    Ok(())
}

/// Parse a fixed-size string field: stop at the first NUL, trim whitespace.
///
/// Non-UTF-8 bytes become replacement characters, which can expand past the
/// capacity; the result is truncated at the last whole char that fits.
fn parse_string<const CAP: usize>(data: &[u8]) -> ArrayString<CAP> {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    let text = String::from_utf8_lossy(&data[..end]);
    let mut out = ArrayString::new();
    for ch in text.trim().chars() {
        if out.try_push(ch).is_err() {
            break;
        }
    }
    out
}

/// Parse one 30-byte sample header. PCM is attached later.
fn parse_sample_header(data: &[u8]) -> SampleSlot {
    let finetune = (data[24] & 0x0F) as i8;
    SampleSlot {
        name: parse_string::<26>(&data[..22]),
        length_words: u16::from_be_bytes([data[22], data[23]]),
        finetune: if finetune > 7 { finetune - 16 } else { finetune },
        volume: data[25].min(64),
        repeat_point_words: u16::from_be_bytes([data[26], data[27]]),
        repeat_length_words: u16::from_be_bytes([data[28], data[29]]),
        pcm: None,
    }
}

/// Parse one 1024-byte pattern.
fn parse_pattern(data: &[u8]) -> Pattern {
    let mut pattern = Pattern::new();
    for row in 0..ROWS {
        for channel in 0..CHANNELS {
            let offset = (row as usize * CHANNELS as usize + channel as usize) * 4;
            *pattern.cell_mut(row, channel) = parse_cell(&data[offset..offset + 4]);
        }
    }
    pattern
}

/// Unpack a 4-byte note cell.
///
/// Byte 0: period bits 8-11 (low nibble), sample number bits 4-7 (high nibble).
/// Byte 1: period bits 0-7.
/// Byte 2: sample number bits 0-3 (high nibble), effect command (low nibble).
/// Byte 3: effect parameter.
fn parse_cell(data: &[u8]) -> NoteCell {
    NoteCell {
        period: (((data[0] & 0x0F) as u16) << 8) | data[1] as u16,
        sample_number: (data[0] & 0xF0) | ((data[2] & 0xF0) >> 4),
        effect: data[2] & 0x0F,
        effect_param: data[3],
    }
}
