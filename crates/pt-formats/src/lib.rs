//! ProTracker MOD decoding for the protrack player.
//!
//! One entry point: [`decode_module`], a pure function from raw bytes to a
//! [`pt_ir::Song`].

mod mod_format;

pub use mod_format::decode_module;

use thiserror::Error;

/// Decode failure. Fatal to the decode call; never partial.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer ends before a region the header declares.
    #[error("module truncated: need {needed} bytes, got {len}")]
    Truncated { needed: usize, len: usize },
}
