//! Compression error types.

use thiserror::Error;

/// Result alias for compression operations.
pub type Result<T> = std::result::Result<T, CompressionError>;

/// Errors raised while compressing or decompressing a byte buffer.
#[derive(Debug, Error)]
pub enum CompressionError {
    /// The level tag in the first byte of a FastLZ block is not 1 or 2.
    #[error("unknown FastLZ level tag {0}")]
    UnknownLevel(u8),

    /// A requested FastLZ level is not 1 or 2.
    #[error("invalid FastLZ level {0}")]
    InvalidLevel(u8),

    /// An engine compression mode value has no matching mode.
    #[error("invalid compression mode {0}")]
    InvalidMode(i64),

    /// Decoding would write more than the allowed output size.
    #[error("decompressed data exceeds the output limit of {limit} bytes")]
    OutputOverrun { limit: usize },

    /// The compressed stream ended in the middle of a token.
    #[error("compressed data is truncated at byte {offset}")]
    TruncatedInput { offset: usize },

    /// A back-reference points before the start of the output.
    #[error("back-reference distance {distance} exceeds the {produced} bytes produced so far")]
    InvalidReference { distance: usize, produced: usize },

    /// Decompressed data does not have the size the caller declared.
    #[error("decompressed {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    /// The mode is recognised but not available in this build.
    #[error("compression mode {0} is not supported")]
    UnsupportedMode(&'static str),

    /// An underlying stream codec failed.
    #[error("{mode} stream error: {source}")]
    Io {
        mode: &'static str,
        #[source]
        source: std::io::Error,
    },
}
