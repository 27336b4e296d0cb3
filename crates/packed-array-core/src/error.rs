//! Error types for packed array operations.
//!
//! Both representations of a packed array report failures through the same
//! [`PackedError`]: index checks happen before any work is delegated to a
//! foreign handle, so a local buffer and a proxy fail identically.
//!
//! ## Error Hierarchy
//!
//! ```text
//! PackedError
//! ├── IndexOutOfBounds  - element index outside the array
//! ├── OffsetOutOfRange  - byte offset/width outside a byte array
//! ├── Foreign           - non-zero error code returned by a proxy
//! ├── InvalidHex        - malformed hexadecimal text
//! └── Compression       - wraps CompressionError
//! ```

use thiserror::Error;

use packed_array_compress::CompressionError;

/// Result alias for packed array operations.
pub type Result<T> = std::result::Result<T, PackedError>;

/// Errors raised by packed array operations.
#[derive(Debug, Error)]
pub enum PackedError {
    /// An element index was outside `0..len` (or `0..=len` for inserts).
    #[error("index {index} out of bounds for packed array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A typed byte access did not fit inside the byte array.
    #[error("cannot access {width} bytes at offset {offset} in byte array of length {len}")]
    OffsetOutOfRange {
        offset: usize,
        width: usize,
        len: usize,
    },

    /// The foreign backend rejected an operation with an engine error code.
    #[error("foreign {operation} failed with error code {code}")]
    Foreign { operation: &'static str, code: i64 },

    /// Text passed to a hex decoder was not valid hexadecimal.
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    /// Compression or decompression failed.
    #[error(transparent)]
    Compression(#[from] CompressionError),
}

impl PackedError {
    /// Create an out-of-bounds error.
    #[inline]
    pub fn out_of_bounds(index: usize, len: usize) -> Self {
        PackedError::IndexOutOfBounds { index, len }
    }

    /// Turn an engine error code into a result (`0` means success).
    #[inline]
    pub fn check_code(operation: &'static str, code: i64) -> Result<()> {
        if code == 0 {
            Ok(())
        } else {
            Err(PackedError::Foreign { operation, code })
        }
    }
}
