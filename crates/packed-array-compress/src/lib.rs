//! Block compression for packed byte arrays.
//!
//! - **fastlz** - FastLZ-format LZ77 block codec (levels 1 and 2),
//!   bounds-checked on decode
//! - **mode** - engine compression modes (FastLZ, Deflate, Zstd, Gzip)
//!   dispatched through one front end
//!
//! # Usage
//!
//! ```
//! use packed_array_compress::fastlz;
//!
//! let data = [0u8; 16];
//! let packed = fastlz::compress(&data);
//! assert_eq!(fastlz::decompress(&packed, data.len()).unwrap(), data);
//! ```

pub mod error;
pub mod fastlz;
pub mod mode;

pub use error::{CompressionError, Result};
pub use fastlz::Level;
pub use mode::{CompressionMode, FASTLZ_MIN_BLOCK, compress, decompress, decompress_dynamic};
