//! Compression modes and the front end shared by byte arrays.
//!
//! Mode numbers match the engine's `CompressionMode` enum, so a mode can be
//! passed straight through from engine integers:
//!
//! ```ignore
//! let mode = CompressionMode::from_engine(1)?; // Deflate
//! let packed = compress(&data, mode)?;
//! let plain = decompress(&packed, data.len(), mode)?;
//! ```

use std::io::{self, Read};

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::{CompressionError, Result};
use crate::fastlz;

/// Compression algorithm selector.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, TryFromPrimitive, IntoPrimitive,
)]
#[repr(u8)]
pub enum CompressionMode {
    /// FastLZ block format; the caller must know the decompressed size.
    #[default]
    FastLz = 0,
    /// Deflate with zlib framing.
    Deflate = 1,
    /// Zstandard frame.
    Zstd = 2,
    /// Gzip member.
    Gzip = 3,
    /// Brotli; not available in this build.
    Brotli = 4,
}

impl CompressionMode {
    /// Convert an engine integer.
    pub fn from_engine(value: i64) -> Result<Self> {
        u8::try_from(value)
            .ok()
            .and_then(|v| Self::try_from_primitive(v).ok())
            .ok_or(CompressionError::InvalidMode(value))
    }

    /// Lowercase mode name, as used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            CompressionMode::FastLz => "fastlz",
            CompressionMode::Deflate => "deflate",
            CompressionMode::Zstd => "zstd",
            CompressionMode::Gzip => "gzip",
            CompressionMode::Brotli => "brotli",
        }
    }
}

/// Smallest block the engine hands to FastLZ. Shorter inputs are
/// zero-padded to this size, and shorter outputs are decoded into a block
/// of this size and cut down.
pub const FASTLZ_MIN_BLOCK: usize = 16;

/// Compress `input` with `mode`.
pub fn compress(input: &[u8], mode: CompressionMode) -> Result<Vec<u8>> {
    match mode {
        CompressionMode::FastLz if input.len() < FASTLZ_MIN_BLOCK => {
            let mut padded = [0u8; FASTLZ_MIN_BLOCK];
            padded[..input.len()].copy_from_slice(input);
            Ok(fastlz::compress(&padded))
        }
        CompressionMode::FastLz => Ok(fastlz::compress(input)),
        CompressionMode::Deflate => deflate::compress_zlib(input),
        CompressionMode::Gzip => deflate::compress_gzip(input),
        CompressionMode::Zstd => zstd_codec::compress(input),
        CompressionMode::Brotli => Err(CompressionError::UnsupportedMode(mode.name())),
    }
}

/// Decompress `input`, which must expand to exactly `buffer_size` bytes.
pub fn decompress(input: &[u8], buffer_size: usize, mode: CompressionMode) -> Result<Vec<u8>> {
    let out = match mode {
        CompressionMode::FastLz if buffer_size < FASTLZ_MIN_BLOCK => {
            let mut block = fastlz::decompress(input, FASTLZ_MIN_BLOCK)?;
            block.truncate(buffer_size);
            block
        }
        CompressionMode::FastLz => fastlz::decompress(input, buffer_size)?,
        _ => decompress_stream(input, Some(buffer_size), mode)?,
    };
    if out.len() != buffer_size {
        return Err(CompressionError::SizeMismatch {
            expected: buffer_size,
            actual: out.len(),
        });
    }
    Ok(out)
}

/// Decompress a self-delimiting stream of unknown size.
///
/// `max_output_size` caps the output; `None` means unlimited. FastLZ blocks
/// carry no end marker and are rejected.
pub fn decompress_dynamic(
    input: &[u8],
    max_output_size: Option<usize>,
    mode: CompressionMode,
) -> Result<Vec<u8>> {
    match mode {
        CompressionMode::FastLz | CompressionMode::Brotli => {
            Err(CompressionError::UnsupportedMode(mode.name()))
        }
        _ => decompress_stream(input, max_output_size, mode),
    }
}

fn decompress_stream(
    input: &[u8],
    limit: Option<usize>,
    mode: CompressionMode,
) -> Result<Vec<u8>> {
    let reader: Box<dyn Read + '_> = match mode {
        CompressionMode::Deflate => deflate::zlib_reader(input)?,
        CompressionMode::Gzip => deflate::gzip_reader(input)?,
        CompressionMode::Zstd => zstd_codec::reader(input)?,
        CompressionMode::FastLz | CompressionMode::Brotli => {
            return Err(CompressionError::UnsupportedMode(mode.name()));
        }
    };
    read_limited(reader, limit, mode.name())
}

// Read one byte past the limit so an oversized stream is detected rather
// than silently truncated.
fn read_limited(reader: impl Read, limit: Option<usize>, mode: &'static str) -> Result<Vec<u8>> {
    let io_error = |source: io::Error| CompressionError::Io { mode, source };
    let mut out = Vec::new();
    match limit {
        Some(limit) => {
            reader
                .take((limit as u64).saturating_add(1))
                .read_to_end(&mut out)
                .map_err(io_error)?;
            if out.len() > limit {
                return Err(CompressionError::OutputOverrun { limit });
            }
        }
        None => {
            let mut reader = reader;
            reader.read_to_end(&mut out).map_err(io_error)?;
        }
    }
    Ok(out)
}

// =============================================================================
// Deflate / Gzip
// =============================================================================

#[cfg(feature = "deflate")]
mod deflate {
    use std::io::{Read, Write};

    use flate2::Compression;
    use flate2::read::{GzDecoder, ZlibDecoder};
    use flate2::write::{GzEncoder, ZlibEncoder};

    use crate::error::{CompressionError, Result};

    fn io_error(mode: &'static str) -> impl FnOnce(std::io::Error) -> CompressionError {
        move |source| CompressionError::Io { mode, source }
    }

    pub fn compress_zlib(input: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(input).map_err(io_error("deflate"))?;
        encoder.finish().map_err(io_error("deflate"))
    }

    pub fn compress_gzip(input: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(input).map_err(io_error("gzip"))?;
        encoder.finish().map_err(io_error("gzip"))
    }

    pub fn zlib_reader(input: &[u8]) -> Result<Box<dyn Read + '_>> {
        Ok(Box::new(ZlibDecoder::new(input)))
    }

    pub fn gzip_reader(input: &[u8]) -> Result<Box<dyn Read + '_>> {
        Ok(Box::new(GzDecoder::new(input)))
    }
}

#[cfg(not(feature = "deflate"))]
mod deflate {
    use std::io::Read;

    use crate::error::{CompressionError, Result};

    pub fn compress_zlib(_input: &[u8]) -> Result<Vec<u8>> {
        Err(CompressionError::UnsupportedMode("deflate"))
    }

    pub fn compress_gzip(_input: &[u8]) -> Result<Vec<u8>> {
        Err(CompressionError::UnsupportedMode("gzip"))
    }

    pub fn zlib_reader(_input: &[u8]) -> Result<Box<dyn Read + '_>> {
        Err(CompressionError::UnsupportedMode("deflate"))
    }

    pub fn gzip_reader(_input: &[u8]) -> Result<Box<dyn Read + '_>> {
        Err(CompressionError::UnsupportedMode("gzip"))
    }
}

// =============================================================================
// Zstandard
// =============================================================================

#[cfg(feature = "zstd")]
mod zstd_codec {
    use std::io::Read;

    use crate::error::{CompressionError, Result};

    const LEVEL: i32 = 3;

    pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
        zstd::encode_all(input, LEVEL).map_err(|source| CompressionError::Io {
            mode: "zstd",
            source,
        })
    }

    pub fn reader(input: &[u8]) -> Result<Box<dyn Read + '_>> {
        let decoder = zstd::stream::read::Decoder::new(input).map_err(|source| {
            CompressionError::Io {
                mode: "zstd",
                source,
            }
        })?;
        Ok(Box::new(decoder))
    }
}

#[cfg(not(feature = "zstd"))]
mod zstd_codec {
    use std::io::Read;

    use crate::error::{CompressionError, Result};

    pub fn compress(_input: &[u8]) -> Result<Vec<u8>> {
        Err(CompressionError::UnsupportedMode("zstd"))
    }

    pub fn reader(_input: &[u8]) -> Result<Box<dyn Read + '_>> {
        Err(CompressionError::UnsupportedMode("zstd"))
    }
}
