//! Operations specific to [`PackedByteArray`].
//!
//! Typed accessors read and write little-endian values at byte offsets,
//! reinterpretation views the bytes as another packed array, and the text
//! helpers decode common string encodings. Results are always new local
//! arrays; the source keeps its representation.
//!
//! # Usage
//!
//! ```
//! use packed_array::{CompressionMode, PackedByteArray};
//!
//! let mut bytes = PackedByteArray::from(vec![0; 8]);
//! bytes.encode_u32(0, 0xDEADBEEF).unwrap();
//! assert_eq!(bytes.decode_u32(0), Some(0xDEADBEEF));
//! assert_eq!(bytes.decode_u32(6), None);
//!
//! let packed = bytes.compress(CompressionMode::FastLz).unwrap();
//! let plain = packed.decompress(8, CompressionMode::FastLz).unwrap();
//! assert_eq!(plain, bytes);
//! ```

use packed_array_compress::{self as compression, CompressionMode};
use packed_array_core::half::{decode_f16, encode_f16};
use packed_array_core::{FixedWidth, PackedError, PackedKind, ProxyMethods, Result};

use crate::array::{Array, Storage};
use crate::kinds::{
    Bytes, Colors, Float32s, Float64s, Int32s, Int64s, PackedByteArray, PackedColorArray,
    PackedFloat32Array, PackedFloat64Array, PackedInt32Array, PackedInt64Array,
    PackedVector2Array, PackedVector3Array, PackedVector4Array, Vector2s, Vector3s, Vector4s,
};

macro_rules! typed_access {
    ($($decode:ident / $encode:ident: $ty:ty = $width:literal),* $(,)?) => {
        $(
            #[doc = concat!("Read a little-endian `", stringify!($ty), "` at `offset`.")]
            pub fn $decode(&self, offset: usize) -> Option<$ty> {
                self.read_at::<$width>(offset).map(<$ty>::from_le_bytes)
            }

            #[doc = concat!("Write a little-endian `", stringify!($ty), "` at `offset`.")]
            pub fn $encode(&mut self, offset: usize, value: $ty) -> Result<()> {
                self.write_at(offset, &value.to_le_bytes())
            }
        )*
    };
}

impl Array<Bytes> {
    // ========================================================================
    // Raw access
    // ========================================================================

    /// Run `f` over the bytes, copying them out of a foreign buffer first.
    pub fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        match self.as_local() {
            Some(bytes) => f(bytes),
            None => f(&self.to_vec()),
        }
    }

    fn check_range(&self, offset: usize, width: usize) -> Result<()> {
        let len = self.len();
        match offset.checked_add(width) {
            Some(end) if end <= len => Ok(()),
            _ => Err(PackedError::OffsetOutOfRange { offset, width, len }),
        }
    }

    fn read_at<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
        self.check_range(offset, N).ok()?;
        let mut out = [0u8; N];
        match self.storage() {
            Storage::Local(bytes) => out.copy_from_slice(&bytes[offset..offset + N]),
            Storage::Proxy(proxy) => {
                for (k, slot) in out.iter_mut().enumerate() {
                    *slot = proxy.index((offset + k) as i64);
                }
            }
        }
        Some(out)
    }

    fn write_at(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        self.check_range(offset, data.len())?;
        for (k, &b) in data.iter().enumerate() {
            self.set(offset + k, b)?;
        }
        Ok(())
    }

    // ========================================================================
    // Typed accessors
    // ========================================================================

    /// Read one byte at `offset`.
    pub fn decode_u8(&self, offset: usize) -> Option<u8> {
        self.get(offset)
    }

    /// Read one signed byte at `offset`.
    pub fn decode_s8(&self, offset: usize) -> Option<i8> {
        self.get(offset).map(|b| b as i8)
    }

    /// Write one byte at `offset`.
    pub fn encode_u8(&mut self, offset: usize, value: u8) -> Result<()> {
        self.write_at(offset, &[value])
    }

    /// Write one signed byte at `offset`.
    pub fn encode_s8(&mut self, offset: usize, value: i8) -> Result<()> {
        self.write_at(offset, &value.to_le_bytes())
    }

    typed_access! {
        decode_u16 / encode_u16: u16 = 2,
        decode_s16 / encode_s16: i16 = 2,
        decode_u32 / encode_u32: u32 = 4,
        decode_s32 / encode_s32: i32 = 4,
        decode_u64 / encode_u64: u64 = 8,
        decode_s64 / encode_s64: i64 = 8,
        decode_float / encode_float: f32 = 4,
        decode_double / encode_double: f64 = 8,
    }

    /// Read an IEEE 754 half-precision float at `offset`.
    pub fn decode_half(&self, offset: usize) -> Option<f32> {
        self.decode_u16(offset).map(decode_f16)
    }

    /// Write `value` as a half-precision float at `offset`, rounding to
    /// nearest even.
    pub fn encode_half(&mut self, offset: usize, value: f32) -> Result<()> {
        self.encode_u16(offset, encode_f16(value))
    }

    // ========================================================================
    // Reinterpretation
    // ========================================================================

    fn reinterpret<K>(&self) -> Array<K>
    where
        K: PackedKind,
        K::Elem: FixedWidth,
    {
        self.with_bytes(|bytes| {
            bytes
                .chunks_exact(<K::Elem as FixedWidth>::WIDTH)
                .filter_map(<K::Elem as FixedWidth>::decode)
                .map(K::wrap)
                .collect()
        })
    }

    /// View the bytes as little-endian `i32`s; a trailing partial value is dropped.
    pub fn to_int32_array(&self) -> PackedInt32Array {
        self.reinterpret::<Int32s>()
    }

    /// View the bytes as little-endian `i64`s.
    pub fn to_int64_array(&self) -> PackedInt64Array {
        self.reinterpret::<Int64s>()
    }

    /// View the bytes as little-endian `f32`s.
    pub fn to_float32_array(&self) -> PackedFloat32Array {
        self.reinterpret::<Float32s>()
    }

    /// View the bytes as little-endian `f64`s.
    pub fn to_float64_array(&self) -> PackedFloat64Array {
        self.reinterpret::<Float64s>()
    }

    /// View the bytes as 2D vectors of `f32` components.
    pub fn to_vector2_array(&self) -> PackedVector2Array {
        self.reinterpret::<Vector2s>()
    }

    /// View the bytes as 3D vectors of `f32` components.
    pub fn to_vector3_array(&self) -> PackedVector3Array {
        self.reinterpret::<Vector3s>()
    }

    /// View the bytes as 4D vectors of `f32` components.
    pub fn to_vector4_array(&self) -> PackedVector4Array {
        self.reinterpret::<Vector4s>()
    }

    /// View the bytes as RGBA colors of `f32` channels.
    pub fn to_color_array(&self) -> PackedColorArray {
        self.reinterpret::<Colors>()
    }

    // ========================================================================
    // Text
    // ========================================================================

    /// Decode UTF-8 up to the first NUL, replacing invalid sequences.
    pub fn get_string_from_utf8(&self) -> String {
        self.with_bytes(|bytes| String::from_utf8_lossy(until_nul(bytes)).into_owned())
    }

    /// Decode one character per byte (Latin-1) up to the first NUL.
    pub fn get_string_from_ascii(&self) -> String {
        self.with_bytes(|bytes| until_nul(bytes).iter().map(|&b| char::from(b)).collect())
    }

    /// Decode little-endian UTF-16 up to the first NUL code unit, replacing
    /// unpaired surrogates.
    pub fn get_string_from_utf16(&self) -> String {
        self.with_bytes(|bytes| {
            let units = bytes
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]))
                .take_while(|&u| u != 0);
            char::decode_utf16(units)
                .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect()
        })
    }

    /// Decode little-endian UTF-32 up to the first NUL, replacing invalid
    /// code points.
    pub fn get_string_from_utf32(&self) -> String {
        self.with_bytes(|bytes| {
            bytes
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .take_while(|&u| u != 0)
                .map(|u| char::from_u32(u).unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect()
        })
    }

    /// Lowercase hexadecimal text, two digits per byte.
    pub fn hex_encode(&self) -> String {
        self.with_bytes(|bytes| hex::encode(bytes))
    }

    /// Parse hexadecimal text (either case) into bytes.
    pub fn hex_decode(text: &str) -> Result<PackedByteArray> {
        hex::decode(text)
            .map(PackedByteArray::from)
            .map_err(|e| PackedError::InvalidHex(e.to_string()))
    }

    // ========================================================================
    // Compression
    // ========================================================================

    /// Compress the bytes with `mode`.
    pub fn compress(&self, mode: CompressionMode) -> Result<PackedByteArray> {
        let packed = self.with_bytes(|bytes| compression::compress(bytes, mode))?;
        Ok(PackedByteArray::from(packed))
    }

    /// Decompress into exactly `buffer_size` bytes.
    pub fn decompress(&self, buffer_size: usize, mode: CompressionMode) -> Result<PackedByteArray> {
        let plain = self.with_bytes(|bytes| compression::decompress(bytes, buffer_size, mode))?;
        Ok(PackedByteArray::from(plain))
    }

    /// Decompress a self-delimiting stream, producing at most
    /// `max_output_size` bytes (`None` for no limit).
    pub fn decompress_dynamic(
        &self,
        max_output_size: Option<usize>,
        mode: CompressionMode,
    ) -> Result<PackedByteArray> {
        let plain = self.with_bytes(|bytes| {
            compression::decompress_dynamic(bytes, max_output_size, mode)
        })?;
        Ok(PackedByteArray::from(plain))
    }
}

fn until_nul(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}
