//! Wire representations of packed array elements.
//!
//! The wire type (`Elem`) is what a foreign buffer actually stores. Numbers
//! are stored as-is, vectors and colors as fixed-size `f32` arrays, and
//! strings as [`WireString`], a length-prefixed byte string.
//!
//! Every wire type knows how to order itself and how to write itself into a
//! flat little-endian byte buffer; fixed-width types can also be read back
//! from one.

use std::fmt;

use crate::ordering::{double_less, float_less, lexicographic_less};

/// An element as stored in a foreign buffer.
pub trait WireElem: Clone + PartialEq + Default + fmt::Debug + 'static {
    /// Strict, total order used by foreign sort and bisect.
    fn wire_less(&self, other: &Self) -> bool;

    /// Append the little-endian byte encoding of this element.
    fn encode(&self, out: &mut Vec<u8>);
}

/// A wire element with a fixed byte width.
pub trait FixedWidth: WireElem {
    /// Encoded size in bytes.
    const WIDTH: usize;

    /// Decode from exactly [`Self::WIDTH`] bytes.
    ///
    /// Returns `None` if `bytes` has the wrong length.
    fn decode(bytes: &[u8]) -> Option<Self>;
}

// ============================================================================
// Numbers
// ============================================================================

macro_rules! impl_wire_number {
    ($($ty:ty => $less:expr),* $(,)?) => {
        $(
            impl WireElem for $ty {
                #[inline]
                fn wire_less(&self, other: &Self) -> bool {
                    $less(*self, *other)
                }

                #[inline]
                fn encode(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }

            impl FixedWidth for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn decode(bytes: &[u8]) -> Option<Self> {
                    Some(<$ty>::from_le_bytes(bytes.try_into().ok()?))
                }
            }
        )*
    };
}

impl_wire_number!(
    u8 => |a: u8, b: u8| a < b,
    i32 => |a: i32, b: i32| a < b,
    i64 => |a: i64, b: i64| a < b,
    f32 => float_less,
    f64 => double_less,
);

// ============================================================================
// Packed float components (vectors and colors)
// ============================================================================

macro_rules! impl_wire_components {
    ($($n:literal),*) => {
        $(
            impl WireElem for [f32; $n] {
                #[inline]
                fn wire_less(&self, other: &Self) -> bool {
                    lexicographic_less(self, other)
                }

                fn encode(&self, out: &mut Vec<u8>) {
                    for c in self {
                        out.extend_from_slice(&c.to_le_bytes());
                    }
                }
            }

            impl FixedWidth for [f32; $n] {
                const WIDTH: usize = 4 * $n;

                fn decode(bytes: &[u8]) -> Option<Self> {
                    if bytes.len() != Self::WIDTH {
                        return None;
                    }
                    let mut out = [0.0f32; $n];
                    for (slot, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
                        *slot = f32::from_le_bytes(chunk.try_into().ok()?);
                    }
                    Some(out)
                }
            }
        )*
    };
}

impl_wire_components!(2, 3, 4);

// ============================================================================
// Strings
// ============================================================================

const PREFIX: usize = 4;

/// Length-prefixed string as stored in a foreign string array.
///
/// Layout: `u32` little-endian byte length, then that many UTF-8 bytes.
/// Content that is not valid UTF-8 survives the wire unchanged but is
/// re-encoded lossily when converted back to a native `String`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct WireString {
    raw: Box<[u8]>,
}

impl WireString {
    /// Encode a string slice.
    pub fn new(s: &str) -> Self {
        Self::from_content(s.as_bytes())
    }

    /// Encode arbitrary content bytes.
    ///
    /// Content longer than `u32::MAX` bytes is truncated.
    pub fn from_content(content: &[u8]) -> Self {
        let len = u32::try_from(content.len()).unwrap_or(u32::MAX);
        let content = &content[..len as usize];
        let mut raw = Vec::with_capacity(PREFIX + content.len());
        raw.extend_from_slice(&len.to_le_bytes());
        raw.extend_from_slice(content);
        Self {
            raw: raw.into_boxed_slice(),
        }
    }

    /// Adopt an already length-prefixed buffer.
    ///
    /// Returns `None` if the prefix does not match the buffer length.
    pub fn from_raw(raw: Box<[u8]>) -> Option<Self> {
        let prefix: [u8; PREFIX] = raw.get(..PREFIX)?.try_into().ok()?;
        if u32::from_le_bytes(prefix) as usize != raw.len() - PREFIX {
            return None;
        }
        Some(Self { raw })
    }

    /// Content bytes, without the length prefix.
    #[inline]
    pub fn content(&self) -> &[u8] {
        &self.raw[PREFIX..]
    }

    /// The full encoding, prefix included.
    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        &self.raw
    }

    /// Content length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len() - PREFIX
    }

    /// True if the content is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode into a native string, replacing invalid UTF-8.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.content()).into_owned()
    }
}

impl Default for WireString {
    fn default() -> Self {
        Self::from_content(&[])
    }
}

impl fmt::Debug for WireString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WireString({:?})", self.to_string_lossy())
    }
}

impl WireElem for WireString {
    #[inline]
    fn wire_less(&self, other: &Self) -> bool {
        self.content() < other.content()
    }

    /// UTF-8 content followed by a NUL terminator.
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.content());
        out.push(0);
    }
}
