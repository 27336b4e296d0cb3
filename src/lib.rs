//! Packed arrays that live locally until a foreign store needs them.
//!
//! A packed array is a typed, contiguous sequence (bytes, integers, floats,
//! strings, vectors, colors). It starts as an ordinary local buffer and is
//! moved into a foreign buffer the first time a handle is requested; from
//! then on it operates on that buffer through the handle. Either way the
//! same operations give the same results.
//!
//! - **array** - the hybrid container, `Array<K>`
//! - **kinds** - concrete element kinds and the `Packed*Array` aliases
//! - **byte_array** - typed access, reinterpretation, text and compression
//!   on `PackedByteArray`
//!
//! The foreign side is provided by [`heap`], an in-process buffer store;
//! element types and traits come from [`packed_array_core`].
//!
//! # Usage
//!
//! ```
//! use packed_array::prelude::*;
//!
//! let mut names = PackedStringArray::new();
//! names.push_back("beta".to_string());
//! names.push_back("alpha".to_string());
//! names.sort();
//! assert_eq!(names.find(&"beta".to_string(), 0), Some(1));
//!
//! let points: PackedVector2Array = vec![Vector2::new(1.0, 2.0)].into();
//! assert_eq!(points.to_byte_array().len(), 8);
//! ```

pub mod array;
pub mod byte_array;
pub mod kinds;

pub use packed_array_heap as heap;

pub use array::{Array, Iter, Storage};
pub use kinds::*;
pub use packed_array_compress::{CompressionError, CompressionMode};
pub use packed_array_core::{
    Color, PackedError, PackedKind, ProxyMethods, Result, Vector2, Vector3, Vector4, WireString,
};

pub mod prelude {
    pub use crate::array::Array;
    pub use crate::kinds::{
        PackedByteArray, PackedColorArray, PackedFloat32Array, PackedFloat64Array,
        PackedInt32Array, PackedInt64Array, PackedStringArray, PackedVector2Array,
        PackedVector3Array, PackedVector4Array,
    };
    pub use packed_array_compress::CompressionMode;
    pub use packed_array_core::{
        Color, PackedError, PackedKind, ProxyMethods, Vector2, Vector3, Vector4,
    };
}
