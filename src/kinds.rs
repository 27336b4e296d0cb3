//! Concrete packed array kinds.
//!
//! Each kind binds a native element type to its wire type, ordering and
//! the heap-backed handle that stores it. The `Packed*Array` aliases are
//! the types most code should name.

use packed_array_core::ordering::{double_less, float_less};
use packed_array_core::{Color, PackedKind, Vector2, Vector3, Vector4, WireString};
use packed_array_heap::HeapArray;

use crate::array::Array;

macro_rules! packed_kind {
    (
        $(#[$meta:meta])*
        $kind:ident => $alias:ident: $wrap:ty as $elem:ty,
        conv($c:ident) $conv:block,
        wrap($w:ident) $unwrap:block,
        less($a:ident, $b:ident) $less:block $(,)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $kind;

        impl PackedKind for $kind {
            type Wrap = $wrap;
            type Elem = $elem;
            type Proxy = HeapArray<$elem>;
            type Bytes = Bytes;

            #[inline]
            fn conv($c: &$wrap) -> $elem $conv

            #[inline]
            fn wrap($w: $elem) -> $wrap $unwrap

            #[inline]
            fn less($a: &$wrap, $b: &$wrap) -> bool $less

            fn alloc() -> HeapArray<$elem> {
                HeapArray::alloc()
            }
        }

        #[doc = concat!("Packed array of `", stringify!($wrap), "`.")]
        pub type $alias = Array<$kind>;
    };
}

packed_kind! {
    /// Bytes.
    Bytes => PackedByteArray: u8 as u8,
    conv(v) { *v },
    wrap(e) { e },
    less(a, b) { a < b },
}

packed_kind! {
    /// 32-bit signed integers.
    Int32s => PackedInt32Array: i32 as i32,
    conv(v) { *v },
    wrap(e) { e },
    less(a, b) { a < b },
}

packed_kind! {
    /// 64-bit signed integers.
    Int64s => PackedInt64Array: i64 as i64,
    conv(v) { *v },
    wrap(e) { e },
    less(a, b) { a < b },
}

packed_kind! {
    /// Single-precision floats; NaN sorts last.
    Float32s => PackedFloat32Array: f32 as f32,
    conv(v) { *v },
    wrap(e) { e },
    less(a, b) { float_less(*a, *b) },
}

packed_kind! {
    /// Double-precision floats; NaN sorts last.
    Float64s => PackedFloat64Array: f64 as f64,
    conv(v) { *v },
    wrap(e) { e },
    less(a, b) { double_less(*a, *b) },
}

packed_kind! {
    /// Strings, stored length-prefixed on the foreign side and ordered by
    /// their UTF-8 bytes.
    Strings => PackedStringArray: String as WireString,
    conv(v) { WireString::new(v) },
    wrap(e) { e.to_string_lossy() },
    less(a, b) { a.as_bytes() < b.as_bytes() },
}

packed_kind! {
    /// 2D vectors, ordered lexicographically.
    Vector2s => PackedVector2Array: Vector2 as [f32; 2],
    conv(v) { v.to_array() },
    wrap(e) { Vector2::from(e) },
    less(a, b) { a.less(b) },
}

packed_kind! {
    /// 3D vectors, ordered lexicographically.
    Vector3s => PackedVector3Array: Vector3 as [f32; 3],
    conv(v) { v.to_array() },
    wrap(e) { Vector3::from(e) },
    less(a, b) { a.less(b) },
}

packed_kind! {
    /// 4D vectors, ordered lexicographically.
    Vector4s => PackedVector4Array: Vector4 as [f32; 4],
    conv(v) { v.to_array() },
    wrap(e) { Vector4::from(e) },
    less(a, b) { a.less(b) },
}

packed_kind! {
    /// RGBA colors, ordered lexicographically by channel.
    Colors => PackedColorArray: Color as [f32; 4],
    conv(v) { v.to_array() },
    wrap(e) { Color::from(e) },
    less(a, b) { a.less(b) },
}
