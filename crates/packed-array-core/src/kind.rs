//! The seams a packed array is written against.
//!
//! [`ProxyMethods`] is the capability set a foreign buffer handle exposes.
//! [`PackedKind`] binds one native element type to its wire type, its
//! ordering, and the handle type that stores it. The hybrid container is
//! implemented once against these two traits.

use std::fmt;

use crate::wire::WireElem;

/// Operations a foreign packed-array handle supports.
///
/// Handles are plain `Copy` identifiers: they do not own the buffer they
/// refer to and dropping one never frees anything. The buffer's lifetime is
/// managed by whatever system issued the handle.
///
/// Integers on this boundary follow engine conventions: sizes and indices
/// are `i64`, searches return `-1` when nothing is found, and fallible
/// mutations return an error code where `0` means success. Indices are
/// validated by the caller; behavior for out-of-range indices is defined
/// by the backend.
pub trait ProxyMethods: Copy + fmt::Debug + 'static {
    /// Element type stored in the foreign buffer.
    type Elem: WireElem;

    /// Handle type returned by [`ProxyMethods::to_byte_array`].
    type ByteArray: ProxyMethods<Elem = u8>;

    /// Element at `index`.
    fn index(self, index: i64) -> Self::Elem;

    /// Append one element.
    fn append(self, value: Self::Elem) -> bool;

    /// Append every element of `other` in order.
    fn append_array(self, other: Self);

    /// Bisect a sorted buffer: lower bound when `before`, upper bound otherwise.
    fn bsearch(self, value: &Self::Elem, before: bool) -> i64;

    /// Remove every element.
    fn clear(self);

    /// Number of elements equal to `value`.
    fn count(self, value: &Self::Elem) -> i64;

    /// New buffer holding a copy of every element.
    fn duplicate(self) -> Self;

    /// Overwrite every element with `value`.
    fn fill(self, value: &Self::Elem);

    /// First index at or after `from` holding `value`, or `-1`.
    fn find(self, value: &Self::Elem, from: i64) -> i64;

    /// True if any element equals `value`.
    fn has(self, value: &Self::Elem) -> bool;

    /// Insert `value` before `index`; returns an error code.
    fn insert(self, index: i64, value: Self::Elem) -> i64;

    /// True if the buffer has no elements.
    fn is_empty(self) -> bool;

    /// Append one element.
    fn push_back(self, value: Self::Elem) -> bool;

    /// Remove the element at `index`.
    fn remove_at(self, index: i64);

    /// Truncate or default-extend to `size` elements; returns an error code.
    fn resize(self, size: i64) -> i64;

    /// Reverse element order in place.
    fn reverse(self);

    /// Last index at or before `from` holding `value`, or `-1`.
    ///
    /// A negative `from` counts back from the end.
    fn rfind(self, value: &Self::Elem, from: i64) -> i64;

    /// Overwrite the element at `index`.
    fn set(self, index: i64, value: Self::Elem);

    /// Number of elements.
    fn size(self) -> i64;

    /// New buffer holding elements `[begin, end)`.
    fn slice(self, begin: i64, end: i64) -> Self;

    /// Sort ascending by [`WireElem::wire_less`].
    fn sort(self);

    /// New byte buffer holding the byte encoding of every element.
    fn to_byte_array(self) -> Self::ByteArray;
}

/// Per-element-type codec, ordering and allocator.
///
/// `conv` and `wrap` must be mutual inverses for every representable value
/// (strings may re-encode invalid UTF-8). `less` must agree with the wire
/// type's [`WireElem::wire_less`] so that local and foreign sorts produce
/// the same order.
pub trait PackedKind: 'static {
    /// Native element type handed to callers.
    type Wrap: Clone + PartialEq + Default + fmt::Debug;

    /// Wire element type stored by the foreign buffer.
    type Elem: WireElem;

    /// Foreign handle type.
    type Proxy: ProxyMethods<Elem = Self::Elem>;

    /// The byte-array kind produced by `to_byte_array` for this backend.
    type Bytes: PackedKind<
            Wrap = u8,
            Elem = u8,
            Proxy = <Self::Proxy as ProxyMethods>::ByteArray,
        >;

    /// Native to wire.
    fn conv(value: &Self::Wrap) -> Self::Elem;

    /// Wire to native.
    fn wrap(elem: Self::Elem) -> Self::Wrap;

    /// Strict ordering on native values.
    fn less(a: &Self::Wrap, b: &Self::Wrap) -> bool;

    /// Allocate an empty foreign buffer.
    fn alloc() -> Self::Proxy;
}
