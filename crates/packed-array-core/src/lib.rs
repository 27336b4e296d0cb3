//! Core types for packed arrays.
//!
//! This crate provides the pieces that every packed array instantiation is
//! built from:
//!
//! - **math** - structured element types (`Vector2`, `Vector3`, `Vector4`, `Color`)
//! - **wire** - foreign-side element encodings and their byte codec
//! - **ordering** - strict "less than" predicates used by sort and search
//! - **kind** - the per-type seam (`PackedKind`) and the foreign capability
//!   set (`ProxyMethods`)
//! - **half** - IEEE 754 binary16 conversion for byte-array accessors
//! - **error** - the error type shared by all packed array operations
//!
//! # Usage
//!
//! Backends implement [`ProxyMethods`] for their handle type; each element
//! kind implements [`PackedKind`] once to bind its native type, wire type,
//! ordering and handle allocator together:
//!
//! ```ignore
//! struct Int32s;
//!
//! impl PackedKind for Int32s {
//!     type Wrap = i32;
//!     type Elem = i32;
//!     type Proxy = HeapArray<i32>;
//!     type Bytes = Bytes;
//!
//!     fn conv(value: &i32) -> i32 { *value }
//!     fn wrap(elem: i32) -> i32 { elem }
//!     fn less(a: &i32, b: &i32) -> bool { a < b }
//!     fn alloc() -> HeapArray<i32> { HeapArray::alloc() }
//! }
//! ```

pub mod error;
pub mod half;
pub mod kind;
pub mod math;
pub mod ordering;
pub mod wire;

pub use error::{PackedError, Result};
pub use kind::{PackedKind, ProxyMethods};
pub use math::{Color, Vector2, Vector3, Vector4};
pub use wire::{FixedWidth, WireElem, WireString};
