//! In-process foreign buffers for packed arrays.
//!
//! Stands in for an engine-owned array store: buffers live in a
//! generational, reference-counted heap (one per thread) and are reached
//! only through `Copy` handles. Packed arrays never free these buffers;
//! lifetime belongs to whoever holds the handle.
//!
//! - **object_heap** - generational arena with reference counts
//! - **heap** - the thread-local heap instance
//! - **array** - `HeapArray<E>`, the handle type implementing `ProxyMethods`
//!
//! # Usage
//!
//! ```
//! use packed_array_core::ProxyMethods;
//! use packed_array_heap::HeapArray;
//!
//! let handle = HeapArray::from_vec(vec![3, 1, 2]);
//! handle.sort();
//! assert_eq!(handle.to_vec(), [1, 2, 3]);
//! handle.release();
//! ```

pub mod array;
pub mod heap;
pub mod object_heap;

pub use array::{ERR_INVALID_PARAMETER, ERR_OK, HeapArray};
pub use object_heap::{ObjectHandle, ObjectHeap};
