//! The per-thread heap that backs [`HeapArray`](crate::HeapArray) handles.
//!
//! Handles are only meaningful on the thread that allocated them.

use std::cell::RefCell;

use crate::object_heap::ObjectHeap;

thread_local! {
    static HEAP: RefCell<ObjectHeap> = RefCell::new(ObjectHeap::new());
}

/// Run `f` with exclusive access to this thread's heap.
///
/// Calls must not nest: `f` must not call back into `with`.
pub fn with<R>(f: impl FnOnce(&mut ObjectHeap) -> R) -> R {
    HEAP.with(|heap| f(&mut heap.borrow_mut()))
}

/// Number of live buffers on this thread's heap.
pub fn live_count() -> usize {
    with(|heap| heap.live_count())
}
