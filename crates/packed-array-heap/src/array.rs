//! Foreign array handles backed by the thread-local heap.

use std::fmt;
use std::marker::PhantomData;

use packed_array_core::ordering::{bisect, ordering_from_less};
use packed_array_core::{ProxyMethods, WireElem};

use crate::heap;
use crate::object_heap::ObjectHandle;

/// Engine status code for success.
pub const ERR_OK: i64 = 0;

/// Engine status code for a rejected argument.
pub const ERR_INVALID_PARAMETER: i64 = 31;

/// Non-owning handle to a `Vec<E>` stored on the thread-local heap.
///
/// Follows engine conventions throughout: a stale handle (its buffer
/// released) reads as an empty array and ignores writes; out-of-range
/// reads yield the default element; out-of-range writes are ignored.
///
/// The buffer lives on the allocating thread's heap, so handles are
/// neither `Send` nor `Sync`:
///
/// ```compile_fail
/// use packed_array_heap::HeapArray;
///
/// let handle = HeapArray::from_vec(vec![1i32, 2, 3]);
/// std::thread::spawn(move || handle.to_vec());
/// ```
pub struct HeapArray<E> {
    handle: ObjectHandle,
    _marker: PhantomData<fn() -> E>,
    _thread: PhantomData<*const ()>,
}

impl<E: WireElem> HeapArray<E> {
    /// Allocate an empty buffer with a reference count of one.
    pub fn alloc() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Allocate a buffer holding `data`.
    pub fn from_vec(data: Vec<E>) -> Self {
        Self::from_handle(heap::with(|heap| heap.allocate(data)))
    }

    fn from_handle(handle: ObjectHandle) -> Self {
        Self {
            handle,
            _marker: PhantomData,
            _thread: PhantomData,
        }
    }

    /// The underlying heap handle.
    #[inline]
    pub fn handle(self) -> ObjectHandle {
        self.handle
    }

    /// Copy out every element.
    pub fn to_vec(self) -> Vec<E> {
        self.read(|data| data.to_vec())
    }

    /// True while the buffer is still allocated.
    pub fn is_live(self) -> bool {
        self.ref_count().is_some()
    }

    /// Current reference count, `None` once released.
    pub fn ref_count(self) -> Option<u32> {
        heap::with(|heap| heap.ref_count(self.handle))
    }

    /// Take another reference to the buffer.
    pub fn add_ref(self) -> bool {
        heap::with(|heap| heap.add_ref(self.handle))
    }

    /// Drop a reference; returns true if the buffer was freed.
    pub fn release(self) -> bool {
        heap::with(|heap| heap.release(self.handle))
    }

    fn read<R>(self, f: impl FnOnce(&[E]) -> R) -> R {
        heap::with(|heap| match heap.get::<Vec<E>>(self.handle) {
            Some(data) => f(data),
            None => f(&[]),
        })
    }

    fn write(self, f: impl FnOnce(&mut Vec<E>)) {
        heap::with(|heap| {
            if let Some(data) = heap.get_mut::<Vec<E>>(self.handle) {
                f(data);
            }
        })
    }

    // Engine-side index check; `len` is the current size.
    #[inline]
    fn checked(index: i64, len: usize) -> Option<usize> {
        usize::try_from(index).ok().filter(|&i| i < len)
    }
}

impl<E> Clone for HeapArray<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for HeapArray<E> {}

impl<E> PartialEq for HeapArray<E> {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl<E> Eq for HeapArray<E> {}

impl<E> fmt::Debug for HeapArray<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapArray")
            .field("index", &self.handle.index)
            .field("generation", &self.handle.generation)
            .finish()
    }
}

impl<E: WireElem> ProxyMethods for HeapArray<E> {
    type Elem = E;
    type ByteArray = HeapArray<u8>;

    fn index(self, index: i64) -> E {
        self.read(|data| {
            Self::checked(index, data.len())
                .map(|i| data[i].clone())
                .unwrap_or_default()
        })
    }

    fn append(self, value: E) -> bool {
        self.push_back(value)
    }

    fn append_array(self, other: Self) {
        // Copy first so appending a buffer to itself sees the original contents.
        let extra = other.to_vec();
        self.write(|data| data.extend(extra));
    }

    fn bsearch(self, value: &E, before: bool) -> i64 {
        self.read(|data| bisect(data.len(), |i| data[i].clone(), value, before, E::wire_less) as i64)
    }

    fn clear(self) {
        self.write(Vec::clear);
    }

    fn count(self, value: &E) -> i64 {
        self.read(|data| data.iter().filter(|e| *e == value).count() as i64)
    }

    fn duplicate(self) -> Self {
        Self::from_vec(self.to_vec())
    }

    fn fill(self, value: &E) {
        self.write(|data| data.fill(value.clone()));
    }

    fn find(self, value: &E, from: i64) -> i64 {
        self.read(|data| {
            let len = data.len() as i64;
            let from = if from < 0 { (from + len).max(0) } else { from };
            (from..len)
                .find(|&i| data[i as usize] == *value)
                .unwrap_or(-1)
        })
    }

    fn has(self, value: &E) -> bool {
        self.read(|data| data.contains(value))
    }

    fn insert(self, index: i64, value: E) -> i64 {
        let mut code = ERR_INVALID_PARAMETER;
        self.write(|data| {
            if let Ok(i) = usize::try_from(index)
                && i <= data.len()
            {
                data.insert(i, value);
                code = ERR_OK;
            }
        });
        code
    }

    fn is_empty(self) -> bool {
        self.read(|data| data.is_empty())
    }

    fn push_back(self, value: E) -> bool {
        let mut pushed = false;
        self.write(|data| {
            data.push(value);
            pushed = true;
        });
        pushed
    }

    fn remove_at(self, index: i64) {
        self.write(|data| {
            if let Some(i) = Self::checked(index, data.len()) {
                data.remove(i);
            }
        });
    }

    fn resize(self, size: i64) -> i64 {
        let Ok(size) = usize::try_from(size) else {
            return ERR_INVALID_PARAMETER;
        };
        self.write(|data| data.resize(size, E::default()));
        ERR_OK
    }

    fn reverse(self) {
        self.write(|data| data.reverse());
    }

    fn rfind(self, value: &E, from: i64) -> i64 {
        self.read(|data| {
            let len = data.len() as i64;
            let mut from = if from < 0 { from + len } else { from };
            if from < 0 || from >= len {
                from = len - 1;
            }
            (0..=from)
                .rev()
                .find(|&i| data[i as usize] == *value)
                .unwrap_or(-1)
        })
    }

    fn set(self, index: i64, value: E) {
        self.write(|data| {
            if let Some(i) = Self::checked(index, data.len()) {
                data[i] = value;
            }
        });
    }

    fn size(self) -> i64 {
        self.read(|data| data.len() as i64)
    }

    fn slice(self, begin: i64, end: i64) -> Self {
        let part = self.read(|data| {
            let len = data.len() as i64;
            let norm = |x: i64| {
                let x = x.clamp(-len, len);
                if x < 0 { x + len } else { x }
            };
            let (begin, end) = (norm(begin), norm(end));
            if begin >= end {
                Vec::new()
            } else {
                data[begin as usize..end as usize].to_vec()
            }
        });
        Self::from_vec(part)
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    fn sort(self) {
        self.write(|data| data.sort_by(|a, b| ordering_from_less(E::wire_less, a, b)));
    }

    fn to_byte_array(self) -> HeapArray<u8> {
        let bytes = self.read(|data| {
            let mut out = Vec::new();
            for elem in data {
                elem.encode(&mut out);
            }
            out
        });
        HeapArray::from_vec(bytes)
    }
}
