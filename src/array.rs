//! The hybrid packed array.
//!
//! An [`Array`] starts out owning a plain `Vec` of native values. The first
//! time a foreign handle is needed (see [`Array::materialize`]) the values
//! are converted into a freshly allocated foreign buffer and the array
//! switches to holding that handle for the rest of its life. Every
//! operation behaves the same in both states; only where the data lives
//! changes.
//!
//! Index-taking operations are bounds-checked here, before anything is
//! delegated to a foreign handle, so both states report the same
//! [`PackedError`].
//!
//! Float elements are compared with native `==` by `find`, `rfind`,
//! `count` and `has`; results are unspecified when NaN values are present.
//!
//! # Usage
//!
//! ```
//! use packed_array::PackedInt32Array;
//!
//! let mut array = PackedInt32Array::from(vec![3, 1, 2]);
//! array.sort();
//! assert_eq!(array.binary_search(&2), 1);
//!
//! let handle = array.materialize();
//! assert!(array.is_proxy());
//! assert_eq!(array.materialize(), handle);
//! assert_eq!(array.to_vec(), [1, 2, 3]);
//! ```

use std::fmt;
use std::iter::FusedIterator;
use std::mem;

use packed_array_core::ordering::{bisect, ordering_from_less};
use packed_array_core::{PackedError, PackedKind, ProxyMethods, Result, WireElem};

/// Where an array's elements currently live.
pub enum Storage<K: PackedKind> {
    /// Owned native values.
    Local(Vec<K::Wrap>),
    /// A handle to a foreign buffer of wire values.
    Proxy(K::Proxy),
}

/// A packed array backed by either a local buffer or a foreign handle.
///
/// The array owns its local buffer but never the foreign buffer: once
/// materialized it only holds a non-owning handle, and dropping the array
/// leaves the foreign buffer to whatever system manages its lifetime.
pub struct Array<K: PackedKind> {
    storage: Storage<K>,
}

impl<K: PackedKind> Array<K> {
    /// Create an empty, local array.
    pub fn new() -> Self {
        Self {
            storage: Storage::Local(Vec::new()),
        }
    }

    /// Wrap an existing foreign handle.
    pub fn from_proxy(proxy: K::Proxy) -> Self {
        Self {
            storage: Storage::Proxy(proxy),
        }
    }

    /// Current storage.
    #[inline]
    pub fn storage(&self) -> &Storage<K> {
        &self.storage
    }

    /// True once the array has switched to a foreign handle.
    #[inline]
    pub fn is_proxy(&self) -> bool {
        matches!(self.storage, Storage::Proxy(_))
    }

    /// The foreign handle, if the array has one.
    #[inline]
    pub fn proxy_handle(&self) -> Option<K::Proxy> {
        match self.storage {
            Storage::Proxy(proxy) => Some(proxy),
            Storage::Local(_) => None,
        }
    }

    /// The local buffer, if the array has not been materialized.
    #[inline]
    pub fn as_local(&self) -> Option<&[K::Wrap]> {
        match &self.storage {
            Storage::Local(values) => Some(values),
            Storage::Proxy(_) => None,
        }
    }

    // ========================================================================
    // Size
    // ========================================================================

    /// Number of elements.
    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Local(values) => values.len(),
            Storage::Proxy(proxy) => usize::try_from(proxy.size()).unwrap_or(0),
        }
    }

    /// Number of elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.len()
    }

    /// True if the array has no elements.
    pub fn is_empty(&self) -> bool {
        match &self.storage {
            Storage::Local(values) => values.is_empty(),
            Storage::Proxy(proxy) => proxy.is_empty(),
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.len();
        if index < len {
            Ok(())
        } else {
            Err(PackedError::out_of_bounds(index, len))
        }
    }

    // ========================================================================
    // Element access
    // ========================================================================

    /// Element at `index`.
    pub fn index(&self, index: usize) -> Result<K::Wrap> {
        self.check_index(index)?;
        Ok(self.at(index))
    }

    /// Element at `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<K::Wrap> {
        self.index(index).ok()
    }

    // Unchecked read; callers have validated `index`.
    fn at(&self, index: usize) -> K::Wrap {
        match &self.storage {
            Storage::Local(values) => values[index].clone(),
            Storage::Proxy(proxy) => K::wrap(proxy.index(index as i64)),
        }
    }

    /// Overwrite the element at `index`.
    pub fn set(&mut self, index: usize, value: K::Wrap) -> Result<()> {
        self.check_index(index)?;
        match &mut self.storage {
            Storage::Local(values) => values[index] = value,
            Storage::Proxy(proxy) => proxy.set(index as i64, K::conv(&value)),
        }
        Ok(())
    }

    /// Iterate over copies of the elements.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            array: self,
            front: 0,
            back: self.len(),
        }
    }

    /// Copy every element into a `Vec`.
    pub fn to_vec(&self) -> Vec<K::Wrap> {
        match &self.storage {
            Storage::Local(values) => values.clone(),
            Storage::Proxy(_) => self.iter().collect(),
        }
    }

    // ========================================================================
    // Growth and removal
    // ========================================================================

    /// Append one element. Always succeeds for local arrays.
    pub fn append(&mut self, value: K::Wrap) -> bool {
        self.push_back(value)
    }

    /// Append one element.
    pub fn push_back(&mut self, value: K::Wrap) -> bool {
        match &mut self.storage {
            Storage::Local(values) => {
                values.push(value);
                true
            }
            Storage::Proxy(proxy) => proxy.push_back(K::conv(&value)),
        }
    }

    /// Append every element of `other`, in order.
    ///
    /// Neither array changes representation. Two foreign arrays are joined
    /// with a single bulk append.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn append_array(&mut self, other: &Array<K>) {
        if let (Storage::Proxy(dst), Storage::Proxy(src)) = (&self.storage, &other.storage) {
            dst.append_array(*src);
            return;
        }
        match &mut self.storage {
            Storage::Local(values) => values.extend(other.iter()),
            Storage::Proxy(proxy) => {
                for value in other.iter() {
                    proxy.append(K::conv(&value));
                }
            }
        }
    }

    /// Insert `value` before `index`; `index == len()` appends.
    pub fn insert(&mut self, index: usize, value: K::Wrap) -> Result<()> {
        let len = self.len();
        if index > len {
            return Err(PackedError::out_of_bounds(index, len));
        }
        match &mut self.storage {
            Storage::Local(values) => {
                values.insert(index, value);
                Ok(())
            }
            Storage::Proxy(proxy) => {
                PackedError::check_code("insert", proxy.insert(index as i64, K::conv(&value)))
            }
        }
    }

    /// Remove and return the element at `index`, shifting later elements left.
    pub fn remove_at(&mut self, index: usize) -> Result<K::Wrap> {
        self.check_index(index)?;
        match &mut self.storage {
            Storage::Local(values) => Ok(values.remove(index)),
            Storage::Proxy(proxy) => {
                let removed = K::wrap(proxy.index(index as i64));
                proxy.remove_at(index as i64);
                Ok(removed)
            }
        }
    }

    /// Truncate, or extend with default values, to exactly `len` elements.
    pub fn resize(&mut self, len: usize) -> Result<()> {
        match &mut self.storage {
            Storage::Local(values) => {
                values.resize(len, K::Wrap::default());
                Ok(())
            }
            Storage::Proxy(proxy) => {
                let len = i64::try_from(len).unwrap_or(i64::MAX);
                PackedError::check_code("resize", proxy.resize(len))
            }
        }
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        match &mut self.storage {
            Storage::Local(values) => values.clear(),
            Storage::Proxy(proxy) => proxy.clear(),
        }
    }

    /// Overwrite every element with `value`.
    pub fn fill(&mut self, value: &K::Wrap) {
        match &mut self.storage {
            Storage::Local(values) => values.fill(value.clone()),
            Storage::Proxy(proxy) => proxy.fill(&K::conv(value)),
        }
    }

    /// Reverse element order in place.
    pub fn reverse(&mut self) {
        match &mut self.storage {
            Storage::Local(values) => values.reverse(),
            Storage::Proxy(proxy) => proxy.reverse(),
        }
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// First index at or after `from` holding `value`.
    pub fn find(&self, value: &K::Wrap, from: usize) -> Option<usize> {
        match &self.storage {
            Storage::Local(values) => values
                .get(from..)?
                .iter()
                .position(|v| v == value)
                .map(|i| i + from),
            Storage::Proxy(proxy) => {
                if from >= self.len() {
                    return None;
                }
                found(proxy.find(&K::conv(value), from as i64))
            }
        }
    }

    /// Last index holding `value`.
    pub fn rfind(&self, value: &K::Wrap) -> Option<usize> {
        self.rfind_from(value, self.len().checked_sub(1)?)
    }

    /// Last index at or before `from` holding `value`.
    ///
    /// A `from` past the end searches the whole array.
    pub fn rfind_from(&self, value: &K::Wrap, from: usize) -> Option<usize> {
        let last = self.len().checked_sub(1)?.min(from);
        match &self.storage {
            Storage::Local(values) => values[..=last].iter().rposition(|v| v == value),
            Storage::Proxy(proxy) => found(proxy.rfind(&K::conv(value), last as i64)),
        }
    }

    /// True if any element equals `value`.
    pub fn has(&self, value: &K::Wrap) -> bool {
        match &self.storage {
            Storage::Local(values) => values.contains(value),
            Storage::Proxy(proxy) => proxy.has(&K::conv(value)),
        }
    }

    /// Number of elements equal to `value`.
    pub fn count(&self, value: &K::Wrap) -> usize {
        match &self.storage {
            Storage::Local(values) => values.iter().filter(|v| *v == value).count(),
            Storage::Proxy(proxy) => usize::try_from(proxy.count(&K::conv(value))).unwrap_or(0),
        }
    }

    /// Lower-bound insertion index of `value` in a sorted array.
    ///
    /// The result is unspecified if the array is not sorted.
    #[inline]
    pub fn binary_search(&self, value: &K::Wrap) -> usize {
        self.bsearch(value, true)
    }

    /// Insertion index of `value` in a sorted array: the first position not
    /// less than `value` when `before`, else the first position greater
    /// than it.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn bsearch(&self, value: &K::Wrap, before: bool) -> usize {
        match &self.storage {
            Storage::Local(values) => bisect(
                values.len(),
                move |i| &values[i],
                &value,
                before,
                |a: &&K::Wrap, b: &&K::Wrap| K::less(a, b),
            ),
            Storage::Proxy(proxy) => {
                usize::try_from(proxy.bsearch(&K::conv(value), before)).unwrap_or(0)
            }
        }
    }

    // ========================================================================
    // Reordering and copies
    // ========================================================================

    /// Sort ascending. Stability is not guaranteed.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn sort(&mut self) {
        match &mut self.storage {
            Storage::Local(values) => {
                values.sort_unstable_by(|a, b| ordering_from_less(K::less, a, b))
            }
            Storage::Proxy(proxy) => proxy.sort(),
        }
    }

    /// Independent copy in the same representation.
    pub fn duplicate(&self) -> Array<K> {
        match &self.storage {
            Storage::Local(values) => Array::from(values.clone()),
            Storage::Proxy(proxy) => Array::from_proxy(proxy.duplicate()),
        }
    }

    /// Independent copy of elements `[begin, end)`.
    ///
    /// A negative `begin` counts from the end. An `end` of zero or less also
    /// counts from the end, so `slice(-2, 0)` is the last two elements and
    /// `slice(1, 0)` runs from index 1 to the end rather than being empty.
    /// Both bounds are then clamped into `0..=len`, and an empty range gives
    /// an empty array.
    ///
    /// ```
    /// use packed_array::PackedInt32Array;
    ///
    /// let array = PackedInt32Array::from(vec![1, 2, 3]);
    /// assert_eq!(array.slice(1, -1).to_vec(), [2]);
    /// assert_eq!(array.slice(-2, 0).to_vec(), [2, 3]);
    /// assert_eq!(array.slice(1, 0).to_vec(), [2, 3]);
    /// assert!(array.slice(2, 1).is_empty());
    /// ```
    pub fn slice(&self, begin: i64, end: i64) -> Array<K> {
        let (begin, end) = slice_bounds(self.len(), begin, end);
        match &self.storage {
            Storage::Local(values) => Array::from(values[begin..end].to_vec()),
            Storage::Proxy(proxy) => Array::from_proxy(proxy.slice(begin as i64, end as i64)),
        }
    }

    /// Byte encoding of every element, flattened.
    ///
    /// Numbers, vectors and colors are little-endian; strings are UTF-8
    /// with a NUL after each one.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn to_byte_array(&self) -> Array<K::Bytes> {
        match &self.storage {
            Storage::Local(values) => {
                let mut bytes = Vec::new();
                for value in values {
                    K::conv(value).encode(&mut bytes);
                }
                Array::from(bytes)
            }
            Storage::Proxy(proxy) => Array::from_proxy(proxy.to_byte_array()),
        }
    }

    // ========================================================================
    // Materialization
    // ========================================================================

    /// Foreign handle for this array, creating it on first use.
    ///
    /// A local array allocates a foreign buffer of the same length, copies
    /// every element across, drops its local buffer, and keeps the handle
    /// from then on. Later calls return the same handle.
    ///
    /// The handle is tied to the thread that created it, so a materialized
    /// array cannot be moved to another thread:
    ///
    /// ```compile_fail
    /// use packed_array::PackedInt32Array;
    ///
    /// let mut array = PackedInt32Array::from(vec![1, 2, 3]);
    /// array.materialize();
    /// std::thread::spawn(move || array.len());
    /// ```
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn materialize(&mut self) -> K::Proxy {
        if let Storage::Proxy(proxy) = self.storage {
            return proxy;
        }
        let proxy = K::alloc();
        if let Storage::Local(values) = mem::replace(&mut self.storage, Storage::Proxy(proxy)) {
            let code = proxy.resize(values.len() as i64);
            debug_assert_eq!(code, 0, "foreign buffer refused to grow");
            for (i, value) in values.iter().enumerate() {
                proxy.set(i as i64, K::conv(value));
            }
        }
        proxy
    }

    /// Consume the array, returning its foreign handle.
    ///
    /// ```compile_fail
    /// use packed_array::PackedInt32Array;
    ///
    /// let array = PackedInt32Array::from(vec![1, 2]);
    /// let _handle = array.into_proxy();
    /// array.len();
    /// ```
    pub fn into_proxy(mut self) -> K::Proxy {
        self.materialize()
    }
}

fn found(index: i64) -> Option<usize> {
    usize::try_from(index).ok()
}

/// Normalize slice bounds against `len`.
pub(crate) fn slice_bounds(len: usize, begin: i64, end: i64) -> (usize, usize) {
    let len = len as i64;
    let begin = if begin < 0 { begin + len } else { begin };
    let end = if end <= 0 { end + len } else { end };
    let begin = begin.clamp(0, len) as usize;
    let end = end.clamp(0, len) as usize;
    (begin, end.max(begin))
}

// ============================================================================
// Trait impls
// ============================================================================

impl<K: PackedKind> Default for Array<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PackedKind> From<Vec<K::Wrap>> for Array<K> {
    fn from(values: Vec<K::Wrap>) -> Self {
        Self {
            storage: Storage::Local(values),
        }
    }
}

impl<K: PackedKind> FromIterator<K::Wrap> for Array<K> {
    fn from_iter<I: IntoIterator<Item = K::Wrap>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<K: PackedKind> Extend<K::Wrap> for Array<K> {
    fn extend<I: IntoIterator<Item = K::Wrap>>(&mut self, iter: I) {
        match &mut self.storage {
            Storage::Local(values) => values.extend(iter),
            Storage::Proxy(proxy) => {
                for value in iter {
                    proxy.push_back(K::conv(&value));
                }
            }
        }
    }
}

impl<K: PackedKind> PartialEq for Array<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: PackedKind> fmt::Debug for Array<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, K: PackedKind> IntoIterator for &'a Array<K> {
    type Item = K::Wrap;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

// ============================================================================
// Iterator
// ============================================================================

/// Iterator over copies of an array's elements.
pub struct Iter<'a, K: PackedKind> {
    array: &'a Array<K>,
    front: usize,
    back: usize,
}

impl<K: PackedKind> Iterator for Iter<'_, K> {
    type Item = K::Wrap;

    fn next(&mut self) -> Option<K::Wrap> {
        if self.front >= self.back {
            return None;
        }
        let value = self.array.at(self.front);
        self.front += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<K: PackedKind> DoubleEndedIterator for Iter<'_, K> {
    fn next_back(&mut self) -> Option<K::Wrap> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.array.at(self.back))
    }
}

impl<K: PackedKind> ExactSizeIterator for Iter<'_, K> {}

impl<K: PackedKind> FusedIterator for Iter<'_, K> {}
