//! Ordering predicates for sort and binary search.
//!
//! Packed arrays order elements through a strict "less than" predicate
//! rather than `Ord`, so element types without a natural order (vectors,
//! colors) can still sort deterministically. Floats go through
//! [`OrderedFloat`] to keep the order total in the presence of NaN.

use std::cmp::Ordering;

use ordered_float::OrderedFloat;

/// Strict order on `f32` values, total over NaN.
#[inline]
pub fn float_less(a: f32, b: f32) -> bool {
    OrderedFloat(a) < OrderedFloat(b)
}

/// Strict order on `f64` values, total over NaN.
#[inline]
pub fn double_less(a: f64, b: f64) -> bool {
    OrderedFloat(a) < OrderedFloat(b)
}

/// Component-wise lexicographic order: the first differing component decides.
pub fn lexicographic_less(a: &[f32], b: &[f32]) -> bool {
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (OrderedFloat(*x), OrderedFloat(*y));
        if x != y {
            return x < y;
        }
    }
    a.len() < b.len()
}

/// Derive an [`Ordering`] from a strict predicate, for `sort_unstable_by`.
#[inline]
pub fn ordering_from_less<T>(less: impl Fn(&T, &T) -> bool, a: &T, b: &T) -> Ordering {
    if less(a, b) {
        Ordering::Less
    } else if less(b, a) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// First index whose element is not less than `value` (`before == true`),
/// or first index whose element is greater than `value` (`before == false`).
///
/// `len` and `at` describe a sorted sequence; the result is unspecified
/// for unsorted input.
pub fn bisect<T>(
    len: usize,
    at: impl Fn(usize) -> T,
    value: &T,
    before: bool,
    less: impl Fn(&T, &T) -> bool,
) -> usize {
    let (mut lo, mut hi) = (0usize, len);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let probe = at(mid);
        let go_right = if before {
            less(&probe, value)
        } else {
            !less(value, &probe)
        };
        if go_right {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}
