//! Behavior of `Array<K>` in both representations.
//!
//! Most tests build the same contents twice, once local and once
//! materialized, and check that both give the same answers.

use packed_array::heap::heap;
use packed_array::prelude::*;
use packed_array::{PackedError, Storage};
use proptest::prelude::*;

fn both(values: &[i32]) -> [PackedInt32Array; 2] {
    let local = PackedInt32Array::from(values.to_vec());
    let mut proxy = PackedInt32Array::from(values.to_vec());
    proxy.materialize();
    [local, proxy]
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_sort_search_slice_scenario() {
    for mut array in both(&[3, 1, 2]) {
        array.sort();
        assert_eq!(array.to_vec(), [1, 2, 3]);
        assert_eq!(array.binary_search(&2), 1);
        assert_eq!(array.find(&1, 0), Some(0));
        assert_eq!(array.slice(1, -1).to_vec(), [2]);
    }
}

#[test]
fn test_slice_negative_index_law() {
    for array in both(&[5, 6, 7, 8]) {
        let len = array.len() as i64;
        assert_eq!(array.slice(len - 2, len), array.slice(-2, 0));
        assert_eq!(array.slice(-2, 0).to_vec(), [7, 8]);
    }
}

#[test]
fn test_slice_clamps_and_empties() {
    for array in both(&[1, 2, 3]) {
        assert_eq!(array.slice(-10, 10).to_vec(), [1, 2, 3]);
        assert!(array.slice(2, 1).is_empty());
        assert!(array.slice(3, 3).is_empty());
        assert_eq!(array.slice(0, 1).to_vec(), [1]);
    }
}

#[test]
fn test_slice_is_independent() {
    for array in both(&[1, 2, 3]) {
        let mut part = array.slice(0, 2);
        part.set(0, 9).unwrap();
        assert_eq!(array.index(0).unwrap(), 1);
    }
}

// ============================================================================
// Element access and bounds
// ============================================================================

#[test]
fn test_index_and_set() {
    for mut array in both(&[10, 20, 30]) {
        assert_eq!(array.index(1).unwrap(), 20);
        array.set(1, 25).unwrap();
        assert_eq!(array.get(1), Some(25));
        assert_eq!(array.get(3), None);
    }
}

#[test]
fn test_out_of_range_is_reported_identically() {
    for mut array in both(&[1, 2]) {
        assert!(matches!(
            array.index(2),
            Err(PackedError::IndexOutOfBounds { index: 2, len: 2 })
        ));
        assert!(array.set(5, 0).is_err());
        assert!(array.remove_at(2).is_err());
        assert!(matches!(
            array.insert(3, 0),
            Err(PackedError::IndexOutOfBounds { index: 3, len: 2 })
        ));
        assert_eq!(array.to_vec(), [1, 2]);
    }
}

#[test]
fn test_insert_then_remove_restores() {
    for mut array in both(&[1, 2, 3]) {
        for idx in 0..=3 {
            array.insert(idx, 99).unwrap();
            assert_eq!(array.len(), 4);
            assert_eq!(array.index(idx).unwrap(), 99);
            assert_eq!(array.remove_at(idx).unwrap(), 99);
            assert_eq!(array.to_vec(), [1, 2, 3]);
        }
    }
}

// ============================================================================
// Mutation
// ============================================================================

#[test]
fn test_append_and_push_back() {
    for mut array in both(&[]) {
        assert!(array.is_empty());
        assert!(array.append(1));
        assert!(array.push_back(2));
        array.extend([3, 4]);
        assert_eq!(array.to_vec(), [1, 2, 3, 4]);
        assert_eq!(array.size(), 4);
    }
}

#[test]
fn test_resize_truncates_and_extends() {
    for mut array in both(&[1, 2, 3]) {
        array.resize(5).unwrap();
        assert_eq!(array.to_vec(), [1, 2, 3, 0, 0]);
        array.resize(2).unwrap();
        assert_eq!(array.to_vec(), [1, 2]);
        array.resize(0).unwrap();
        assert!(array.is_empty());
    }
}

#[test]
fn test_fill_reverse_clear() {
    for mut array in both(&[1, 2, 3]) {
        array.reverse();
        assert_eq!(array.to_vec(), [3, 2, 1]);
        array.fill(&7);
        assert_eq!(array.to_vec(), [7, 7, 7]);
        array.clear();
        assert_eq!(array.len(), 0);
    }
}

#[test]
fn test_duplicate_keeps_representation_and_independence() {
    for array in both(&[1, 2]) {
        let mut copy = array.duplicate();
        assert_eq!(copy.is_proxy(), array.is_proxy());
        copy.push_back(3);
        assert_eq!(array.to_vec(), [1, 2]);
        assert_eq!(copy.to_vec(), [1, 2, 3]);
    }
}

#[test]
fn test_append_array_all_combinations() {
    for left in both(&[1, 2]) {
        for right in both(&[3, 4]) {
            let mut target = left.duplicate();
            let was_proxy = (target.is_proxy(), right.is_proxy());
            target.append_array(&right);
            assert_eq!(target.to_vec(), [1, 2, 3, 4]);
            assert_eq!((target.is_proxy(), right.is_proxy()), was_proxy);
            assert_eq!(right.to_vec(), [3, 4]);
        }
    }
}

// ============================================================================
// Search
// ============================================================================

#[test]
fn test_find_rfind_count_has() {
    for array in both(&[4, 1, 4, 2, 4]) {
        assert_eq!(array.find(&4, 0), Some(0));
        assert_eq!(array.find(&4, 1), Some(2));
        assert_eq!(array.find(&4, 5), None);
        assert_eq!(array.find(&9, 0), None);
        assert_eq!(array.rfind(&4), Some(4));
        assert_eq!(array.rfind_from(&4, 3), Some(2));
        assert_eq!(array.rfind_from(&1, 100), Some(1));
        assert_eq!(array.rfind(&9), None);
        assert_eq!(array.count(&4), 3);
        assert!(array.has(&2));
        assert!(!array.has(&3));
    }
}

#[test]
fn test_search_on_empty() {
    for array in both(&[]) {
        assert_eq!(array.find(&1, 0), None);
        assert_eq!(array.rfind(&1), None);
        assert_eq!(array.binary_search(&1), 0);
        assert_eq!(array.count(&1), 0);
    }
}

#[test]
fn test_bsearch_before_flag() {
    for array in both(&[1, 2, 2, 2, 5]) {
        assert_eq!(array.bsearch(&2, true), 1);
        assert_eq!(array.bsearch(&2, false), 4);
        assert_eq!(array.binary_search(&0), 0);
        assert_eq!(array.binary_search(&6), 5);
        assert_eq!(array.binary_search(&3), 4);
    }
}

// ============================================================================
// Materialization
// ============================================================================

#[test]
fn test_materialize_is_idempotent() {
    let before = heap::live_count();
    let mut array = PackedInt32Array::from(vec![1, 2, 3]);
    assert!(!array.is_proxy());
    assert_eq!(array.proxy_handle(), None);

    let first = array.materialize();
    let second = array.materialize();
    assert_eq!(first, second);
    assert_eq!(array.proxy_handle(), Some(first));
    assert_eq!(heap::live_count(), before + 1);
    assert_eq!(first.to_vec(), [1, 2, 3]);
    assert!(matches!(array.storage(), Storage::Proxy(_)));
    first.release();
}

#[test]
fn test_into_proxy_hands_over_contents() {
    let array: PackedFloat64Array = [0.5, 1.5].into_iter().collect();
    let handle = array.into_proxy();
    assert_eq!(handle.to_vec(), [0.5, 1.5]);
    let back = PackedFloat64Array::from_proxy(handle);
    assert_eq!(back.to_vec(), [0.5, 1.5]);
    handle.release();
}

#[test]
fn test_mutation_after_materialize_reaches_foreign_buffer() {
    let mut array = PackedInt64Array::from(vec![1, 2]);
    let handle = array.materialize();
    array.push_back(3);
    array.set(0, 10).unwrap();
    assert_eq!(handle.to_vec(), [10, 2, 3]);
}

#[test]
fn test_dropping_array_keeps_foreign_buffer() {
    let handle = {
        let mut array = PackedByteArray::from(vec![1, 2]);
        array.materialize()
    };
    assert!(handle.is_live());
    assert_eq!(handle.to_vec(), [1, 2]);
    handle.release();
}

// ============================================================================
// Element kinds
// ============================================================================

#[test]
fn test_strings_in_both_representations() {
    let words: Vec<String> = ["pear", "apple", "fig"].map(String::from).to_vec();
    let local = PackedStringArray::from(words.clone());
    let mut proxy = PackedStringArray::from(words);
    proxy.materialize();

    for mut array in [local, proxy] {
        array.sort();
        assert_eq!(array.to_vec(), ["apple", "fig", "pear"]);
        assert_eq!(array.binary_search(&"banana".to_string()), 1);
        assert_eq!(array.to_byte_array().to_vec(), b"apple\0fig\0pear\0");
        array.resize(4).unwrap();
        assert_eq!(array.index(3).unwrap(), "");
    }
}

#[test]
fn test_vectors_sort_lexicographically() {
    let values = vec![
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 5.0, 1.0),
        Vector3::new(0.0, 5.0, 0.0),
    ];
    let mut local = PackedVector3Array::from(values.clone());
    let mut proxy = PackedVector3Array::from(values);
    proxy.materialize();
    local.sort();
    proxy.sort();
    assert_eq!(local, proxy);
    assert_eq!(local.index(0).unwrap(), Vector3::new(0.0, 5.0, 0.0));
}

#[test]
fn test_colors_to_byte_array() {
    let mut colors = PackedColorArray::from(vec![Color::WHITE, Color::BLACK]);
    let local = colors.to_byte_array();
    colors.materialize();
    let foreign = colors.to_byte_array();
    assert_eq!(local.len(), 32);
    assert_eq!(local, foreign);
    assert_eq!(local.to_color_array().to_vec(), [Color::WHITE, Color::BLACK]);
}

#[test]
fn test_float_sort_places_nan_last() {
    for mut array in [
        PackedFloat32Array::from(vec![2.0, f32::NAN, -1.0]),
        {
            let mut a = PackedFloat32Array::from(vec![2.0, f32::NAN, -1.0]);
            a.materialize();
            a
        },
    ] {
        array.sort();
        let sorted = array.to_vec();
        assert_eq!(&sorted[..2], &[-1.0, 2.0]);
        assert!(sorted[2].is_nan());
    }
}

#[test]
fn test_iterators() {
    for array in both(&[1, 2, 3]) {
        let forward: Vec<i32> = array.iter().collect();
        let backward: Vec<i32> = array.iter().rev().collect();
        assert_eq!(forward, [1, 2, 3]);
        assert_eq!(backward, [3, 2, 1]);
        assert_eq!(array.iter().len(), 3);
        let mut total = 0;
        for v in &array {
            total += v;
        }
        assert_eq!(total, 6);
        assert_eq!(format!("{array:?}"), "[1, 2, 3]");
    }
}

// ============================================================================
// Properties
// ============================================================================

fn ops() -> impl Strategy<Value = Vec<(u8, i32, i64)>> {
    prop::collection::vec((0u8..8, -5i32..5, -8i64..8), 0..40)
}

fn apply(array: &mut PackedInt32Array, (op, value, arg): (u8, i32, i64)) -> String {
    let idx = arg.unsigned_abs() as usize;
    match op {
        0 => format!("{}", array.push_back(value)),
        1 => format!("{:?}", array.insert(idx, value).is_ok()),
        2 => format!("{:?}", array.remove_at(idx).ok()),
        3 => format!("{:?}", array.set(idx, value).is_ok()),
        4 => format!("{:?}", array.find(&value, idx)),
        5 => {
            array.sort();
            format!("{}", array.binary_search(&value))
        }
        6 => format!("{:?}", array.slice(arg, arg / 2).to_vec()),
        _ => {
            array.resize(idx).unwrap();
            format!("{:?}", array.rfind(&value))
        }
    }
}

proptest! {
    #[test]
    fn representations_agree(initial in prop::collection::vec(-5i32..5, 0..10), ops in ops()) {
        let [mut local, mut proxy] = both(&initial);
        for op in ops {
            let a = apply(&mut local, op);
            let b = apply(&mut proxy, op);
            prop_assert_eq!(a, b);
            prop_assert_eq!(local.to_vec(), proxy.to_vec());
        }
        prop_assert!(!local.is_proxy());
        prop_assert!(proxy.is_proxy());
    }

    #[test]
    fn materialize_preserves_contents(values in prop::collection::vec(any::<i32>(), 0..64)) {
        let mut array = PackedInt32Array::from(values.clone());
        let handle = array.materialize();
        prop_assert_eq!(array.to_vec(), values.clone());
        prop_assert_eq!(handle.to_vec(), values);
        handle.release();
    }

    #[test]
    fn sort_then_lower_bound(values in prop::collection::vec(-50i32..50, 0..64), probe in -60i32..60) {
        for mut array in both(&values) {
            array.sort();
            let at = array.binary_search(&probe);
            let sorted = array.to_vec();
            prop_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
            prop_assert!(sorted[..at].iter().all(|v| *v < probe));
            prop_assert!(sorted[at..].iter().all(|v| *v >= probe));
        }
    }

    #[test]
    fn string_codec_round_trips(values in prop::collection::vec(".{0,12}", 0..16)) {
        let mut array = PackedStringArray::from(values.clone());
        array.materialize();
        prop_assert_eq!(array.to_vec(), values);
    }
}
