//! Compact multimap from `u32` keys to multisets of `u32` values.
//!
//! Most nodes of a commit graph have exactly one parent and one child, so
//! the map keeps single values inline next to the key and only allocates a
//! bucket once a key gains a second value. Buckets live in a [`Slab`], which
//! hands freed slots back to later keys instead of releasing them.

use fnv::FnvHashMap;
use slab::Slab;
use std::{collections::hash_map::Entry, iter::Copied, slice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Single(u32),
    // Index into `buckets`; the bucket always holds at least two values.
    Bucket(usize),
}

/// Mapping from an integer key to a multiset of integer values.
///
/// Duplicate values for a key are kept as separate occurrences. The order of
/// the values of a key is unspecified and may change after a removal, so both
/// [`get`] and [`get_as_array`] must be compared as multisets.
///
/// # Examples
/// ```
/// use history_dag::IntIntMultiMap;
///
/// let mut map = IntIntMultiMap::new();
/// map.put_value(1, 10);
/// map.put_value(1, 10);
/// map.put_value(1, 20);
///
/// assert!(map.remove(1, 10));
/// assert!(!map.remove(1, 30));
///
/// let mut values = map.get_as_array(1);
/// values.sort();
/// assert_eq!(values, vec![10, 20]);
/// assert_eq!(map.get(2).count(), 0);
/// ```
///
/// [`get`]: struct.IntIntMultiMap.html#method.get
/// [`get_as_array`]: struct.IntIntMultiMap.html#method.get_as_array
#[derive(Debug, Clone)]
pub struct IntIntMultiMap {
    slots: FnvHashMap<u32, Slot>,
    buckets: Slab<Vec<u32>>,
}

impl Default for IntIntMultiMap {
    fn default() -> Self {
        IntIntMultiMap::new()
    }
}

impl IntIntMultiMap {
    pub fn new() -> Self {
        IntIntMultiMap {
            slots: FnvHashMap::default(),
            buckets: Slab::new(),
        }
    }

    /// Add one occurrence of `value` to the values of `key`.
    pub fn put_value(&mut self, key: u32, value: u32) {
        match self.slots.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(Slot::Single(value));
            },
            Entry::Occupied(mut entry) => {
                let slot = entry.get_mut();
                match *slot {
                    Slot::Single(existing) => {
                        let bucket = self.buckets.insert(vec![existing, value]);
                        trace!("Key {} moved to bucket {}", key, bucket);
                        *slot = Slot::Bucket(bucket);
                    },
                    Slot::Bucket(bucket) => self.buckets[bucket].push(value),
                }
            },
        }
    }

    /// Remove one occurrence of `value` from the values of `key`.
    ///
    /// Returns false, and leaves the map untouched, if the pair is not
    /// present. A key whose last value is removed disappears from [`keys`].
    ///
    /// [`keys`]: struct.IntIntMultiMap.html#method.keys
    pub fn remove(&mut self, key: u32, value: u32) -> bool {
        let slot = match self.slots.get_mut(&key) {
            Some(slot) => slot,
            None => return false,
        };

        match *slot {
            Slot::Single(existing) => {
                if existing != value {
                    return false;
                }
                self.slots.remove(&key);
            },
            Slot::Bucket(bucket) => {
                let values = &mut self.buckets[bucket];
                let position = match values.iter().position(|&v| v == value) {
                    Some(position) => position,
                    None => return false,
                };
                values.swap_remove(position);

                if values.len() == 1 {
                    let last = values[0];
                    self.buckets.remove(bucket);
                    *slot = Slot::Single(last);
                }
            },
        }

        true
    }

    /// Iterate over the values of `key`. Empty if the key is absent.
    pub fn get(&self, key: u32) -> Values<'_> {
        Values {
            inner: self.values_of(key).iter().copied(),
        }
    }

    /// The values of `key` copied into a fresh vector.
    ///
    /// Holds the same multiset as [`get`], not necessarily in the same order.
    ///
    /// [`get`]: struct.IntIntMultiMap.html#method.get
    pub fn get_as_array(&self, key: u32) -> Vec<u32> {
        self.values_of(key).to_vec()
    }

    /// Iterate over every key holding at least one value, in no particular
    /// order.
    pub fn keys(&self) -> impl Iterator<Item = u32> + '_ {
        self.slots.keys().copied()
    }

    pub fn contains_key(&self, key: u32) -> bool {
        self.slots.contains_key(&key)
    }

    /// Number of occurrences stored for `key`.
    pub fn value_count(&self, key: u32) -> usize {
        self.values_of(key).len()
    }

    /// Number of keys holding at least one value.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.buckets.clear();
    }

    fn values_of(&self, key: u32) -> &[u32] {
        match self.slots.get(&key) {
            Some(Slot::Single(value)) => slice::from_ref(value),
            Some(Slot::Bucket(bucket)) => &self.buckets[*bucket],
            None => &[],
        }
    }
}

/// Iterator over the values of one key, returned by
/// [`IntIntMultiMap::get`](struct.IntIntMultiMap.html#method.get).
#[derive(Debug, Clone)]
pub struct Values<'a> {
    inner: Copied<slice::Iter<'a, u32>>,
}

impl<'a> Iterator for Values<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> ExactSizeIterator for Values<'a> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::collections::HashMap;

    fn sorted<I: IntoIterator<Item = u32>>(values: I) -> Vec<u32> {
        let mut values: Vec<u32> = values.into_iter().collect();
        values.sort_unstable();
        values
    }

    fn assert_matches_reference(map: &IntIntMultiMap, reference: &HashMap<u32, Vec<u32>>) {
        let keys = sorted(map.keys());
        let mut expected_keys = reference
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(&key, _)| key)
            .collect::<Vec<_>>();
        expected_keys.sort_unstable();

        assert_eq!(keys, expected_keys);
        assert_eq!(map.len(), expected_keys.len());

        for (&key, values) in reference {
            let expected = sorted(values.iter().copied());

            assert_eq!(sorted(map.get(key)), expected, "get({})", key);
            assert_eq!(sorted(map.get_as_array(key)), expected, "get_as_array({})", key);
            assert_eq!(map.value_count(key), expected.len());
        }
    }

    #[test]
    fn single_value_keys() {
        let mut map = IntIntMultiMap::new();
        map.put_value(3, 7);
        map.put_value(4, 8);

        assert_eq!(map.get_as_array(3), vec![7]);
        assert_eq!(map.get(4).collect::<Vec<_>>(), vec![8]);
        assert!(map.contains_key(3));
        assert!(!map.contains_key(5));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn duplicates_are_separate_occurrences() {
        let mut map = IntIntMultiMap::new();
        map.put_value(1, 5);
        map.put_value(1, 5);
        map.put_value(1, 5);

        assert_eq!(map.get_as_array(1), vec![5, 5, 5]);

        assert!(map.remove(1, 5));
        assert_eq!(map.get_as_array(1), vec![5, 5]);
        assert!(map.remove(1, 5));
        assert_eq!(map.get_as_array(1), vec![5]);
        assert!(map.remove(1, 5));
        assert!(!map.contains_key(1));
        assert!(map.is_empty());
    }

    #[test]
    fn removing_absent_pair_is_a_no_op() {
        let mut map = IntIntMultiMap::new();
        map.put_value(1, 10);
        map.put_value(2, 20);
        map.put_value(2, 21);

        assert!(!map.remove(1, 11));
        assert!(!map.remove(2, 22));
        assert!(!map.remove(3, 10));

        assert_eq!(map.get_as_array(1), vec![10]);
        assert_eq!(sorted(map.get(2)), vec![20, 21]);
        assert_eq!(sorted(map.keys()), vec![1, 2]);
    }

    #[test]
    fn double_removal_does_not_corrupt_other_keys() {
        let mut map = IntIntMultiMap::new();
        map.put_value(1, 10);
        map.put_value(1, 11);
        map.put_value(2, 20);
        map.put_value(2, 21);

        assert!(map.remove(1, 10));
        assert!(!map.remove(1, 10));
        assert!(map.remove(1, 11));
        assert!(!map.remove(1, 11));

        assert!(!map.contains_key(1));
        assert_eq!(sorted(map.get(2)), vec![20, 21]);
    }

    #[test]
    fn freed_buckets_are_reused() {
        let mut map = IntIntMultiMap::new();
        map.put_value(1, 1);
        map.put_value(1, 2);
        map.remove(1, 1);
        map.put_value(2, 1);
        map.put_value(2, 2);
        map.put_value(2, 3);

        assert_eq!(map.buckets.len(), 1);
        assert_eq!(map.get_as_array(1), vec![2]);
        assert_eq!(sorted(map.get(2)), vec![1, 2, 3]);
    }

    #[test]
    fn clear_drops_everything() {
        let mut map = IntIntMultiMap::new();
        map.put_value(1, 1);
        map.put_value(1, 2);
        map.clear();

        assert!(map.is_empty());
        assert_eq!(map.get(1).len(), 0);
    }

    #[test]
    fn random_operations_agree_with_reference() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut map = IntIntMultiMap::new();
        let mut reference: HashMap<u32, Vec<u32>> = HashMap::new();

        for step in 0..20_000 {
            let key = rng.gen_range(0..32);
            let value = rng.gen_range(0..8);

            if rng.gen_bool(0.55) {
                map.put_value(key, value);
                reference.entry(key).or_default().push(value);
            } else {
                let values = reference.entry(key).or_default();
                let expected = match values.iter().position(|&v| v == value) {
                    Some(position) => {
                        values.remove(position);
                        true
                    },
                    None => false,
                };
                assert_eq!(map.remove(key, value), expected);
            }

            if step % 500 == 0 {
                assert_matches_reference(&map, &reference);
            }
        }

        assert_matches_reference(&map, &reference);
    }
}
