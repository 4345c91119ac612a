//! Fixed-size set of node ids, addressed by index.

use std::fmt;

const WORD_BITS: usize = 64;

/// A fixed-size container of boolean flags over the node ids `0..len`.
///
/// Every traversal in this crate records visited or selected nodes in one of
/// these. The size is fixed at construction and must match the node count of
/// the graph it is used with. Accessing an index `>= len()` is a programming
/// error and panics.
///
/// # Examples
/// ```
/// use history_dag::IndexedBoolSet;
///
/// let mut set = IndexedBoolSet::new(5);
/// set.set_all(&[0, 3]);
/// set.set(4, true);
/// set.set(0, false);
///
/// assert!(set.get(3));
/// assert!(!set.get(0));
/// assert_eq!(set.iter_ones().collect::<Vec<_>>(), vec![3, 4]);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct IndexedBoolSet {
    words: Vec<u64>,
    len: usize,
}

impl IndexedBoolSet {
    /// Create a set of `len` flags, all false.
    pub fn new(len: usize) -> Self {
        IndexedBoolSet {
            words: vec![0; (len + WORD_BITS - 1) / WORD_BITS],
            len,
        }
    }

    /// Create a set of `len` flags with the given indices set to true.
    pub fn from_indices<I>(len: usize, indices: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut set = IndexedBoolSet::new(len);
        for index in indices {
            set.set(index, true);
        }
        set
    }

    /// Number of flags, i.e. the size fixed at construction.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn get(&self, index: usize) -> bool {
        self.check_index(index);
        self.words[index / WORD_BITS] & (1 << (index % WORD_BITS)) != 0
    }

    pub fn set(&mut self, index: usize, value: bool) {
        self.check_index(index);
        let mask = 1 << (index % WORD_BITS);
        let word = &mut self.words[index / WORD_BITS];
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    /// Set every listed index to true, returning `self` so calls can be
    /// chained.
    pub fn set_all(&mut self, indices: &[usize]) -> &mut Self {
        for &index in indices {
            self.set(index, true);
        }
        self
    }

    /// Reset every flag to false.
    pub fn clear(&mut self) {
        for word in &mut self.words {
            *word = 0;
        }
    }

    /// Number of flags that are true.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Returns true if the set was created for zero nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if no flag is set.
    pub fn is_clear(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Iterate over the indices whose flag is true, in ascending order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words
            .iter()
            .enumerate()
            .flat_map(|(word_index, &word)| {
                (0..WORD_BITS)
                    .filter(move |&bit| word & (1 << bit) != 0)
                    .map(move |bit| word_index * WORD_BITS + bit)
            })
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.len,
            "index {} is out of range for a set of {} nodes",
            index,
            self.len
        );
    }
}

impl fmt::Debug for IndexedBoolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IndexedBoolSet({}) ", self.len)?;
        f.debug_set().entries(self.iter_ones()).finish()
    }
}
