//! Size class table: the bucket capacities a pool sorts buffers into.

use std::ops::Index;

use crate::config::DEFAULT_SIZE_CLASSES;

/// An immutable, strictly increasing, non-empty list of bucket capacities.
///
/// # Example
///
/// ```
/// use bucketbuf::SizeClassTable;
///
/// let table = SizeClassTable::new([4096, 64, 0, 512, 64]);
/// assert_eq!(table.as_slice(), &[64, 512, 4096]);
///
/// assert_eq!(table.ceil(100), 512);
/// assert_eq!(table.ceil(0), 64);
/// assert_eq!(table.ceil(1 << 20), 4096);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SizeClassTable {
    sizes: Box<[usize]>,
}

impl SizeClassTable {
    /// Builds a table from arbitrary capacities.
    ///
    /// Zeros are dropped and the rest sorted and de-duplicated. If nothing is
    /// left, [`DEFAULT_SIZE_CLASSES`] is used.
    pub fn new(sizes: impl IntoIterator<Item = usize>) -> Self {
        let mut sizes: Vec<usize> = sizes.into_iter().filter(|&s| s > 0).collect();
        if sizes.is_empty() {
            return Self::default();
        }
        sizes.sort_unstable();
        sizes.dedup();
        Self {
            sizes: sizes.into_boxed_slice(),
        }
    }

    /// Returns the capacities in ascending order.
    pub fn as_slice(&self) -> &[usize] {
        &self.sizes
    }

    /// Returns the number of classes.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Returns `true` if the table holds no classes.
    ///
    /// Construction falls back to the default table, so this is `false` for
    /// every table built through [`new`](Self::new) or [`Default`].
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Returns the smallest class.
    pub fn smallest(&self) -> usize {
        self.sizes[0]
    }

    /// Returns the largest class.
    pub fn largest(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    /// Returns the index of the smallest class `>= size`.
    ///
    /// Sizes above the largest class map to the last index.
    pub fn index_for(&self, size: usize) -> usize {
        self.sizes
            .partition_point(|&s| s < size)
            .min(self.sizes.len() - 1)
    }

    /// Returns the smallest class `>= size`, or the largest class if none is.
    pub fn ceil(&self, size: usize) -> usize {
        self.sizes[self.index_for(size)]
    }
}

impl Default for SizeClassTable {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZE_CLASSES.into(),
        }
    }
}

impl Index<usize> for SizeClassTable {
    type Output = usize;

    fn index(&self, index: usize) -> &usize {
        &self.sizes[index]
    }
}
