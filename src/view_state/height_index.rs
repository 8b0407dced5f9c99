//! HeightIndex - O(log n) prefix sums and lower_bound via Fenwick tree
//!
//! Provides efficient operations for computing cumulative row heights and
//! finding row indices by vertical offset (scroll position).
//!
//! # Complexity
//!
//! - `from_heights`: O(n log n)
//! - `set`: O(log n)
//! - `prefix_sum`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `total`: O(log n)
//! - `len`: O(1)

/// HeightIndex wraps a Fenwick tree for O(log n) prefix sum queries and updates.
///
/// The index has a fixed length chosen at construction: a grid rebuilds it
/// whenever its data is replaced, so rows are never appended one at a time.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree backing storage (1-indexed internally, 0-indexed API)
    tree: Vec<isize>,
    /// Plain copy of each height, for O(1) point reads.
    heights: Vec<usize>,
}

impl HeightIndex {
    /// Builds an index over the given heights.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gridcore::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights(&[3, 4, 5]);
    /// assert_eq!(index.len(), 3);
    /// assert_eq!(index.total(), 12);
    /// ```
    pub fn from_heights(heights: &[usize]) -> Self {
        let mut tree = vec![0isize; heights.len()];
        for (i, &h) in heights.iter().enumerate() {
            if h != 0 {
                fenwick::array::update(&mut tree, i, h as isize);
            }
        }
        Self {
            tree,
            heights: heights.to_vec(),
        }
    }

    /// Builds an index of `len` rows that all share one height.
    pub fn uniform(len: usize, height: usize) -> Self {
        Self::from_heights(&vec![height; len])
    }

    /// Sets the height at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gridcore::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::from_heights(&[5]);
    /// index.set(0, 10);
    /// assert_eq!(index.prefix_sum(0), 10);
    /// ```
    pub fn set(&mut self, index: usize, height: usize) {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );

        let delta = height as isize - self.heights[index] as isize;
        if delta != 0 {
            fenwick::array::update(&mut self.tree, index, delta);
            self.heights[index] = height;
        }
    }

    /// Height stored at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn height(&self, index: usize) -> usize {
        self.heights[index]
    }

    /// Returns the cumulative height up to and including the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gridcore::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights(&[3, 4, 5]);
    /// assert_eq!(index.prefix_sum(0), 3);
    /// assert_eq!(index.prefix_sum(1), 7);
    /// assert_eq!(index.prefix_sum(2), 12);
    /// ```
    pub fn prefix_sum(&self, index: usize) -> usize {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );

        let sum = fenwick::array::prefix_sum(&self.tree, index);
        sum.max(0) as usize
    }

    /// Cumulative height of all rows strictly before `index`.
    ///
    /// `sum_before(0)` is 0 and `sum_before(len())` is the total.
    pub fn sum_before(&self, index: usize) -> usize {
        if index == 0 || self.is_empty() {
            0
        } else {
            self.prefix_sum(index.min(self.len()) - 1)
        }
    }

    /// Binary search for the first index where `prefix_sum(index) > value`.
    ///
    /// Returns the index of the row containing the given vertical offset, or
    /// `None` if `value >= total()` or the index is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gridcore::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights(&[10, 20, 15]);
    /// assert_eq!(index.lower_bound(0), Some(0));
    /// assert_eq!(index.lower_bound(10), Some(1));
    /// assert_eq!(index.lower_bound(30), Some(2));
    /// assert_eq!(index.lower_bound(45), None);
    /// ```
    pub fn lower_bound(&self, value: usize) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        // Row i covers [prefix_sum(i-1), prefix_sum(i))
        let mut left = 0;
        let mut right = self.len();

        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > value {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        if left >= self.len() {
            None
        } else {
            Some(left)
        }
    }

    /// Returns the total cumulative height of all rows.
    pub fn total(&self) -> usize {
        self.sum_before(self.len())
    }

    /// Returns the number of rows in the index.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Returns true if the index contains no rows.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_index() {
        let index = HeightIndex::default();
        assert_eq!(index.len(), 0);
        assert_eq!(index.total(), 0);
        assert!(index.is_empty());
        assert_eq!(index.sum_before(0), 0);
    }

    #[test]
    fn test_uniform_index() {
        let index = HeightIndex::uniform(4, 48);
        assert_eq!(index.total(), 192);
        assert_eq!(index.prefix_sum(1), 96);
        assert_eq!(index.height(3), 48);
    }

    #[test]
    fn test_set_updates_height() {
        let mut index = HeightIndex::from_heights(&[3, 4, 5]);

        index.set(1, 10);

        assert_eq!(index.prefix_sum(0), 3);
        assert_eq!(index.prefix_sum(1), 13);
        assert_eq!(index.prefix_sum(2), 18);
        assert_eq!(index.total(), 18);
        assert_eq!(index.height(1), 10);
    }

    #[test]
    fn test_sum_before() {
        let index = HeightIndex::from_heights(&[10, 20, 15]);
        assert_eq!(index.sum_before(0), 0);
        assert_eq!(index.sum_before(1), 10);
        assert_eq!(index.sum_before(3), 45);
        assert_eq!(index.sum_before(99), 45);
    }

    #[test]
    fn test_lower_bound_edge_cases() {
        let index = HeightIndex::from_heights(&[5, 5, 5]);

        assert_eq!(index.lower_bound(0), Some(0));
        assert_eq!(index.lower_bound(4), Some(0));
        assert_eq!(index.lower_bound(5), Some(1));
        assert_eq!(index.lower_bound(10), Some(2));
        assert_eq!(index.lower_bound(15), None);
        assert_eq!(index.lower_bound(100), None);
    }

    #[test]
    fn test_lower_bound_empty() {
        let index = HeightIndex::default();
        assert_eq!(index.lower_bound(0), None);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_set_out_of_bounds_panics() {
        let mut index = HeightIndex::from_heights(&[1]);
        index.set(1, 3);
    }

    proptest! {
        /// prefix_sum(i) == sum(heights[0..=i])
        #[test]
        fn prop_prefix_sum_is_cumulative(heights in prop::collection::vec(1usize..=100, 1..50)) {
            let index = HeightIndex::from_heights(&heights);

            let mut expected_sum = 0;
            for (i, &h) in heights.iter().enumerate() {
                expected_sum += h;
                prop_assert_eq!(index.prefix_sum(i), expected_sum);
            }
        }

        /// after set(i, h), height(i) == h and totals follow
        #[test]
        fn prop_set_updates_height(
            heights in prop::collection::vec(1usize..=100, 1..50),
            update_index in 0usize..50,
            new_height in 1usize..=100
        ) {
            let mut index = HeightIndex::from_heights(&heights);

            if update_index < index.len() {
                index.set(update_index, new_height);

                let actual_height = index.sum_before(update_index + 1) - index.sum_before(update_index);
                prop_assert_eq!(actual_height, new_height);

                let expected_total: usize = heights.iter().sum::<usize>() - heights[update_index] + new_height;
                prop_assert_eq!(index.total(), expected_total);
            }
        }

        /// lower_bound(v) is the first row whose bottom edge lies below v
        #[test]
        fn prop_lower_bound_matches_linear_scan(
            heights in prop::collection::vec(1usize..=100, 1..50),
            value in 0usize..6000
        ) {
            let index = HeightIndex::from_heights(&heights);
            let mut running = 0;
            let mut expected = None;
            for (i, &h) in heights.iter().enumerate() {
                running += h;
                if running > value {
                    expected = Some(i);
                    break;
                }
            }
            prop_assert_eq!(index.lower_bound(value), expected);
        }
    }
}
