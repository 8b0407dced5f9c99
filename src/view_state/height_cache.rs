//! Per-row measured heights with a fallback estimate.
//!
//! Rows are measured lazily, after they have been rendered at least once.
//! Until then a row is assumed to be as tall as the first row (if that one
//! has been measured) or the configured default estimate. The cache keeps a
//! [`HeightIndex`] of the resolved heights so window queries stay O(log n).

use super::height_index::HeightIndex;
use super::types::RowHeight;
use tracing::trace;

/// Measured row heights for one data set.
///
/// # Invariants
/// - `len()` equals the row count of the data set it was built for
/// - a measured height is kept until [`RowHeightCache::invalidate`]
/// - `index.height(i) == resolved(i)` for every row
#[derive(Debug, Clone)]
pub struct RowHeightCache {
    measured: Vec<Option<RowHeight>>,
    default_height: RowHeight,
    index: HeightIndex,
}

impl RowHeightCache {
    /// Create a cache of `len` unmeasured rows.
    pub fn new(len: usize, default_height: RowHeight) -> Self {
        Self {
            measured: vec![None; len],
            default_height,
            index: HeightIndex::uniform(len, default_height.get()),
        }
    }

    /// Drop every measurement and resize for a new data set.
    pub fn invalidate(&mut self, len: usize) {
        *self = Self::new(len, self.default_height);
    }

    /// Number of rows covered.
    pub fn len(&self) -> usize {
        self.measured.len()
    }

    /// True when the cache covers no rows.
    pub fn is_empty(&self) -> bool {
        self.measured.is_empty()
    }

    /// Height assumed for rows that have not been measured.
    pub fn fallback(&self) -> RowHeight {
        self.measured
            .first()
            .copied()
            .flatten()
            .unwrap_or(self.default_height)
    }

    /// Measured height of a row, if any.
    pub fn measured(&self, index: usize) -> Option<RowHeight> {
        self.measured.get(index).copied().flatten()
    }

    /// Height used for layout: measured, else the fallback.
    pub fn resolved(&self, index: usize) -> RowHeight {
        self.measured(index).unwrap_or_else(|| {
            trace!(row = index, "row height not measured, using fallback");
            self.fallback()
        })
    }

    /// Record a rendered height.
    ///
    /// Zero heights are ignored (the row is treated as not measured). Rows
    /// outside the cache are ignored too; they belong to a replaced data set.
    pub fn record(&mut self, index: usize, height: usize) {
        let Ok(height) = RowHeight::new(height) else {
            trace!(row = index, "ignoring zero row height");
            return;
        };
        let old_fallback = self.fallback();
        let Some(slot) = self.measured.get_mut(index) else {
            trace!(row = index, len = self.measured.len(), "ignoring stale row height");
            return;
        };
        if *slot == Some(height) {
            return;
        }

        *slot = Some(height);

        if index == 0 && self.fallback() != old_fallback {
            // every unmeasured row follows the first one
            self.rebuild_index();
        } else {
            self.index.set(index, height.get());
        }
    }

    /// Record heights for a contiguous run of rendered rows starting at `first`.
    pub fn record_run(&mut self, first: usize, heights: &[usize]) {
        for (offset, &height) in heights.iter().enumerate() {
            self.record(first + offset, height);
        }
    }

    /// Prefix-sum index over the resolved heights.
    pub fn index(&self) -> &HeightIndex {
        &self.index
    }

    /// Total resolved height of all rows.
    pub fn total(&self) -> usize {
        self.index.total()
    }

    fn rebuild_index(&mut self) {
        let fallback = self.fallback().get();
        let heights: Vec<usize> = self
            .measured
            .iter()
            .map(|h| h.map_or(fallback, |h| h.get()))
            .collect();
        self.index = HeightIndex::from_heights(&heights);
    }
}
