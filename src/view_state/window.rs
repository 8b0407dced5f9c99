//! Virtual window calculation.
//!
//! Only the rows intersecting the viewport (plus a few rows of overscan on
//! either side) are rendered. The window is a pure function of the row height
//! cache, the scroll offset and the viewport height, so it can be recomputed on
//! every scroll tick, re-measurement and resize.

use super::height_cache::RowHeightCache;

/// Rows rendered before and after the viewport by default.
pub const DEFAULT_OFFSET_ROWS: usize = 2;

/// Range of rows rendered for the current viewport.
///
/// # Invariants
/// - `from_row <= to_row`
/// - `to_row <= row count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleWindow {
    /// Index of the first rendered row (inclusive).
    pub from_row: usize,
    /// Index past the last rendered row (exclusive).
    pub to_row: usize,
    /// Sum of all resolved row heights.
    pub total_height: usize,
    /// Vertical translation applied to the rendered slice, in pixels.
    ///
    /// `sum_before(from_row) - total_height` once more than `offset_rows`
    /// rows are scrolled away, else `-total_height`.
    pub translate_offset: i64,
}

impl VisibleWindow {
    /// Number of rendered rows.
    pub fn len(&self) -> usize {
        self.to_row - self.from_row
    }

    /// True when nothing is rendered.
    pub fn is_empty(&self) -> bool {
        self.from_row == self.to_row
    }

    /// Iterate over rendered row indices.
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.from_row..self.to_row
    }

    /// Check if a row is rendered.
    pub fn contains(&self, index: usize) -> bool {
        (self.from_row..self.to_row).contains(&index)
    }
}

/// Compute the rendered window.
///
/// - `scrolled_rows` counts rows whose bottom edge lies above `scroll_offset`;
///   the window starts `offset_rows` before the first of the remaining rows.
/// - From there rows are consumed until they fill `viewport_height`; the window
///   ends `offset_rows` after the last consumed row, clamped to the row count.
/// - A non-empty window always holds at least one row, even when a single row
///   is taller than the viewport.
///
/// # Examples
///
/// ```
/// use gridcore::view_state::height_cache::RowHeightCache;
/// use gridcore::view_state::types::RowHeight;
/// use gridcore::view_state::window::compute_window;
///
/// let cache = RowHeightCache::new(100, RowHeight::new(10).unwrap());
/// let window = compute_window(&cache, 200, 50, 2);
/// assert_eq!((window.from_row, window.to_row), (17, 25));
/// assert_eq!(window.total_height, 1000);
/// assert_eq!(window.translate_offset, 170 - 1000);
/// ```
pub fn compute_window(
    heights: &RowHeightCache,
    scroll_offset: usize,
    viewport_height: usize,
    offset_rows: usize,
) -> VisibleWindow {
    let index = heights.index();
    let row_count = index.len();
    if row_count == 0 {
        return VisibleWindow::default();
    }

    let total_height = index.total();

    // rows whose cumulative height is strictly below the scroll offset
    let scrolled_rows = if scroll_offset == 0 {
        0
    } else {
        index.lower_bound(scroll_offset - 1).unwrap_or(row_count)
    };
    let from_row = scrolled_rows.saturating_sub(offset_rows);

    // rows consumed from `from_row` until the viewport is filled; running off
    // the end still counts as one consumed step
    let visible_count = if viewport_height == 0 {
        0
    } else {
        let target = index.sum_before(from_row) + viewport_height;
        match index.lower_bound(target - 1) {
            Some(last) => last + 1 - from_row,
            None => row_count - from_row + 1,
        }
    };

    let reach = (visible_count + 2 * offset_rows).saturating_sub(1);
    let mut to_row = from_row + reach;
    if from_row < row_count {
        to_row = to_row.max(from_row + 1);
    }
    let to_row = to_row.min(row_count);

    let offset = if scrolled_rows > offset_rows {
        index.sum_before(from_row)
    } else {
        0
    };

    VisibleWindow {
        from_row,
        to_row,
        total_height,
        translate_offset: offset as i64 - total_height as i64,
    }
}
