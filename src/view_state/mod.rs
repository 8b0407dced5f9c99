//! View-state layer - row heights, the virtual window and column widths
//!
//! Everything here is a pure function of its inputs or a small cache; nothing
//! touches the terminal. The controller in [`crate::state`] owns instances of
//! these types and recomputes them when data, viewport or columns change.
//!
//! # Module Structure
//!
//! - `types`: Core newtypes (RowHeight, ViewportDimensions)
//! - `height_index`: HeightIndex - O(log n) prefix sums via Fenwick tree
//! - `height_cache`: RowHeightCache - measured heights with fallback estimate
//! - `window`: VisibleWindow - rendered row range and translate offset
//! - `column_layout`: ColumnWidthRecord - constraint-based column widths

pub mod column_layout;
pub mod height_cache;
pub mod height_index;
pub mod types;
pub mod window;

pub use column_layout::{compute_widths, dragged_width, ColumnWidthRecord};
pub use height_cache::RowHeightCache;
pub use height_index::HeightIndex;
pub use types::{InvalidRowHeight, RowHeight, ViewportDimensions};
pub use window::{compute_window, VisibleWindow, DEFAULT_OFFSET_ROWS};
