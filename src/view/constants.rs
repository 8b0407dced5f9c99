//! Layout dimension constants for TUI rendering.

/// Height of the header row in lines.
pub const HEADER_HEIGHT: u16 = 1;

/// Height of the status bar in lines.
///
/// Single line for the row range, selection count and the last event.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Blank cells kept to the right of every cell's text.
pub const CELL_PADDING: usize = 1;

/// Measure-and-recompute rounds per frame before drawing anyway.
///
/// Measuring can move the window, which brings unmeasured rows into view.
pub const MAX_MEASURE_PASSES: usize = 4;

/// Lines moved per mouse wheel notch.
pub const WHEEL_STEP: i64 = 3;

/// Cells moved per horizontal scroll key press.
pub const HORIZONTAL_STEP: i64 = 4;

/// Cells a column grows or shrinks per resize key press.
pub const RESIZE_STEP: i64 = 2;

/// Two clicks on the same row within this many milliseconds are a double click.
pub const DOUBLE_CLICK_MS: u128 = 400;
