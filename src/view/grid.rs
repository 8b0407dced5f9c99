//! Grid widget.
//!
//! Draws the header, the checkbox gutter, the rows of the current window and
//! a status line into a ratatui buffer, and maps terminal positions back to
//! grid parts for mouse handling. One terminal cell is one layout unit: row
//! heights are line counts, column widths are cell counts.

use crate::model::{ColumnDescriptor, Row, SortOrder};
use crate::state::GridController;
use crate::view::constants::{CELL_PADDING, HEADER_HEIGHT, MAX_MEASURE_PASSES, STATUS_BAR_HEIGHT};
use crate::view::styles::GridStyles;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use tracing::trace;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

// ===== Areas =====

/// Screen regions of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridAreas {
    /// Header row.
    pub header: Rect,
    /// Scrollable body.
    pub body: Rect,
    /// Status line.
    pub status: Rect,
}

impl GridAreas {
    /// Split `area` top to bottom into header, body and status line.
    pub fn split(area: Rect) -> Self {
        let header_height = HEADER_HEIGHT.min(area.height);
        let status_height = STATUS_BAR_HEIGHT.min(area.height - header_height);
        let body_height = area.height - header_height - status_height;
        Self {
            header: Rect::new(area.x, area.y, area.width, header_height),
            body: Rect::new(area.x, area.y + header_height, area.width, body_height),
            status: Rect::new(
                area.x,
                area.y + header_height + body_height,
                area.width,
                status_height,
            ),
        }
    }
}

/// Focus state the widget highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridFocus {
    /// Focused row in the data set.
    pub row: Option<usize>,
    /// Focused visible column.
    pub column: usize,
}

// ===== Text helpers =====

/// Break `text` into lines no wider than `width` cells.
///
/// Embedded newlines always break. Always returns at least one line.
///
/// # Examples
///
/// ```
/// use gridcore::view::grid::wrap_cell;
///
/// assert_eq!(wrap_cell("abcdef", 4), vec!["abcd", "ef"]);
/// assert_eq!(wrap_cell("", 4), vec![""]);
/// ```
pub fn wrap_cell(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let mut line = String::new();
        let mut used = 0;
        for ch in raw.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                used = 0;
            }
            line.push(ch);
            used += w;
        }
        lines.push(line);
    }
    lines
}

/// Truncate `text` to `width` cells and pad it with spaces to exactly `width`.
fn pad_to(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

/// A cell of `width` cells whose text keeps the right-hand padding free.
fn cell(text: &str, width: usize) -> String {
    let visible = pad_to(text, width.saturating_sub(CELL_PADDING));
    pad_to(&visible, width)
}

/// Cut the strip `spans` to the `width` cells starting at cell `skip`.
fn clip(spans: Vec<Span<'static>>, skip: usize, width: usize) -> Line<'static> {
    let end = skip + width;
    let mut pos = 0;
    let mut out = Vec::new();
    for span in spans {
        let mut text = String::new();
        for ch in span.content.chars() {
            let w = ch.width().unwrap_or(0);
            if pos >= skip && pos + w <= end {
                text.push(ch);
            } else if pos < skip && pos + w > skip {
                // wide glyph cut by the left edge
                text.push_str(&" ".repeat((pos + w).min(end) - skip));
            }
            pos += w;
            if pos >= end {
                break;
            }
        }
        if !text.is_empty() {
            out.push(Span::styled(text, span.style));
        }
        if pos >= end {
            break;
        }
    }
    Line::from(out)
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

fn sort_arrow(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Ascending => " ↑",
        SortOrder::Descending => " ↓",
    }
}

fn gutter_width(grid: &GridController) -> usize {
    if grid.config().selectable() {
        grid.config().checkbox_width() as usize
    } else {
        0
    }
}

fn visible_columns(grid: &GridController) -> Vec<&ColumnDescriptor> {
    grid.config().visible_columns().collect()
}

// ===== Measurement =====

/// Lines row `row` needs at the current column widths.
pub fn row_line_count(grid: &GridController, row: &Row) -> usize {
    visible_columns(grid)
        .iter()
        .zip(grid.column_widths())
        .map(|(column, width)| {
            let text_width = (width.value as usize).saturating_sub(CELL_PADDING);
            wrap_cell(&column.cell_text(row), text_width).len()
        })
        .max()
        .unwrap_or(1)
        .max(1)
}

/// Narrowest width each visible column's header fits in.
///
/// Sortable columns keep room for the sort arrow.
pub fn column_min_widths(grid: &GridController) -> Vec<u32> {
    let sortable = grid.config().sortable();
    grid.config()
        .visible_columns()
        .map(|column| {
            let arrow = if sortable && column.sortable {
                sort_arrow(SortOrder::Ascending).width()
            } else {
                0
            };
            (column.label.width() + arrow + CELL_PADDING) as u32
        })
        .collect()
}

/// Bring the controller up to date with a body of `body` size.
///
/// Feeds viewport size, column minimums and rendered row heights to the
/// controller and runs its pending work, repeating while measuring moves the
/// window.
pub fn sync(grid: &mut GridController, body: Rect) {
    grid.resize(u32::from(body.width), usize::from(body.height));
    grid.measure_columns(column_min_widths(grid));
    grid.run_pending();

    for pass in 0..MAX_MEASURE_PASSES {
        let before = grid.window();
        let heights: Vec<usize> = grid
            .visible_rows()
            .iter()
            .map(|row| row_line_count(grid, row))
            .collect();
        grid.measure_rows(before.from_row, &heights);
        grid.run_pending();
        if grid.window() == before {
            trace!(pass, "row measurements settled");
            break;
        }
    }
}

// ===== Rendering =====

/// Draw the whole grid.
pub fn render_grid(
    buf: &mut Buffer,
    areas: &GridAreas,
    grid: &GridController,
    focus: GridFocus,
    status: &str,
    styles: &GridStyles,
) {
    render_header(buf, areas.header, grid, focus, styles);
    render_body(buf, areas.body, grid, focus, styles);
    if areas.status.height > 0 {
        let line = Line::from(Span::styled(pad_to(status, areas.status.width as usize), styles.status));
        buf.set_line(areas.status.x, areas.status.y, &line, areas.status.width);
    }
}

fn render_header(
    buf: &mut Buffer,
    area: Rect,
    grid: &GridController,
    focus: GridFocus,
    styles: &GridStyles,
) {
    if area.height == 0 {
        return;
    }
    let mut spans = Vec::new();
    let gutter = gutter_width(grid);
    if gutter > 0 {
        let glyph = if grid.indeterminate() {
            "[-]"
        } else {
            checkbox(grid.all_selected())
        };
        spans.push(Span::styled(cell(glyph, gutter), styles.header));
    }

    let sort = grid.active_sort();
    for (i, (column, width)) in visible_columns(grid)
        .into_iter()
        .zip(grid.column_widths())
        .enumerate()
    {
        let mut label = column.label.clone();
        if let Some((name, order)) = sort {
            if name == column.name {
                label.push_str(sort_arrow(order));
            }
        }
        let style = if i == focus.column {
            styles.header.patch(styles.focused_column)
        } else {
            styles.header
        };
        spans.push(Span::styled(cell(&label, width.value as usize), style));
    }

    let line = clip(spans, grid.scroll_left(), area.width as usize);
    buf.set_line(area.x, area.y, &line, area.width);
}

fn render_body(
    buf: &mut Buffer,
    area: Rect,
    grid: &GridController,
    focus: GridFocus,
    styles: &GridStyles,
) {
    let top = grid.scroll_top();
    let gutter = gutter_width(grid);
    let columns = visible_columns(grid);
    let widths = grid.column_widths();
    let index = grid.heights().index();

    for row_index in grid.window().indices() {
        let Some(row) = grid.data().get(row_index) else {
            break;
        };
        let row_top = index.sum_before(row_index);
        if row_top >= top + area.height as usize {
            break;
        }
        let selected = grid.is_row_selected(row);
        let style = styles.for_row(selected, focus.row == Some(row_index));
        let cells: Vec<Vec<String>> = columns
            .iter()
            .zip(widths)
            .map(|(column, width)| {
                wrap_cell(
                    &column.cell_text(row),
                    (width.value as usize).saturating_sub(CELL_PADDING),
                )
            })
            .collect();

        for line in 0..grid.heights().resolved(row_index).get() {
            let Some(y) = (row_top + line).checked_sub(top) else {
                continue;
            };
            if y >= area.height as usize {
                break;
            }
            let mut spans = Vec::with_capacity(cells.len() + 1);
            if gutter > 0 {
                let glyph = if line == 0 { checkbox(selected) } else { "" };
                spans.push(Span::styled(cell(glyph, gutter), style));
            }
            for (lines, width) in cells.iter().zip(widths) {
                let text = lines.get(line).map(String::as_str).unwrap_or("");
                spans.push(Span::styled(cell(text, width.value as usize), style));
            }
            let clipped = clip(spans, grid.scroll_left(), area.width as usize);
            buf.set_line(area.x, area.y + y as u16, &clipped, area.width);
        }
    }
}

// ===== Hit testing =====

/// Grid part under a terminal position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridHit {
    /// The select-all checkbox in the header gutter.
    SelectAll,
    /// A header label.
    Header(usize),
    /// The last cell of a header, where dragging resizes the column.
    ColumnEdge(usize),
    /// A row's selection checkbox.
    Checkbox(usize),
    /// A row body; `column` is the visible column under the pointer.
    Cell {
        /// Row in the data set.
        row: usize,
        /// Visible column, if the pointer is over one.
        column: Option<usize>,
    },
    /// Nothing interactive.
    Outside,
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.right() && y >= area.y && y < area.bottom()
}

enum Strip {
    Gutter,
    Column { index: usize, edge: bool },
    Beyond,
}

fn locate(grid: &GridController, strip_x: usize) -> Strip {
    let gutter = gutter_width(grid);
    if strip_x < gutter {
        return Strip::Gutter;
    }
    let mut start = gutter;
    for (index, width) in grid.column_widths().iter().enumerate() {
        let end = start + width.value as usize;
        if strip_x < end {
            return Strip::Column {
                index,
                edge: strip_x + 1 == end,
            };
        }
        start = end;
    }
    Strip::Beyond
}

/// Which part of the grid is at terminal position (`x`, `y`).
pub fn hit_test(grid: &GridController, areas: &GridAreas, x: u16, y: u16) -> GridHit {
    if contains(areas.header, x, y) {
        let strip_x = usize::from(x - areas.header.x) + grid.scroll_left();
        return match locate(grid, strip_x) {
            Strip::Gutter => GridHit::SelectAll,
            Strip::Column { index, edge: true } => GridHit::ColumnEdge(index),
            Strip::Column { index, edge: false } => GridHit::Header(index),
            Strip::Beyond => GridHit::Outside,
        };
    }

    if contains(areas.body, x, y) {
        let offset = grid.scroll_top() + usize::from(y - areas.body.y);
        let Some(row) = grid.row_at_offset(offset) else {
            return GridHit::Outside;
        };
        if row >= grid.data().len() {
            return GridHit::Outside;
        }
        let strip_x = usize::from(x - areas.body.x) + grid.scroll_left();
        return match locate(grid, strip_x) {
            Strip::Gutter => GridHit::Checkbox(row),
            Strip::Column { index, .. } => GridHit::Cell {
                row,
                column: Some(index),
            },
            Strip::Beyond => GridHit::Cell { row, column: None },
        };
    }

    GridHit::Outside
}

#[cfg(test)]
#[path = "grid_tests.rs"]
mod tests;
