//! Grid controller.
//!
//! Owns every piece of derived grid state and wires host signals (data
//! replacement, measurements, scrolling, pointer and key input) to the
//! engines in [`crate::view_state`] and [`crate::state`]. Notifications for
//! the caller go out over an [`mpsc`](std::sync::mpsc) channel.
//!
//! Work that must wait for the host to render again is queued on a
//! [`Scheduler`] and runs when the host calls [`GridController::run_pending`].

use crate::config::GridConfig;
use crate::model::{ColumnDescriptor, ColumnWidth, GridError, GridEvent, Row, SortOrder};
use crate::state::scheduler::{Scheduler, Task};
use crate::state::selection::SelectionModel;
use crate::view_state::{
    compute_widths, compute_window, dragged_width, ColumnWidthRecord, RowHeightCache,
    ViewportDimensions, VisibleWindow,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Where a row click landed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickTarget {
    /// The click hit the row's selection checkbox.
    pub is_checkbox: bool,
    /// The clicked element asked for the click not to reach the row.
    pub stop_propagation: bool,
}

impl ClickTarget {
    /// Plain click on the row body.
    pub fn row() -> Self {
        Self::default()
    }

    /// Click on the selection checkbox.
    pub fn checkbox() -> Self {
        Self {
            is_checkbox: true,
            stop_propagation: false,
        }
    }
}

/// Keys a focused row reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKey {
    /// Toggle the focused row.
    Enter,
    /// Toggle the focused row.
    Space,
    /// Focus the previous row.
    Up,
    /// Focus the next row.
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnDrag {
    column: usize,
    anchor_x: i64,
    pending_x: Option<i64>,
}

/// Stateful core of one grid.
#[derive(Debug)]
pub struct GridController {
    config: GridConfig,
    data: Arc<Vec<Row>>,
    heights: RowHeightCache,
    column_mins: Vec<u32>,
    width_overrides: HashMap<String, u32>,
    viewport: ViewportDimensions,
    scroll_top: usize,
    scroll_left: usize,
    window: VisibleWindow,
    widths: Vec<ColumnWidthRecord>,
    selection: SelectionModel,
    active_sort: Option<String>,
    sort_order: SortOrder,
    drag: Option<ColumnDrag>,
    scheduler: Scheduler,
    events: Sender<GridEvent>,
}

impl GridController {
    /// Controller for an empty data set.
    pub fn new(config: GridConfig, events: Sender<GridEvent>) -> Self {
        let heights = RowHeightCache::new(0, config.default_row_height());
        let selection = SelectionModel::new(Arc::clone(config.matcher()), config.multiple());
        let active_sort = config.sort_by().map(str::to_string);
        let sort_order = config.sort_order();
        let mut controller = Self {
            config,
            data: Arc::new(Vec::new()),
            heights,
            column_mins: Vec::new(),
            width_overrides: HashMap::new(),
            viewport: ViewportDimensions::default(),
            scroll_top: 0,
            scroll_left: 0,
            window: VisibleWindow::default(),
            widths: Vec::new(),
            selection,
            active_sort,
            sort_order,
            drag: None,
            scheduler: Scheduler::new(),
            events,
        };
        controller.refresh_widths();
        controller.refresh_window();
        controller
    }

    // ===== Inputs =====

    /// Replace the data set.
    ///
    /// Passing the data set already held is a no-op. Otherwise the height
    /// cache is dropped and the selection reconciled right away, while the
    /// scroll reset, window and layout recomputations wait for the next
    /// [`run_pending`](Self::run_pending), in that order.
    pub fn set_data(&mut self, data: Arc<Vec<Row>>) {
        if Arc::ptr_eq(&self.data, &data) {
            trace!("same data set, nothing to do");
            return;
        }
        self.data = data;
        self.heights.invalidate(self.data.len());
        self.selection.reconcile(&self.data);
        self.flush_selection_events();
        self.scheduler.schedule(Task::ResetScroll);
        self.scheduler.schedule(Task::Refresh);
        debug!(rows = self.data.len(), "data set replaced");
    }

    /// Replace the column set.
    ///
    /// Width overrides and measured minimums of the old set are dropped.
    ///
    /// # Errors
    ///
    /// [`GridError::InvalidConfiguration`] when the active sort column is
    /// not part of `columns`.
    pub fn set_columns(&mut self, columns: Vec<ColumnDescriptor>) -> Result<(), GridError> {
        self.config = self
            .config
            .with_sort(self.active_sort.as_deref(), self.sort_order)?
            .with_columns(columns)?;
        self.width_overrides.clear();
        self.column_mins.clear();
        self.drag = None;
        self.scheduler.schedule(Task::Remeasure);
        Ok(())
    }

    /// Change the active sort without emitting an event.
    ///
    /// An empty `sort_by` clears the sort.
    ///
    /// # Errors
    ///
    /// [`GridError::InvalidConfiguration`] when `sort_by` names no column or
    /// `sort_order` is neither `ASC` nor `DESC`.
    pub fn set_sort(&mut self, sort_by: &str, sort_order: &str) -> Result<(), GridError> {
        let order = sort_order.parse::<SortOrder>()?;
        if sort_by.is_empty() {
            self.active_sort = None;
        } else if self.config.column(sort_by).is_some() {
            self.active_sort = Some(sort_by.to_string());
        } else {
            return Err(GridError::invalid(
                "sort_by",
                format!("no column named {sort_by:?}"),
            ));
        }
        self.sort_order = order;
        Ok(())
    }

    /// The rendered rows changed shape; recompute on the next tick.
    ///
    /// Bursts of notifications collapse into one pass.
    pub fn notify_rows_changed(&mut self) {
        self.scheduler.schedule(Task::Remeasure);
    }

    /// Record rendered heights for rows `first..first + heights.len()`.
    ///
    /// The row border is added to every height. The window follows at once.
    pub fn measure_rows(&mut self, first: usize, heights: &[usize]) {
        if heights.is_empty() {
            return;
        }
        let border = self.config.row_border();
        let with_border: Vec<usize> = heights.iter().map(|h| h + border).collect();
        self.heights.record_run(first, &with_border);
        self.refresh_window();
    }

    /// Record the narrowest width each visible column can render in.
    pub fn measure_columns(&mut self, mins: Vec<u32>) {
        if mins == self.column_mins {
            return;
        }
        self.column_mins = mins;
        self.scheduler.schedule(Task::Remeasure);
    }

    /// The host was resized.
    ///
    /// A width change re-lays columns on the next tick; a height change
    /// moves the window immediately.
    pub fn resize(&mut self, width: u32, viewport_height: usize) {
        if width != self.viewport.width {
            self.viewport.width = width;
            self.scheduler.schedule(Task::Remeasure);
        }
        if viewport_height != self.viewport.height {
            self.viewport.height = viewport_height;
            self.refresh_window();
        }
    }

    /// Set both scroll offsets.
    pub fn scroll(&mut self, vertical: usize, horizontal: usize) {
        self.scroll_left = horizontal;
        self.scroll_top = vertical;
        self.refresh_window();
    }

    /// Scroll vertically by `delta`, staying within the content.
    pub fn scroll_by(&mut self, delta: i64) {
        let target = if delta < 0 {
            self.scroll_top.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.scroll_top.saturating_add(delta as usize)
        };
        self.scroll(target.min(self.max_scroll_top()), self.scroll_left);
    }

    /// Scroll horizontally by `delta`, never past the left edge.
    pub fn scroll_horizontal_by(&mut self, delta: i64) {
        let left = if delta < 0 {
            self.scroll_left.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.scroll_left.saturating_add(delta as usize)
        };
        self.scroll_left = left;
    }

    /// Scroll the least distance that brings row `index` fully into view.
    pub fn scroll_to_row(&mut self, index: usize) {
        if index >= self.heights.len() {
            return;
        }
        let top = self.heights.index().sum_before(index);
        let bottom = self.heights.index().sum_before(index + 1);
        let target = if top < self.scroll_top {
            top
        } else if bottom > self.scroll_top + self.viewport.height {
            bottom.saturating_sub(self.viewport.height)
        } else {
            return;
        };
        self.scroll(target, self.scroll_left);
    }

    // ===== Column dragging =====

    /// Begin dragging the right edge of visible column `column` at pointer `x`.
    pub fn start_column_drag(&mut self, column: usize, x: i64) {
        if !self.config.resizable() {
            return;
        }
        if column >= self.widths.len() {
            trace!(column, "drag started on unknown column");
            return;
        }
        self.drag = Some(ColumnDrag {
            column,
            anchor_x: x,
            pending_x: None,
        });
    }

    /// Pointer moved during a drag; applied on the next tick.
    pub fn column_drag(&mut self, x: i64) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        drag.pending_x = Some(x);
        self.scheduler.schedule(Task::ColumnDrag);
    }

    /// Finish the drag, applying the last pointer position.
    pub fn end_column_drag(&mut self) {
        self.apply_column_drag();
        self.drag = None;
    }

    /// Visible column being dragged, if any.
    pub fn dragged_column(&self) -> Option<usize> {
        self.drag.map(|d| d.column)
    }

    fn apply_column_drag(&mut self) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let Some(x) = drag.pending_x.take() else {
            return;
        };
        let delta = x - drag.anchor_x;
        drag.anchor_x = x;
        let column = drag.column;
        if delta == 0 {
            return;
        }

        let Some(current) = self.widths.get(column).map(|w| w.value) else {
            return;
        };
        let Some(name) = self
            .config
            .visible_columns()
            .nth(column)
            .map(|c| c.name.clone())
        else {
            return;
        };
        let measured_min = self.column_mins.get(column).copied().unwrap_or(0);
        let width = dragged_width(current, delta, measured_min);
        debug!(column = %name, from = current, to = width, "column resized");
        self.width_overrides.insert(name, width);
        self.refresh_widths();
    }

    // ===== Sorting =====

    /// Activate sorting by `name`.
    ///
    /// Flips the direction when `name` is already the sort column, otherwise
    /// sorts it ascending. Returns the new direction, or `None` when the grid
    /// or column is not sortable.
    pub fn sort_by_column(&mut self, name: &str) -> Option<SortOrder> {
        if !self.config.sortable() {
            return None;
        }
        if !self.config.column(name)?.sortable {
            return None;
        }
        let order = if self.active_sort.as_deref() == Some(name) {
            self.sort_order.flipped()
        } else {
            SortOrder::Ascending
        };
        self.active_sort = Some(name.to_string());
        self.sort_order = order;
        debug!(column = name, %order, "sort changed");
        self.emit(GridEvent::SortChange {
            name: name.to_string(),
            order,
        });
        Some(order)
    }

    // ===== Row interaction =====

    /// A row was clicked. Returns true when a click event was emitted.
    pub fn click_row(&mut self, index: usize, target: ClickTarget) -> bool {
        let Some(row) = self.clickable_row(index, target) else {
            return false;
        };
        self.emit(GridEvent::RowClick { row, index });
        true
    }

    /// A row was double-clicked. Returns true when an event was emitted.
    pub fn double_click_row(&mut self, index: usize, target: ClickTarget) -> bool {
        let Some(row) = self.clickable_row(index, target) else {
            return false;
        };
        self.emit(GridEvent::RowDoubleClick { row, index });
        true
    }

    fn clickable_row(&self, index: usize, target: ClickTarget) -> Option<Row> {
        if !self.config.clickable() || target.is_checkbox || target.stop_propagation {
            return None;
        }
        self.data.get(index).cloned()
    }

    /// Click on the selection checkbox of row `index`.
    pub fn select_row(&mut self, index: usize, shift: bool) {
        if !self.config.selectable() {
            return;
        }
        self.selection.click(&self.data, index, shift);
        self.flush_selection_events();
    }

    /// Flip the selection of row `index` outside any range gesture.
    pub fn toggle_row(&mut self, index: usize) -> Option<bool> {
        if !self.config.selectable() {
            return None;
        }
        let selected = self.selection.toggle(&self.data, index);
        self.flush_selection_events();
        selected
    }

    /// The select-all checkbox changed.
    pub fn select_all(&mut self, checked: bool) {
        if !self.config.selectable() {
            return;
        }
        self.selection.select_all(&self.data, checked);
        self.flush_selection_events();
    }

    /// Toggle the select-all checkbox from its current state.
    pub fn toggle_all(&mut self) {
        let checked = !self.selection.all_selected();
        self.select_all(checked);
    }

    /// Select the rows whose `id` is in `ids`.
    pub fn select_ids(&mut self, ids: &[Value]) {
        self.selection.select_ids(&self.data, ids);
        self.flush_selection_events();
    }

    /// Key pressed on the focused row `index`; returns the row to focus next.
    ///
    /// Up and Down stop at the first and last row. With shift held in a
    /// multi-select grid they also toggle the row being left.
    pub fn row_key(&mut self, key: RowKey, index: usize, shift: bool) -> usize {
        let extend = self.config.selectable() && self.config.multiple() && shift;
        match key {
            RowKey::Enter | RowKey::Space => {
                self.toggle_row(index);
                index
            }
            RowKey::Up => {
                if extend {
                    self.toggle_row(index);
                }
                index.saturating_sub(1)
            }
            RowKey::Down => {
                if extend {
                    self.toggle_row(index);
                }
                if index + 1 < self.data.len() {
                    index + 1
                } else {
                    index
                }
            }
        }
    }

    // ===== Scheduling =====

    /// Run every task queued before this call; returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let batch = self.scheduler.take_batch();
        for &task in &batch {
            trace!(?task, "running task");
            match task {
                Task::ResetScroll => {
                    self.scroll_top = 0;
                }
                Task::Refresh => {
                    self.refresh_window();
                    self.refresh_widths();
                    self.selection.recalculate(&self.data);
                }
                Task::Remeasure => {
                    self.refresh_widths();
                    self.refresh_window();
                }
                Task::ColumnDrag => self.apply_column_drag(),
            }
        }
        batch.len()
    }

    /// Whether work is waiting for [`run_pending`](Self::run_pending).
    pub fn has_pending(&self) -> bool {
        !self.scheduler.is_empty()
    }

    fn refresh_window(&mut self) {
        self.window = compute_window(
            &self.heights,
            self.scroll_top,
            self.viewport.height,
            self.config.offset_rows(),
        );
        debug!(
            from = self.window.from_row,
            to = self.window.to_row,
            scroll_top = self.scroll_top,
            "window recomputed"
        );
    }

    fn refresh_widths(&mut self) {
        let columns: Vec<ColumnDescriptor> = self
            .config
            .columns()
            .iter()
            .map(|column| match self.width_overrides.get(&column.name) {
                Some(&px) => column.clone().with_width(ColumnWidth::Fixed(px)),
                None => column.clone(),
            })
            .collect();
        self.widths = compute_widths(self.host_width(), &columns, &self.column_mins);
        debug!(
            host_width = self.host_width(),
            columns = self.widths.len(),
            "widths recomputed"
        );
    }

    fn flush_selection_events(&mut self) {
        for event in self.selection.take_events() {
            self.emit(event);
        }
    }

    fn emit(&self, event: GridEvent) {
        if self.events.send(event).is_err() {
            warn!("grid event receiver dropped");
        }
    }

    // ===== Accessors =====

    /// Validated configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Current data set.
    pub fn data(&self) -> &Arc<Vec<Row>> {
        &self.data
    }

    /// Rendered row range.
    pub fn window(&self) -> VisibleWindow {
        self.window
    }

    /// Rows inside the rendered range.
    pub fn visible_rows(&self) -> &[Row] {
        let len = self.data.len();
        let from = self.window.from_row.min(len);
        let to = self.window.to_row.clamp(from, len);
        &self.data[from..to]
    }

    /// Widths of the visible columns.
    pub fn column_widths(&self) -> &[ColumnWidthRecord] {
        &self.widths
    }

    /// Width available to data columns.
    pub fn host_width(&self) -> u32 {
        if self.config.selectable() {
            self.viewport.width.saturating_sub(self.config.checkbox_width())
        } else {
            self.viewport.width
        }
    }

    /// Vertical scroll offset.
    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    /// Largest useful vertical scroll offset.
    pub fn max_scroll_top(&self) -> usize {
        self.heights.total().saturating_sub(self.viewport.height)
    }

    /// Horizontal scroll offset.
    pub fn scroll_left(&self) -> usize {
        self.scroll_left
    }

    /// Row covering the vertical content offset `offset`.
    pub fn row_at_offset(&self, offset: usize) -> Option<usize> {
        self.heights.index().lower_bound(offset)
    }

    /// Horizontal shift to apply to the header so it tracks the body.
    pub fn columns_left_scroll(&self) -> i64 {
        -(self.scroll_left as i64)
    }

    /// Height cache of the current data set.
    pub fn heights(&self) -> &RowHeightCache {
        &self.heights
    }

    /// Every data row is selected.
    pub fn all_selected(&self) -> bool {
        self.selection.all_selected()
    }

    /// Some, but not all, data rows are selected.
    pub fn indeterminate(&self) -> bool {
        self.selection.indeterminate()
    }

    /// Whether `row` is selected.
    pub fn is_row_selected(&self, row: &Row) -> bool {
        self.selection.is_selected(row)
    }

    /// Selected rows in selection order.
    pub fn selected(&self) -> &[Row] {
        self.selection.selected()
    }

    /// Active sort column and direction.
    pub fn active_sort(&self) -> Option<(&str, SortOrder)> {
        self.active_sort
            .as_deref()
            .map(|name| (name, self.sort_order))
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
