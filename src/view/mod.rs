//! TUI rendering and terminal management (impure shell)
//!
//! [`TuiApp`] owns the terminal and a [`GridController`]. Every frame it
//! syncs measurements into the controller, draws the grid, and turns key and
//! mouse input into controller calls. Grid events come back over the
//! controller's channel and are answered here: a sort change re-runs the row
//! query and hands the controller a new data set.

pub mod constants;
pub mod grid;
pub mod styles;

pub use grid::{hit_test, render_grid, sync, GridAreas, GridFocus, GridHit};
pub use styles::{ColorConfig, GridStyles};

use crate::config::keybindings::KeyBindings;
use crate::config::GridConfig;
use crate::model::{GridEvent, KeyAction, Row};
use crate::state::{ClickTarget, GridController, RowKey, RowQuery};
use crate::view::constants::{DOUBLE_CLICK_MS, HORIZONTAL_STEP, RESIZE_STEP, WHEEL_STEP};
use crossterm::{
    event::{
        self, Event, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::layout::Rect;
use ratatui::{backend::CrosstermBackend, Terminal};
use serde_json::Value;
use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    grid: GridController,
    events: Receiver<GridEvent>,
    source_rows: Vec<Row>,
    /// Rows kept above all others when sorting
    pinned: Vec<Row>,
    query: RowQuery,
    filtered_total: usize,
    key_bindings: KeyBindings,
    styles: GridStyles,
    focus: GridFocus,
    message: String,
    /// Areas of the last rendered frame (for mouse hit testing)
    last_areas: GridAreas,
    last_click: Option<(usize, Instant)>,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(
        config: GridConfig,
        rows: Vec<Row>,
        query: RowQuery,
        styles: GridStyles,
    ) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(crossterm::event::EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self::with_terminal(terminal, config, rows, query, styles))
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Build the application on an existing terminal.
    pub fn with_terminal(
        terminal: Terminal<B>,
        config: GridConfig,
        rows: Vec<Row>,
        query: RowQuery,
        styles: GridStyles,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut app = Self {
            terminal,
            grid: GridController::new(config, tx),
            events: rx,
            source_rows: rows,
            pinned: Vec::new(),
            query,
            filtered_total: 0,
            key_bindings: KeyBindings::default(),
            styles,
            focus: GridFocus::default(),
            message: String::new(),
            last_areas: GridAreas::default(),
            last_click: None,
        };
        app.requery();
        app
    }

    /// Run the main event loop
    ///
    /// Returns when user quits (q or Ctrl+C). Redraws after every input and
    /// whenever the controller has deferred work waiting.
    pub fn run(&mut self) -> Result<(), TuiError> {
        const TICK: Duration = Duration::from_millis(250);

        self.draw()?;

        loop {
            if event::poll(TICK)? {
                match event::read()? {
                    Event::Key(key) => {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if self.handle_key(key) {
                            return Ok(());
                        }
                        self.draw()?;
                    }
                    Event::Mouse(mouse) => {
                        self.handle_mouse(mouse);
                        self.draw()?;
                    }
                    Event::Resize(width, height) => {
                        debug!(width, height, "terminal resized");
                        self.draw()?;
                    }
                    _ => {}
                }
            } else if self.grid.has_pending() {
                self.draw()?;
            }
        }
    }

    /// Grid controller driven by this application.
    pub fn grid(&self) -> &GridController {
        &self.grid
    }

    /// Terminal the application draws to.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    // ===== Data =====

    /// Select the rows whose `id` is in `ids` and keep them on top when sorting.
    pub fn preselect(&mut self, ids: &[Value]) {
        if ids.is_empty() {
            return;
        }
        self.pinned = self
            .source_rows
            .iter()
            .filter(|row| row.get("id").is_some_and(|id| ids.contains(id)))
            .cloned()
            .collect();
        self.requery();
        self.grid.select_ids(ids);
        // per-row selection events would bury the summary below
        self.events.try_iter().for_each(drop);
        self.message = format!("{} rows preselected", self.grid.selected().len());
        info!(
            requested = ids.len(),
            selected = self.grid.selected().len(),
            "rows preselected"
        );
    }

    /// Re-run the row query over the source rows and hand the result to the grid.
    fn requery(&mut self) {
        let config = self.grid.config();
        let result = self.query.apply(
            &self.source_rows,
            config.columns(),
            &self.pinned,
            config.matcher().as_ref(),
        );
        self.filtered_total = result.filtered_total;
        info!(
            rows = result.rows.len(),
            total = self.source_rows.len(),
            "row query applied"
        );
        self.focus.row = (!result.rows.is_empty()).then_some(0);
        self.grid.set_data(Arc::new(result.rows));
    }

    fn drain_events(&mut self) {
        let events: Vec<GridEvent> = self.events.try_iter().collect();
        for event in events {
            debug!(?event, "grid event");
            match event {
                GridEvent::SortChange { name, order } => {
                    self.query.sort_by = Some(name.clone());
                    self.query.sort_order = order;
                    self.requery();
                    self.message = format!("sorted by {name} {order}");
                }
                GridEvent::RowSelect {
                    index, selected, ..
                } => {
                    let verb = if selected { "selected" } else { "deselected" };
                    self.message = format!("row {} {verb}", index + 1);
                }
                GridEvent::SelectAll { rows, selected } => {
                    let verb = if selected { "selected" } else { "deselected" };
                    self.message = format!("{} rows {verb}", rows.len());
                }
                GridEvent::RowClick { index, .. } => {
                    self.message = format!("clicked row {}", index + 1);
                }
                GridEvent::RowDoubleClick { row, index } => {
                    self.message = format!("row {}: {row}", index + 1);
                }
            }
        }
    }

    // ===== Keyboard =====

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let Some(action) = self.key_bindings.get(key) else {
            return false;
        };
        let page = i64::from(self.last_areas.body.height.max(1));

        match action {
            KeyAction::Quit => return true,
            KeyAction::FocusPrevRow => self.move_focus(RowKey::Up, false),
            KeyAction::FocusNextRow => self.move_focus(RowKey::Down, false),
            KeyAction::ExtendUp => self.move_focus(RowKey::Up, true),
            KeyAction::ExtendDown => self.move_focus(RowKey::Down, true),
            KeyAction::PageUp => {
                self.grid.scroll_by(-page);
                self.focus_top_row();
            }
            KeyAction::PageDown => {
                self.grid.scroll_by(page);
                self.focus_top_row();
            }
            KeyAction::ScrollToTop => {
                self.grid.scroll(0, self.grid.scroll_left());
                self.focus_top_row();
            }
            KeyAction::ScrollToBottom => {
                self.grid
                    .scroll(self.grid.max_scroll_top(), self.grid.scroll_left());
                self.focus.row = self.grid.data().len().checked_sub(1);
            }
            KeyAction::ScrollLeft => self.grid.scroll_horizontal_by(-HORIZONTAL_STEP),
            KeyAction::ScrollRight => self.grid.scroll_horizontal_by(HORIZONTAL_STEP),
            KeyAction::FocusPrevColumn => {
                self.focus.column = self.focus.column.saturating_sub(1);
            }
            KeyAction::FocusNextColumn => {
                if self.focus.column + 1 < self.grid.column_widths().len() {
                    self.focus.column += 1;
                }
            }
            KeyAction::SortColumn => self.sort_focused_column(),
            KeyAction::ShrinkColumn => self.resize_focused_column(-RESIZE_STEP),
            KeyAction::GrowColumn => self.resize_focused_column(RESIZE_STEP),
            KeyAction::ToggleRow => {
                if let Some(row) = self.focus.row {
                    self.grid.row_key(RowKey::Space, row, false);
                }
            }
            KeyAction::ToggleAll => self.grid.toggle_all(),
            KeyAction::OpenRow => {
                if let Some(row) = self.focus.row {
                    self.grid.double_click_row(row, ClickTarget::row());
                }
            }
        }

        self.drain_events();
        false
    }

    fn move_focus(&mut self, key: RowKey, shift: bool) {
        let Some(current) = self.focus.row else {
            return;
        };
        let next = self.grid.row_key(key, current, shift);
        self.focus.row = Some(next);
        self.grid.scroll_to_row(next);
    }

    fn focus_top_row(&mut self) {
        self.focus.row = self.grid.row_at_offset(self.grid.scroll_top());
    }

    fn focused_column_name(&self) -> Option<String> {
        self.grid
            .config()
            .visible_columns()
            .nth(self.focus.column)
            .map(|c| c.name.clone())
    }

    fn sort_focused_column(&mut self) {
        let Some(name) = self.focused_column_name() else {
            return;
        };
        if self.grid.sort_by_column(&name).is_none() {
            self.message = format!("{name} is not sortable");
        }
    }

    fn resize_focused_column(&mut self, delta: i64) {
        self.grid.start_column_drag(self.focus.column, 0);
        self.grid.column_drag(delta);
        self.grid.end_column_drag();
    }

    // ===== Mouse =====

    /// Handle a single mouse event
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let shift = mouse.modifiers.contains(KeyModifiers::SHIFT);
        match mouse.kind {
            MouseEventKind::ScrollUp => self.grid.scroll_by(-WHEEL_STEP),
            MouseEventKind::ScrollDown => self.grid.scroll_by(WHEEL_STEP),
            MouseEventKind::ScrollLeft => self.grid.scroll_horizontal_by(-HORIZONTAL_STEP),
            MouseEventKind::ScrollRight => self.grid.scroll_horizontal_by(HORIZONTAL_STEP),
            MouseEventKind::Down(MouseButton::Left) => {
                self.handle_click(mouse.column, mouse.row, shift);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.grid.dragged_column().is_some() {
                    self.grid.column_drag(i64::from(mouse.column));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.grid.dragged_column().is_some() {
                    self.grid.end_column_drag();
                }
            }
            _ => {}
        }
        self.drain_events();
    }

    fn handle_click(&mut self, x: u16, y: u16, shift: bool) {
        match hit_test(&self.grid, &self.last_areas, x, y) {
            GridHit::SelectAll => self.grid.toggle_all(),
            GridHit::Header(column) => {
                self.focus.column = column;
                self.sort_focused_column();
            }
            GridHit::ColumnEdge(column) => {
                self.focus.column = column;
                self.grid.start_column_drag(column, i64::from(x));
            }
            GridHit::Checkbox(row) => {
                self.focus.row = Some(row);
                self.grid.select_row(row, shift);
            }
            GridHit::Cell { row, column } => {
                self.focus.row = Some(row);
                if let Some(column) = column {
                    self.focus.column = column;
                }
                let now = Instant::now();
                let double = matches!(
                    self.last_click,
                    Some((last, at)) if last == row
                        && now.duration_since(at).as_millis() <= DOUBLE_CLICK_MS
                );
                if double {
                    self.grid.double_click_row(row, ClickTarget::row());
                    self.last_click = None;
                } else {
                    self.grid.click_row(row, ClickTarget::row());
                    self.last_click = Some((row, now));
                }
            }
            GridHit::Outside => {}
        }
    }

    // ===== Rendering =====

    /// Status line: visible range, selection, sort and the last event.
    fn status_line(&self) -> String {
        let len = self.grid.data().len();
        let mut parts = Vec::new();
        if len == 0 {
            parts.push("no rows".to_string());
        } else {
            let top = self.grid.scroll_top();
            let first = self.grid.row_at_offset(top).unwrap_or(0);
            let bottom = top + usize::from(self.last_areas.body.height.max(1)) - 1;
            let last = self.grid.row_at_offset(bottom).unwrap_or(len - 1);
            parts.push(format!(
                "rows {}-{} of {}",
                first + 1,
                last + 1,
                self.filtered_total
            ));
        }
        if self.grid.config().selectable() {
            parts.push(format!("{} selected", self.grid.selected().len()));
        }
        if let Some((name, order)) = self.grid.active_sort() {
            parts.push(format!("sort {name} {order}"));
        }
        if !self.message.is_empty() {
            parts.push(self.message.clone());
        }
        parts.join(" | ")
    }

    /// Render the current frame
    ///
    /// Syncs sizes and measurements into the controller first, so the frame
    /// shows the settled window.
    fn draw(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        self.last_areas = GridAreas::split(Rect::new(0, 0, size.width, size.height));
        sync(&mut self.grid, self.last_areas.body);
        self.drain_events();

        let len = self.grid.data().len();
        if self.focus.row.is_some_and(|row| row >= len) {
            self.focus.row = len.checked_sub(1);
        }

        let status = self.status_line();
        let areas = self.last_areas;
        let grid = &self.grid;
        let focus = self.focus;
        let styles = &self.styles;
        self.terminal.draw(|frame| {
            render_grid(frame.buffer_mut(), &areas, grid, focus, &status, styles);
        })?;

        Ok(())
    }
}

/// Initialize and run the viewer until the user quits.
///
/// Rows whose `id` is in `preselected` start selected and stay on top when
/// sorting.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run_viewer(
    config: GridConfig,
    rows: Vec<Row>,
    query: RowQuery,
    styles: GridStyles,
    preselected: &[Value],
) -> Result<(), TuiError> {
    let mut app = TuiApp::new(config, rows, query, styles)?;
    app.preselect(preselected);

    // Run the app and ensure cleanup happens even on error
    let result = app.run();

    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(crossterm::event::DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
