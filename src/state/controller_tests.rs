//! Tests for the grid controller.

use super::*;
use crate::config::GridConfigBuilder;
use serde_json::json;
use std::sync::mpsc::{self, Receiver};

fn rows(n: usize) -> Arc<Vec<Row>> {
    Arc::new(
        (0..n)
            .map(|i| json!({"id": i, "name": format!("row {i}")}))
            .collect(),
    )
}

fn columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("name", "Name").sortable(),
        ColumnDescriptor::new("id", "Id"),
    ]
}

fn controller_with(
    configure: impl FnOnce(GridConfigBuilder) -> GridConfigBuilder,
) -> (GridController, Receiver<GridEvent>) {
    let config = configure(GridConfig::builder(columns()))
        .build()
        .expect("valid test config");
    let (tx, rx) = mpsc::channel();
    (GridController::new(config, tx), rx)
}

fn widths(controller: &GridController) -> Vec<u32> {
    controller.column_widths().iter().map(|w| w.value).collect()
}

// ===== Data replacement =====

#[test]
fn data_replacement_resets_scroll_and_heights() {
    let (mut grid, _rx) = controller_with(|b| b);
    grid.resize(400, 100);
    grid.set_data(rows(100));
    grid.run_pending();

    grid.measure_rows(0, &[20, 20]);
    grid.scroll(500, 0);
    assert_eq!(grid.scroll_top(), 500);
    assert!(grid.heights().measured(0).is_some());

    grid.set_data(rows(50));
    // cache drops synchronously
    assert_eq!(grid.heights().len(), 50);
    assert!(grid.heights().measured(0).is_none());
    // scroll reset waits for the tick
    assert_eq!(grid.scroll_top(), 500);

    assert_eq!(grid.run_pending(), 2);
    assert_eq!(grid.scroll_top(), 0);
    assert_eq!(grid.window().from_row, 0);
    assert!(!grid.visible_rows().is_empty());
}

#[test]
fn same_data_set_is_ignored() {
    let (mut grid, _rx) = controller_with(|b| b);
    let data = rows(10);
    grid.set_data(Arc::clone(&data));
    grid.run_pending();
    grid.scroll(40, 0);

    grid.set_data(Arc::clone(&data));
    assert!(!grid.has_pending());
    assert_eq!(grid.scroll_top(), 40);
}

#[test]
fn visible_rows_stay_in_bounds_before_tick() {
    let (mut grid, _rx) = controller_with(|b| b);
    grid.resize(400, 500);
    grid.set_data(rows(20));
    grid.run_pending();
    assert!(grid.window().to_row > 3);

    grid.set_data(rows(3));
    assert_eq!(grid.visible_rows().len(), 3);
}

#[test]
fn data_replacement_drops_stale_selection() {
    let (mut grid, rx) = controller_with(|b| b.selectable(true).multiple(true));
    grid.set_data(rows(5));
    grid.run_pending();
    grid.select_row(4, false);
    grid.select_row(1, false);
    let _ = rx.try_iter().count();

    grid.set_data(rows(3));
    assert_eq!(grid.selected(), &[json!({"id": 1, "name": "row 1"})]);
    assert!(grid.indeterminate());
    assert_eq!(rx.try_iter().count(), 0);
}

// ===== Measurement and viewport =====

#[test]
fn measured_heights_include_row_border() {
    let (mut grid, _rx) = controller_with(|b| b);
    grid.set_data(rows(4));
    grid.run_pending();
    grid.measure_rows(1, &[20]);
    assert_eq!(grid.heights().measured(1).map(|h| h.get()), Some(21));
    assert_eq!(grid.heights().measured(0), None);
}

#[test]
fn width_change_waits_for_tick() {
    let (mut grid, _rx) = controller_with(|b| b.selectable(true));
    grid.resize(442, 100);
    assert!(grid.has_pending());
    assert_eq!(grid.host_width(), 400);

    grid.run_pending();
    assert_eq!(widths(&grid), vec![200, 200]);
}

#[test]
fn height_change_moves_window_immediately() {
    let (mut grid, _rx) = controller_with(|b| b);
    grid.set_data(rows(100));
    grid.run_pending();
    let before = grid.window();

    grid.resize(0, 1000);
    assert!(grid.window().to_row > before.to_row);
}

#[test]
fn scroll_by_clamps_to_content() {
    let (mut grid, _rx) = controller_with(|b| b);
    grid.resize(400, 100);
    grid.set_data(rows(10));
    grid.run_pending();

    grid.scroll_by(-30);
    assert_eq!(grid.scroll_top(), 0);
    grid.scroll_by(10_000);
    assert_eq!(grid.scroll_top(), 10 * 48 - 100);
}

#[test]
fn scroll_to_row_moves_minimal_distance() {
    let (mut grid, _rx) = controller_with(|b| b);
    grid.resize(400, 100);
    grid.set_data(rows(10));
    grid.run_pending();

    grid.scroll_to_row(1);
    assert_eq!(grid.scroll_top(), 0);
    grid.scroll_to_row(4);
    assert_eq!(grid.scroll_top(), 5 * 48 - 100);
    grid.scroll_to_row(0);
    assert_eq!(grid.scroll_top(), 0);
}

#[test]
fn header_follows_horizontal_scroll() {
    let (mut grid, _rx) = controller_with(|b| b);
    grid.scroll(0, 35);
    assert_eq!(grid.columns_left_scroll(), -35);
}

// ===== Column dragging =====

#[test]
fn column_drag_is_coalesced_until_tick() {
    let (mut grid, _rx) = controller_with(|b| b.resizable(true));
    grid.resize(400, 100);
    grid.run_pending();
    assert_eq!(widths(&grid), vec![200, 200]);

    grid.start_column_drag(0, 100);
    grid.column_drag(120);
    grid.column_drag(150);
    assert_eq!(widths(&grid), vec![200, 200]);

    grid.run_pending();
    assert_eq!(widths(&grid), vec![250, 150]);
    assert_eq!(grid.dragged_column(), Some(0));

    grid.end_column_drag();
    assert_eq!(grid.dragged_column(), None);
}

#[test]
fn drag_never_goes_below_measured_minimum() {
    let (mut grid, _rx) = controller_with(|b| b.resizable(true));
    grid.resize(400, 100);
    grid.measure_columns(vec![180, 0]);
    grid.run_pending();

    grid.start_column_drag(0, 200);
    grid.column_drag(0);
    grid.end_column_drag();
    assert_eq!(widths(&grid), vec![180, 220]);
}

#[test]
fn drag_is_ignored_unless_resizable() {
    let (mut grid, _rx) = controller_with(|b| b);
    grid.resize(400, 100);
    grid.run_pending();

    grid.start_column_drag(0, 100);
    grid.column_drag(300);
    grid.end_column_drag();
    assert!(!grid.has_pending());
    assert_eq!(widths(&grid), vec![200, 200]);
}

#[test]
fn new_columns_drop_drag_overrides() {
    let (mut grid, _rx) = controller_with(|b| b.resizable(true));
    grid.resize(400, 100);
    grid.run_pending();
    grid.start_column_drag(0, 0);
    grid.column_drag(-100);
    grid.end_column_drag();
    assert_eq!(widths(&grid), vec![100, 300]);

    grid.set_columns(columns()).unwrap();
    grid.run_pending();
    assert_eq!(widths(&grid), vec![200, 200]);
}

// ===== Sorting =====

#[test]
fn sort_flips_on_repeat_and_resets_on_new_column() {
    let (mut grid, rx) = controller_with(|b| b.sortable(true));
    grid.set_columns(vec![
        ColumnDescriptor::new("name", "Name").sortable(),
        ColumnDescriptor::new("id", "Id").sortable(),
    ])
    .unwrap();

    assert_eq!(grid.sort_by_column("name"), Some(SortOrder::Ascending));
    assert_eq!(grid.sort_by_column("name"), Some(SortOrder::Descending));
    assert_eq!(grid.sort_by_column("id"), Some(SortOrder::Ascending));
    assert_eq!(grid.active_sort(), Some(("id", SortOrder::Ascending)));

    let orders: Vec<(String, SortOrder)> = rx
        .try_iter()
        .filter_map(|e| match e {
            GridEvent::SortChange { name, order } => Some((name, order)),
            _ => None,
        })
        .collect();
    assert_eq!(
        orders,
        vec![
            ("name".to_string(), SortOrder::Ascending),
            ("name".to_string(), SortOrder::Descending),
            ("id".to_string(), SortOrder::Ascending),
        ]
    );
}

#[test]
fn initial_sort_comes_from_config() {
    let (mut grid, _rx) = controller_with(|b| b.sortable(true).sort_by("name").sort_order("DESC"));
    assert_eq!(grid.active_sort(), Some(("name", SortOrder::Descending)));
    assert_eq!(grid.sort_by_column("name"), Some(SortOrder::Ascending));
}

#[test]
fn unsortable_columns_and_grids_are_ignored() {
    let (mut grid, rx) = controller_with(|b| b.sortable(true));
    assert_eq!(grid.sort_by_column("id"), None);
    assert_eq!(grid.sort_by_column("missing"), None);

    let (mut plain, _plain_rx) = controller_with(|b| b);
    assert_eq!(plain.sort_by_column("name"), None);
    assert_eq!(rx.try_iter().count(), 0);
}

#[test]
fn set_sort_validates_inputs() {
    let (mut grid, _rx) = controller_with(|b| b);
    grid.set_sort("id", "desc").unwrap();
    assert_eq!(grid.active_sort(), Some(("id", SortOrder::Descending)));

    assert!(grid.set_sort("nope", "ASC").is_err());
    assert!(grid.set_sort("id", "up").is_err());
    assert_eq!(grid.active_sort(), Some(("id", SortOrder::Descending)));

    grid.set_sort("", "").unwrap();
    assert_eq!(grid.active_sort(), None);
}

#[test]
fn new_columns_must_keep_the_active_sort_column() {
    let (mut grid, _rx) = controller_with(|b| b.sortable(true));
    assert_eq!(grid.sort_by_column("name"), Some(SortOrder::Ascending));

    let err = grid
        .set_columns(vec![ColumnDescriptor::new("id", "Id")])
        .unwrap_err();
    assert!(err.to_string().contains("sort_by"));
    assert_eq!(grid.config().columns().len(), 2);
    assert_eq!(grid.active_sort(), Some(("name", SortOrder::Ascending)));
}

#[test]
fn new_columns_ignore_a_replaced_initial_sort() {
    let (mut grid, _rx) = controller_with(|b| b.sortable(true).sort_by("name"));
    grid.set_columns(vec![
        ColumnDescriptor::new("name", "Name").sortable(),
        ColumnDescriptor::new("id", "Id").sortable(),
    ])
    .unwrap();
    assert_eq!(grid.sort_by_column("id"), Some(SortOrder::Ascending));

    grid.set_columns(vec![ColumnDescriptor::new("id", "Id").sortable()])
        .unwrap();
    assert_eq!(grid.config().sort_by(), Some("id"));
    assert_eq!(grid.active_sort(), Some(("id", SortOrder::Ascending)));

    grid.set_sort("", "ASC").unwrap();
    grid.set_columns(vec![ColumnDescriptor::new("name", "Name")])
        .unwrap();
    assert_eq!(grid.active_sort(), None);
}

// ===== Clicks and selection =====

#[test]
fn row_clicks_respect_target() {
    let (mut grid, rx) = controller_with(|b| b.clickable(true));
    grid.set_data(rows(3));

    assert!(grid.click_row(1, ClickTarget::row()));
    assert!(!grid.click_row(1, ClickTarget::checkbox()));
    assert!(!grid.click_row(
        1,
        ClickTarget {
            is_checkbox: false,
            stop_propagation: true,
        }
    ));
    assert!(grid.double_click_row(2, ClickTarget::row()));
    assert!(!grid.click_row(9, ClickTarget::row()));

    let events: Vec<GridEvent> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            GridEvent::RowClick {
                row: json!({"id": 1, "name": "row 1"}),
                index: 1,
            },
            GridEvent::RowDoubleClick {
                row: json!({"id": 2, "name": "row 2"}),
                index: 2,
            },
        ]
    );
}

#[test]
fn clicks_are_silent_unless_clickable() {
    let (mut grid, rx) = controller_with(|b| b);
    grid.set_data(rows(3));
    assert!(!grid.click_row(0, ClickTarget::row()));
    assert_eq!(rx.try_iter().count(), 0);
}

#[test]
fn shift_selection_emits_one_event_per_row() {
    let (mut grid, rx) = controller_with(|b| b.selectable(true).multiple(true));
    grid.set_data(rows(6));
    grid.run_pending();

    grid.select_row(0, false);
    grid.select_row(3, true);
    assert_eq!(grid.selected().len(), 4);
    assert!(grid.indeterminate());

    let indices: Vec<usize> = rx
        .try_iter()
        .filter_map(|e| match e {
            GridEvent::RowSelect { index, .. } => Some(index),
            _ => None,
        })
        .collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
}

#[test]
fn selection_is_ignored_unless_selectable() {
    let (mut grid, rx) = controller_with(|b| b);
    grid.set_data(rows(3));
    grid.select_row(0, false);
    grid.select_all(true);
    assert!(grid.selected().is_empty());
    assert_eq!(rx.try_iter().count(), 0);
}

#[test]
fn toggle_all_flips_aggregate() {
    let (mut grid, rx) = controller_with(|b| b.selectable(true).multiple(true));
    grid.set_data(rows(3));
    grid.run_pending();

    grid.toggle_all();
    assert!(grid.all_selected());
    assert!(!grid.indeterminate());
    grid.toggle_all();
    assert!(grid.selected().is_empty());

    let kinds: Vec<bool> = rx
        .try_iter()
        .filter_map(|e| match e {
            GridEvent::SelectAll { selected, .. } => Some(selected),
            _ => None,
        })
        .collect();
    assert_eq!(kinds, vec![true, false]);
}

#[test]
fn row_keys_move_focus_and_toggle() {
    let (mut grid, _rx) = controller_with(|b| b.selectable(true).multiple(true));
    grid.set_data(rows(3));
    grid.run_pending();

    assert_eq!(grid.row_key(RowKey::Up, 0, false), 0);
    assert_eq!(grid.row_key(RowKey::Down, 0, false), 1);
    assert_eq!(grid.row_key(RowKey::Down, 2, false), 2);
    assert!(grid.selected().is_empty());

    assert_eq!(grid.row_key(RowKey::Down, 0, true), 1);
    assert_eq!(grid.row_key(RowKey::Down, 1, true), 2);
    assert_eq!(grid.selected().len(), 2);

    assert_eq!(grid.row_key(RowKey::Space, 2, false), 2);
    assert!(grid.all_selected());
    assert_eq!(grid.row_key(RowKey::Enter, 2, false), 2);
    assert_eq!(grid.selected().len(), 2);
}

#[test]
fn dropped_receiver_does_not_panic() {
    let (mut grid, rx) = controller_with(|b| b.clickable(true));
    drop(rx);
    grid.set_data(rows(1));
    assert!(grid.click_row(0, ClickTarget::row()));
}
