//! Tests for the grid widget.

use super::*;
use crate::config::{GridConfig, GridConfigBuilder, GridSettings};
use crate::model::GridEvent;
use crate::view::styles::ColorConfig;
use serde_json::json;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

/// Convert a ratatui buffer to a string, dropping blank lines.
fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buffer[(x, y)].symbol());
        }
        let trimmed = line.trim_end();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n")
}

fn fruit() -> Vec<Row> {
    vec![
        json!({"id": 1, "name": "apple", "qty": 3}),
        json!({"id": 2, "name": "banana", "qty": 12}),
        json!({"id": 3, "name": "cherry", "qty": 7}),
    ]
}

fn columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("name", "Name").sortable(),
        ColumnDescriptor::new("qty", "Qty"),
    ]
}

struct Fixture {
    grid: GridController,
    areas: GridAreas,
    _events: Receiver<GridEvent>,
}

impl Fixture {
    fn new(
        width: u16,
        height: u16,
        rows: Vec<Row>,
        configure: impl FnOnce(GridConfigBuilder) -> GridConfigBuilder,
    ) -> Self {
        let config = configure(GridConfig::builder(columns()).settings(&GridSettings::terminal()))
            .build()
            .expect("valid test config");
        let (tx, rx) = mpsc::channel();
        let mut grid = GridController::new(config, tx);
        let areas = GridAreas::split(Rect::new(0, 0, width, height));
        grid.set_data(Arc::new(rows));
        sync(&mut grid, areas.body);
        Self {
            grid,
            areas,
            _events: rx,
        }
    }

    fn selectable(width: u16, height: u16, rows: Vec<Row>) -> Self {
        Self::new(width, height, rows, |b| {
            b.selectable(true).multiple(true).sortable(true)
        })
    }

    fn render(&self, focus: GridFocus, status: &str) -> String {
        let area = Rect::new(
            0,
            0,
            self.areas.header.width,
            self.areas.header.height + self.areas.body.height + self.areas.status.height,
        );
        let mut buffer = Buffer::empty(area);
        let styles = GridStyles::with_color_config(ColorConfig::new(false));
        render_grid(&mut buffer, &self.areas, &self.grid, focus, status, &styles);
        buffer_to_string(&buffer)
    }
}

fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

// ===== Text helpers =====

#[test]
fn wrap_breaks_on_width_and_newlines() {
    assert_eq!(wrap_cell("abcdef", 4), vec!["abcd", "ef"]);
    assert_eq!(wrap_cell("ab\ncd", 5), vec!["ab", "cd"]);
    assert_eq!(wrap_cell("anything", 0), vec![""]);
}

#[test]
fn wrap_counts_wide_glyphs_as_two_cells() {
    assert_eq!(wrap_cell("日本語", 4), vec!["日本", "語"]);
}

#[test]
fn pad_truncates_and_fills() {
    assert_eq!(pad_to("abc", 5), "abc  ");
    assert_eq!(pad_to("abcdef", 3), "abc");
    assert_eq!(cell("abcdef", 4), "abc ");
}

#[test]
fn clip_cuts_strip_window() {
    let line = clip(vec![Span::raw("ab"), Span::raw("cdef")], 2, 3);
    assert_eq!(line_text(&line), "cde");
}

#[test]
fn clip_blanks_wide_glyph_on_left_edge() {
    let line = clip(vec![Span::raw("日本")], 1, 3);
    assert_eq!(line_text(&line), " 本");
}

// ===== Measurement =====

#[test]
fn column_minimums_leave_room_for_sort_arrow() {
    let fixture = Fixture::selectable(24, 6, fruit());
    assert_eq!(column_min_widths(&fixture.grid), vec![7, 4]);
}

#[test]
fn sync_lays_out_and_measures() {
    let fixture = Fixture::selectable(24, 6, fruit());
    let widths: Vec<u32> = fixture
        .grid
        .column_widths()
        .iter()
        .map(|w| w.value)
        .collect();
    assert_eq!(widths, vec![10, 10]);
    assert_eq!(fixture.grid.heights().measured(2).map(|h| h.get()), Some(1));
    assert!(!fixture.grid.has_pending());
}

#[test]
fn long_text_measures_as_several_lines() {
    let rows = vec![
        json!({"name": "watermelon", "qty": 1}),
        json!({"name": "fig", "qty": 2}),
    ];
    let fixture = Fixture::new(20, 6, rows, |b| b);
    let first = fixture.grid.data()[0].clone();
    assert_eq!(row_line_count(&fixture.grid, &first), 2);
    assert_eq!(fixture.grid.heights().measured(0).map(|h| h.get()), Some(2));
}

// ===== Rendering =====

#[test]
fn renders_header_rows_and_status() {
    let fixture = Fixture::selectable(24, 6, fruit());
    let output = fixture.render(GridFocus::default(), "3 rows");
    insta::assert_snapshot!(output, @r"
[ ] Name      Qty
[ ] apple     3
[ ] banana    12
[ ] cherry    7
3 rows
");
}

#[test]
fn renders_selection_and_sort_state() {
    let mut fixture = Fixture::selectable(24, 6, fruit());
    fixture.grid.select_row(1, false);
    fixture.grid.sort_by_column("name");
    let output = fixture.render(GridFocus::default(), "");
    insta::assert_snapshot!(output, @r"
[-] Name ↑    Qty
[ ] apple     3
[x] banana    12
[ ] cherry    7
");
}

#[test]
fn wrapped_rows_take_several_lines() {
    let rows = vec![
        json!({"name": "watermelon", "qty": 1}),
        json!({"name": "fig", "qty": 2}),
    ];
    let fixture = Fixture::new(20, 6, rows, |b| b);
    let output = fixture.render(GridFocus::default(), "");
    insta::assert_snapshot!(output, @r"
Name      Qty
watermelo 1
n
fig       2
");
}

#[test]
fn vertical_scroll_shows_later_rows() {
    let rows: Vec<Row> = (0..10)
        .map(|i| json!({"id": i, "name": format!("item {i}"), "qty": i}))
        .collect();
    let mut fixture = Fixture::selectable(24, 6, rows);
    fixture.grid.scroll(3, 0);
    sync(&mut fixture.grid, fixture.areas.body);
    let output = fixture.render(GridFocus::default(), "");
    insta::assert_snapshot!(output, @r"
[ ] Name      Qty
[ ] item 3    3
[ ] item 4    4
[ ] item 5    5
[ ] item 6    6
");
}

#[test]
fn horizontal_scroll_shifts_header_and_body() {
    let mut fixture = Fixture::selectable(24, 6, fruit());
    fixture.grid.scroll(0, 4);
    let output = fixture.render(GridFocus::default(), "");
    insta::assert_snapshot!(output, @r"
Name      Qty
apple     3
banana    12
cherry    7
");
}

// ===== Hit testing =====

#[test]
fn header_hits() {
    let fixture = Fixture::selectable(24, 6, fruit());
    let hit = |x, y| hit_test(&fixture.grid, &fixture.areas, x, y);
    assert_eq!(hit(1, 0), GridHit::SelectAll);
    assert_eq!(hit(5, 0), GridHit::Header(0));
    assert_eq!(hit(13, 0), GridHit::ColumnEdge(0));
    assert_eq!(hit(14, 0), GridHit::Header(1));
    assert_eq!(hit(23, 0), GridHit::ColumnEdge(1));
}

#[test]
fn body_hits() {
    let fixture = Fixture::selectable(24, 6, fruit());
    let hit = |x, y| hit_test(&fixture.grid, &fixture.areas, x, y);
    assert_eq!(hit(1, 2), GridHit::Checkbox(1));
    assert_eq!(
        hit(15, 1),
        GridHit::Cell {
            row: 0,
            column: Some(1)
        }
    );
    assert_eq!(hit(5, 4), GridHit::Outside);
    assert_eq!(hit(5, 5), GridHit::Outside);
}

#[test]
fn body_hits_follow_scroll() {
    let rows: Vec<Row> = (0..10).map(|i| json!({"id": i, "name": "x"})).collect();
    let mut fixture = Fixture::selectable(24, 6, rows);
    fixture.grid.scroll(5, 0);
    assert_eq!(
        hit_test(&fixture.grid, &fixture.areas, 1, 1),
        GridHit::Checkbox(5)
    );
}
