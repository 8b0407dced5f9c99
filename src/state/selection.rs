//! Row selection model.
//!
//! Tracks which rows of the full (unwindowed) data set are selected, the
//! select-all checkbox state, and the anchor of an open shift-range sequence.
//! Rows are compared through the configured [`RowMatcher`], never by index,
//! so a selection survives re-sorting.
//!
//! Every membership change queues a [`GridEvent`]; the controller drains the
//! queue with [`SelectionModel::take_events`] and forwards it to the caller.

use crate::model::{GridEvent, Row, SharedMatcher};
use tracing::{debug, trace};

// ===== SelectionModel =====

/// Selection set plus shift-range state machine.
///
/// # Invariants
/// - in single-select mode at most one row is selected
/// - `all_selected` implies the data set is non-empty and every row matches a
///   selected entry
/// - `indeterminate` is true exactly when some but not all rows are selected
pub struct SelectionModel {
    matcher: SharedMatcher,
    multiple: bool,
    selected: Vec<Row>,
    /// Index of the previous click, shift or not.
    last_selected: Option<usize>,
    /// Index of the last non-shift click; the shift-range anchor.
    first_selected: Option<usize>,
    /// Membership the anchor row received when it was clicked.
    first_checkbox_value: bool,
    /// A shift-click already extended the current anchor.
    shift_previously_pressed: bool,
    all_selected: bool,
    indeterminate: bool,
    events: Vec<GridEvent>,
}

impl std::fmt::Debug for SelectionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionModel")
            .field("multiple", &self.multiple)
            .field("selected", &self.selected.len())
            .field("last_selected", &self.last_selected)
            .field("first_selected", &self.first_selected)
            .field("all_selected", &self.all_selected)
            .field("indeterminate", &self.indeterminate)
            .finish_non_exhaustive()
    }
}

/// Index comparisons in the range rules treat "no click yet" as -1.
fn signed(index: Option<usize>) -> i64 {
    index.map_or(-1, |i| i as i64)
}

impl SelectionModel {
    /// Empty selection.
    pub fn new(matcher: SharedMatcher, multiple: bool) -> Self {
        Self {
            matcher,
            multiple,
            selected: Vec::new(),
            last_selected: None,
            first_selected: None,
            first_checkbox_value: false,
            shift_previously_pressed: false,
            all_selected: false,
            indeterminate: false,
            events: Vec::new(),
        }
    }

    // ===== Queries =====

    /// Whether multiple rows may be selected.
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Selected rows, in selection order.
    pub fn selected(&self) -> &[Row] {
        &self.selected
    }

    /// Whether `row` matches a selected entry.
    pub fn is_selected(&self, row: &Row) -> bool {
        self.position(row).is_some()
    }

    /// Every row of the last seen data set is selected.
    pub fn all_selected(&self) -> bool {
        self.all_selected
    }

    /// Some, but not all, rows are selected.
    pub fn indeterminate(&self) -> bool {
        self.indeterminate
    }

    /// Drain queued selection events.
    pub fn take_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    fn position(&self, row: &Row) -> Option<usize> {
        self.selected
            .iter()
            .position(|candidate| self.matcher.same_row(row, candidate))
    }

    // ===== Single-row toggling =====

    /// Flip membership of `data[index]`.
    ///
    /// Returns the new membership, or `None` when `index` is out of range.
    /// Selecting in single-select mode first clears the previous selection.
    pub fn toggle(&mut self, data: &[Row], index: usize) -> Option<bool> {
        let row = data.get(index)?;

        let (row, selected) = match self.position(row) {
            Some(pos) => (self.selected.remove(pos), false),
            None => {
                if !self.multiple {
                    self.selected.clear();
                }
                self.selected.push(row.clone());
                (row.clone(), true)
            }
        };
        trace!(index, selected, "toggled row");

        self.recalculate(data);
        self.events.push(GridEvent::RowSelect {
            row,
            index,
            selected,
        });
        Some(selected)
    }

    // ===== Click handling =====

    /// Handle a click on the selection control of row `index`.
    ///
    /// A plain click toggles the row and makes it the anchor of a new range.
    /// A shift-click (multi-select only, after at least one earlier click)
    /// toggles the rows between the previous click and this one so that they
    /// follow the anchor's membership; clicking back towards the anchor undoes
    /// the part of the range left behind.
    pub fn click(&mut self, data: &[Row], index: usize, shift: bool) {
        if self.multiple && shift && self.last_selected.is_some() {
            self.extend_range(data, index);
            self.shift_previously_pressed = true;
        } else if !shift {
            self.first_checkbox_value = self.toggle(data, index).unwrap_or(false);
            self.shift_previously_pressed = false;
            self.first_selected = Some(index);
        }
        self.last_selected = Some(index);
    }

    fn extend_range(&mut self, data: &[Row], index: usize) {
        let current = index as i64;
        let last = signed(self.last_selected);
        let first = signed(self.first_selected);

        let mut low = current.min(last);
        let mut high = current.max(last);

        debug!(first, last, current, "extending shift range");

        if (first >= current && last > first) || (first <= current && last < first) {
            // clicked behind the anchor: flip everything in between but the anchor
            for i in low..=high {
                if i != first {
                    self.toggle_signed(data, i);
                }
            }
        } else if first != current {
            if first > current {
                high -= 1;
            } else {
                low += 1;
            }
            let undo = self.shift_previously_pressed
                && ((current >= first && current <= last) || (current <= first && current >= last));
            for i in low..=high {
                let Some(row) = usize::try_from(i).ok().and_then(|i| data.get(i)) else {
                    continue;
                };
                if self.first_checkbox_value != self.is_selected(row) || undo {
                    self.toggle_signed(data, i);
                }
            }
        }
    }

    fn toggle_signed(&mut self, data: &[Row], index: i64) {
        if let Ok(index) = usize::try_from(index) {
            self.toggle(data, index);
        }
    }

    // ===== Bulk operations =====

    /// Select or clear every row of `data`.
    ///
    /// Returns the rows whose membership actually changed. Selecting all is
    /// ignored in single-select mode.
    pub fn select_all(&mut self, data: &[Row], checked: bool) -> Vec<Row> {
        if checked && !self.multiple {
            debug!("select all ignored in single-select mode");
            return Vec::new();
        }

        let mut toggled = Vec::new();
        for row in data {
            match (checked, self.position(row)) {
                (true, None) => {
                    self.selected.push(row.clone());
                    toggled.push(row.clone());
                }
                (false, Some(pos)) => {
                    self.selected.remove(pos);
                    toggled.push(row.clone());
                }
                _ => {}
            }
        }

        self.recalculate(data);
        debug!(checked, toggled = toggled.len(), "select all");
        self.events.push(GridEvent::SelectAll {
            rows: toggled.clone(),
            selected: checked,
        });
        toggled
    }

    /// Select the rows whose `id` field appears in `ids`.
    ///
    /// Rows already selected are left alone. Emits one `RowSelect` per newly
    /// selected row.
    pub fn select_ids(&mut self, data: &[Row], ids: &[serde_json::Value]) {
        for (index, row) in data.iter().enumerate() {
            let wanted = row.get("id").is_some_and(|id| ids.contains(id));
            if wanted && !self.is_selected(row) {
                self.toggle(data, index);
            }
        }
    }

    /// Drop selected entries that no longer match any row of `data`.
    ///
    /// Called when the data set is replaced. The shift anchor refers to
    /// indices of the old data set, so it is reset too.
    pub fn reconcile(&mut self, data: &[Row]) {
        let before = self.selected.len();
        let matcher = &self.matcher;
        self.selected
            .retain(|entry| data.iter().any(|row| matcher.same_row(row, entry)));
        if self.selected.len() != before {
            debug!(
                dropped = before - self.selected.len(),
                "dropped stale selection entries"
            );
        }

        self.last_selected = None;
        self.first_selected = None;
        self.first_checkbox_value = false;
        self.shift_previously_pressed = false;
        self.recalculate(data);
    }

    /// Empty the selection without emitting events.
    pub fn clear(&mut self, data: &[Row]) {
        self.selected.clear();
        self.recalculate(data);
    }

    /// Recompute the select-all checkbox state for `data`.
    pub fn recalculate(&mut self, data: &[Row]) {
        let any = data.iter().any(|row| self.is_selected(row));
        self.all_selected = !data.is_empty() && data.iter().all(|row| self.is_selected(row));
        self.indeterminate = any && !self.all_selected;
    }
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod tests;
