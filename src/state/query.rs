//! Row query pipeline: filter, then sort, then page.
//!
//! Runs in the caller, before rows reach the grid. The grid itself only
//! windows and selects whatever data set it is handed.

use crate::model::row::display_value;
use crate::model::{ColumnDescriptor, Row, RowMatcher, SortOrder};
use crate::state::sort::SortComparator;
use tracing::debug;

/// Keep rows where any searchable top-level field contains `term`,
/// case-insensitively.
///
/// Fields belonging to columns that are excluded from filtering (see
/// [`ColumnDescriptor::is_searchable`]) are skipped. An empty term keeps every
/// row.
pub fn filter_rows(rows: &[Row], term: &str, columns: &[ColumnDescriptor]) -> Vec<Row> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return rows.to_vec();
    }

    let excluded: Vec<&str> = columns
        .iter()
        .filter(|c| !c.is_searchable())
        .map(|c| c.name.as_str())
        .collect();

    rows.iter()
        .filter(|row| {
            row.as_object().is_some_and(|fields| {
                fields
                    .iter()
                    .filter(|(key, _)| !excluded.contains(&key.as_str()))
                    .any(|(_, value)| display_value(Some(value)).to_lowercase().contains(&needle))
            })
        })
        .cloned()
        .collect()
}

/// Stable sort by `sort_by`, keeping `pinned` rows first.
///
/// The value is looked up the way the matching column in `columns` resolves
/// it; a name without a column is read as a dotted path.
pub fn sort_rows(
    rows: &mut [Row],
    sort_by: &str,
    order: SortOrder,
    columns: &[ColumnDescriptor],
    pinned: &[Row],
    matcher: &dyn RowMatcher,
) {
    let nested = columns
        .iter()
        .find(|c| c.name == sort_by)
        .map_or(true, |c| c.nested);
    SortComparator::new(sort_by, order, matcher)
        .with_nested(nested)
        .with_pinned(pinned)
        .sort(rows);
}

/// Rows of 1-based `page` when pages hold `page_size` rows.
///
/// Page 0 is treated as page 1; a page past the end is empty.
pub fn page_rows(rows: &[Row], page: usize, page_size: usize) -> Vec<Row> {
    let start = page.max(1).saturating_sub(1).saturating_mul(page_size);
    rows.iter().skip(start).take(page_size).cloned().collect()
}

/// Filter, sort and page settings applied to a row set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowQuery {
    /// Free-text filter; empty keeps every row.
    pub filter: String,
    /// Field to sort by; `None` keeps the input order.
    pub sort_by: Option<String>,
    /// Sort direction.
    pub sort_order: SortOrder,
    /// 1-based page number.
    pub page: usize,
    /// Rows per page; `None` disables paging.
    pub page_size: Option<usize>,
}

/// Output of [`RowQuery::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Rows of the requested page.
    pub rows: Vec<Row>,
    /// Row count after filtering, before paging.
    pub filtered_total: usize,
}

impl RowQuery {
    /// Run the pipeline over `rows`.
    pub fn apply(
        &self,
        rows: &[Row],
        columns: &[ColumnDescriptor],
        pinned: &[Row],
        matcher: &dyn RowMatcher,
    ) -> QueryResult {
        let mut filtered = filter_rows(rows, &self.filter, columns);
        let filtered_total = filtered.len();

        if let Some(sort_by) = self.sort_by.as_deref().filter(|s| !s.is_empty()) {
            sort_rows(
                &mut filtered,
                sort_by,
                self.sort_order,
                columns,
                pinned,
                matcher,
            );
        }

        let rows = match self.page_size {
            Some(size) => page_rows(&filtered, self.page, size),
            None => filtered,
        };

        debug!(
            rows = rows.len(),
            filtered_total,
            page = self.page,
            "applied row query"
        );
        QueryResult {
            rows,
            filtered_total,
        }
    }
}
