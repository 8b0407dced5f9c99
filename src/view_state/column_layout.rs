//! Column width layout.
//!
//! Distributes the host width across the visible columns in two phases:
//!
//! 1. **Seed** every column with an even share of the host width, then apply
//!    its constraint: fixed columns lock to their width, bounded columns clamp
//!    to `min`/`max`, and no column ends up narrower than the width its
//!    rendered content needs (its measured minimum).
//! 2. **Redistribute** whatever the locked and clamped columns leave over
//!    evenly across the remaining flexible columns. Giving a column the new
//!    share can push it across one of its bounds, which changes the set of
//!    flexible columns, so the pass repeats until that set stops changing.
//!
//! The repetition is bounded by the column count.

use crate::model::column::{ColumnDescriptor, ColumnWidth};
use tracing::{debug, trace};

/// Resolved width of one visible column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnWidthRecord {
    /// Width in pixels.
    pub value: u32,
    /// Position among the visible columns.
    pub index: usize,
    /// Locked to a fixed width; never redistributed.
    pub limit: bool,
    /// Currently held at its lower bound.
    pub min: bool,
    /// Currently held at its upper bound.
    pub max: bool,
}

impl ColumnWidthRecord {
    /// True when the column takes part in redistribution.
    pub fn is_flexible(&self) -> bool {
        !self.limit && !self.min && !self.max
    }
}

/// Seed a single column with `value`, then apply its constraint.
///
/// `measured_min` is the width the rendered content needs; a missing
/// measurement counts as zero. It raises bounded columns with their own
/// `min` too, so no non-fixed column is ever narrower than its content.
fn seed(width: ColumnWidth, index: usize, value: u32, measured_min: u32) -> ColumnWidthRecord {
    let mut record = ColumnWidthRecord {
        value,
        index,
        limit: false,
        min: false,
        max: false,
    };

    match width {
        ColumnWidth::Fixed(px) => {
            record.value = px;
            record.limit = true;
            return record;
        }
        ColumnWidth::Bounded { min, max } => {
            if let Some(min) = min.filter(|&min| min >= record.value) {
                record.value = min;
                record.min = true;
            } else if let Some(max) = max.filter(|&max| max <= record.value) {
                record.value = max;
                record.max = true;
            }
        }
        ColumnWidth::Flexible => {}
    }

    if record.value < measured_min {
        record.value = measured_min;
        record.min = true;
        record.max = false;
    }
    record
}

/// Compute the widths of the visible (non-hidden) columns.
///
/// `measured_min_widths` is indexed like the visible columns; missing entries
/// are treated as "not measured yet" and impose no minimum.
///
/// # Guarantees
/// - one record per visible column, in column order
/// - the sum of widths does not exceed `host_width` unless the fixed and
///   minimum widths alone already fill it
/// - every non-fixed column is at least as wide as its measured minimum
///
/// # Examples
///
/// ```
/// use gridcore::model::{ColumnDescriptor, ColumnWidth};
/// use gridcore::view_state::column_layout::compute_widths;
///
/// let columns = vec![
///     ColumnDescriptor::new("a", "A").with_width(ColumnWidth::Fixed(100)),
///     ColumnDescriptor::new("b", "B"),
///     ColumnDescriptor::new("c", "C"),
/// ];
/// let widths: Vec<u32> = compute_widths(400, &columns, &[])
///     .iter()
///     .map(|w| w.value)
///     .collect();
/// assert_eq!(widths, vec![100, 150, 150]);
/// ```
pub fn compute_widths(
    host_width: u32,
    columns: &[ColumnDescriptor],
    measured_min_widths: &[u32],
) -> Vec<ColumnWidthRecord> {
    let visible: Vec<&ColumnDescriptor> = columns.iter().filter(|c| !c.hidden).collect();
    if visible.is_empty() {
        return Vec::new();
    }

    let measured = |i: usize| measured_min_widths.get(i).copied().unwrap_or(0);

    let base = host_width / visible.len() as u32;
    let mut widths: Vec<ColumnWidthRecord> = visible
        .iter()
        .enumerate()
        .map(|(i, column)| seed(column.width, i, base, measured(i)))
        .collect();

    for pass in 0..=visible.len() {
        let mut fixed_total: u64 = 0;
        let mut flexible = 0usize;
        for record in &widths {
            if record.is_flexible() {
                flexible += 1;
            } else {
                fixed_total += u64::from(record.value);
            }
        }

        let spare = u64::from(host_width).saturating_sub(fixed_total);
        if flexible == 0 || spare == 0 {
            trace!(pass, flexible, spare, "no space left to redistribute");
            break;
        }

        let share = (spare / flexible as u64) as u32;
        for (i, column) in visible.iter().enumerate() {
            if !widths[i].limit {
                widths[i] = seed(column.width, i, share, measured(i));
            }
        }

        let still_flexible = widths.iter().filter(|w| w.is_flexible()).count();
        trace!(pass, share, flexible, still_flexible, "redistributed column widths");
        if still_flexible == flexible {
            break;
        }
    }

    debug!(
        host_width,
        columns = widths.len(),
        total = widths.iter().map(|w| u64::from(w.value)).sum::<u64>(),
        "computed column widths"
    );
    widths
}

/// Width a column takes after its right edge is dragged by `delta` pixels.
///
/// Never narrower than the column's measured minimum.
pub fn dragged_width(current: u32, delta: i64, measured_min: u32) -> u32 {
    let proposed = (i64::from(current) + delta).clamp(0, i64::from(u32::MAX)) as u32;
    proposed.max(measured_min)
}

#[cfg(test)]
#[path = "column_layout_tests.rs"]
mod tests;
