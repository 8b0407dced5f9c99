//! Interactive sort comparator.
//!
//! Field values in a grid are heterogeneous: the same column may hold
//! timestamps formatted for display, numbers, numeric strings, free text or
//! nothing at all. Each value is classified first and values of different
//! classes order by class:
//!
//! ```text
//! Date  <  Empty  <  Number  <  Text
//! ```
//!
//! Within a class, dates compare chronologically, numbers numerically and
//! text lexicographically. The classification makes the comparator a total
//! order, which `slice::sort_by` requires.

use crate::model::row::field;
use crate::model::{Row, RowMatcher, SortOrder};
use chrono::NaiveDateTime;
use serde_json::Value;
use std::cmp::Ordering;

/// Display format of sortable timestamps: `HH:mm DD.MM.YYYY`.
pub const DATE_FORMAT: &str = "%H:%M %d.%m.%Y";

// ===== Value classification =====

/// Sort key of a single field value.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    /// A strict `HH:mm DD.MM.YYYY` timestamp.
    Date(NaiveDateTime),
    /// Missing, `null`, `""` or `false`.
    Empty,
    /// A finite number, or a string starting with one.
    Number(f64),
    /// Anything else.
    Text(String),
}

impl SortKey {
    /// Classify a field value.
    pub fn classify(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Self::Empty,
            Some(Value::String(s)) if s.is_empty() => Self::Empty,
            Some(Value::String(s)) => {
                if let Some(date) = parse_strict_date(s) {
                    Self::Date(date)
                } else if let Some(n) = leading_number(s) {
                    Self::Number(n)
                } else {
                    Self::Text(s.clone())
                }
            }
            Some(Value::Number(n)) => match n.as_f64() {
                Some(f) if f.is_finite() => Self::Number(f),
                _ => Self::Text(n.to_string()),
            },
            Some(other) => Self::Text(other.to_string()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Date(_) => 0,
            Self::Empty => 1,
            Self::Number(_) => 2,
            Self::Text(_) => 3,
        }
    }

    /// Total order over keys.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Parse `HH:mm DD.MM.YYYY` with exactly two-digit fields and a four-digit year.
pub fn parse_strict_date(s: &str) -> Option<NaiveDateTime> {
    let bytes = s.as_bytes();
    if bytes.len() != 16 {
        return None;
    }
    let separators_ok = bytes[2] == b':' && bytes[5] == b' ' && bytes[8] == b'.' && bytes[11] == b'.';
    let digits_ok = bytes
        .iter()
        .enumerate()
        .filter(|(i, _)| ![2, 5, 8, 11].contains(i))
        .all(|(_, b)| b.is_ascii_digit());
    if !separators_ok || !digits_ok {
        return None;
    }
    NaiveDateTime::parse_from_str(s, DATE_FORMAT).ok()
}

/// Finite number at the start of `s`, ignoring leading whitespace.
///
/// `"12px"` yields 12 and `"3.5e2 units"` yields 350; `"abc"` and `".e1"`
/// yield nothing.
pub fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

// ===== Comparator =====

/// Compares rows by one field for interactive sorting.
///
/// Rows matching an entry of `pinned` sort before all other rows in both
/// directions; the sort order only reverses the value comparison.
pub struct SortComparator<'a> {
    field: &'a str,
    nested: bool,
    order: SortOrder,
    pinned: &'a [Row],
    matcher: &'a dyn RowMatcher,
}

impl<'a> SortComparator<'a> {
    /// Comparator over `field` with no pinned rows.
    pub fn new(field: &'a str, order: SortOrder, matcher: &'a dyn RowMatcher) -> Self {
        Self {
            field,
            nested: true,
            order,
            pinned: &[],
            matcher,
        }
    }

    /// Resolve `field` as a dotted path (the default) or as one literal key.
    pub fn with_nested(mut self, nested: bool) -> Self {
        self.nested = nested;
        self
    }

    /// Keep `pinned` rows at the top.
    pub fn with_pinned(mut self, pinned: &'a [Row]) -> Self {
        self.pinned = pinned;
        self
    }

    fn value<'r>(&self, row: &'r Row) -> Option<&'r Value> {
        if self.nested {
            field(row, self.field)
        } else {
            row.get(self.field)
        }
    }

    fn is_pinned(&self, row: &Row) -> bool {
        self.pinned
            .iter()
            .any(|candidate| self.matcher.same_row(row, candidate))
    }

    /// Compare two rows.
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        if !self.pinned.is_empty() {
            match (self.is_pinned(a), self.is_pinned(b)) {
                (true, true) => return Ordering::Equal,
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                (false, false) => {}
            }
        }

        let ordering =
            SortKey::classify(self.value(a)).compare(&SortKey::classify(self.value(b)));
        match self.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }

    /// Stable sort of `rows` in place.
    pub fn sort(&self, rows: &mut [Row]) {
        rows.sort_by(|a, b| self.compare(a, b));
    }
}
