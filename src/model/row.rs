//! Row records and row identity.
//!
//! Rows are opaque key-value records. The engine never mutates them; it only
//! looks fields up for rendering, filtering and sorting, and decides row
//! identity through a [`RowMatcher`].

use serde_json::Value;
use std::sync::Arc;

/// A single row record.
pub type Row = Value;

/// Look up a (possibly dotted) field path in a row.
///
/// `"author.name"` descends into the `author` object. The first dot splits the
/// path, so keys are resolved left to right. Returns `None` when any segment is
/// missing or a non-object is reached before the path ends.
///
/// # Examples
///
/// ```
/// use gridcore::model::row::field;
/// use serde_json::json;
///
/// let row = json!({"id": 1, "author": {"name": "Ada"}});
/// assert_eq!(field(&row, "author.name"), Some(&json!("Ada")));
/// assert_eq!(field(&row, "author.email"), None);
/// ```
pub fn field<'a>(row: &'a Row, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    match path.split_once('.') {
        Some((head, rest)) => row.get(head).and_then(|inner| field(inner, rest)),
        None => row.get(path),
    }
}

/// Render a field value as display text.
///
/// Strings render without quotes, `null` and missing values render empty,
/// everything else uses its JSON form.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Decides whether two rows denote the same record.
///
/// The selection model and the sort comparator use this to test membership
/// of a row in the selection or pinned sets.
pub trait RowMatcher {
    /// Returns true when `row` and `candidate` identify the same record.
    fn same_row(&self, row: &Row, candidate: &Row) -> bool;
}

impl<F> RowMatcher for F
where
    F: Fn(&Row, &Row) -> bool,
{
    fn same_row(&self, row: &Row, candidate: &Row) -> bool {
        self(row, candidate)
    }
}

/// Matcher shared between the grid configuration and the engines.
pub type SharedMatcher = Arc<dyn RowMatcher + Send + Sync>;

/// Default matcher: rows are the same when their `id` fields are equal.
///
/// Rows without an `id` on either side fall back to whole-record equality, so
/// id-less records are never all considered the same row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdMatcher;

impl RowMatcher for IdMatcher {
    fn same_row(&self, row: &Row, candidate: &Row) -> bool {
        match (row.get("id"), candidate.get("id")) {
            (Some(a), Some(b)) => a == b,
            _ => row == candidate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_resolves_top_level_key() {
        let row = json!({"name": "Intro"});
        assert_eq!(field(&row, "name"), Some(&json!("Intro")));
    }

    #[test]
    fn field_resolves_deeply_nested_path() {
        let row = json!({"a": {"b": {"c": 3}}});
        assert_eq!(field(&row, "a.b.c"), Some(&json!(3)));
    }

    #[test]
    fn field_returns_none_through_non_object() {
        let row = json!({"a": 5});
        assert_eq!(field(&row, "a.b"), None);
    }

    #[test]
    fn field_with_empty_path_is_none() {
        let row = json!({"": 1});
        assert_eq!(field(&row, ""), None);
    }

    #[test]
    fn display_value_strips_string_quotes() {
        assert_eq!(display_value(Some(&json!("text"))), "text");
        assert_eq!(display_value(Some(&json!(42))), "42");
        assert_eq!(display_value(Some(&json!(true))), "true");
        assert_eq!(display_value(Some(&Value::Null)), "");
        assert_eq!(display_value(None), "");
    }

    #[test]
    fn id_matcher_compares_ids() {
        let m = IdMatcher;
        assert!(m.same_row(&json!({"id": 1, "v": "a"}), &json!({"id": 1, "v": "b"})));
        assert!(!m.same_row(&json!({"id": 1}), &json!({"id": 2})));
    }

    #[test]
    fn id_matcher_without_ids_uses_record_equality() {
        let m = IdMatcher;
        assert!(m.same_row(&json!({"v": "a"}), &json!({"v": "a"})));
        assert!(!m.same_row(&json!({"v": "a"}), &json!({"v": "b"})));
    }

    #[test]
    fn closures_are_matchers() {
        let by_code = |a: &Row, b: &Row| a.get("code") == b.get("code");
        assert!(by_code.same_row(&json!({"code": "x"}), &json!({"code": "x", "id": 9})));
    }
}
