//! Row and column input for the viewer.
//!
//! Rows come from a JSON array of records, either a file or piped stdin
//! (`-`). Column sets come from a TOML file of `[[columns]]` tables.

use crate::model::error::InputError;
use crate::model::{ColumnDescriptor, Row};
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

/// Path argument that selects stdin instead of a file.
pub const STDIN_PATH: &str = "-";

/// Load rows from `path`, or from stdin when `path` is `-`.
///
/// # Errors
///
/// `InputError::FileNotFound` for a missing file, `InputError::Io` for read
/// failures and `InputError::InvalidRows` when the content is not a JSON array.
pub fn load_rows(path: &Path) -> Result<Vec<Row>, InputError> {
    if path == Path::new(STDIN_PATH) {
        return load_rows_from_reader(std::io::stdin().lock(), path);
    }
    if !path.exists() {
        return Err(InputError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path)?;
    load_rows_from_reader(std::io::BufReader::new(file), path)
}

/// Decode a JSON array of rows from `reader`.
///
/// `origin` only labels errors.
///
/// # Errors
///
/// `InputError::Io` when reading fails, `InputError::InvalidRows` when the
/// content is not a JSON array.
pub fn load_rows_from_reader(mut reader: impl Read, origin: &Path) -> Result<Vec<Row>, InputError> {
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;

    let invalid = |message: String| InputError::InvalidRows {
        path: origin.to_path_buf(),
        message,
    };

    let rows = match serde_json::from_str::<Value>(&contents).map_err(|e| invalid(e.to_string()))? {
        Value::Array(rows) => rows,
        other => {
            return Err(invalid(format!(
                "expected an array of records, found {}",
                kind(&other)
            )))
        }
    };

    info!(rows = rows.len(), path = %origin.display(), "loaded rows");
    Ok(rows)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ColumnFile {
    #[serde(default)]
    columns: Vec<ColumnDescriptor>,
}

/// Load a column set from a TOML file of `[[columns]]` tables.
///
/// # Errors
///
/// `InputError::FileNotFound`, `InputError::Io`, or
/// `InputError::InvalidColumns` for malformed TOML.
pub fn load_columns(path: impl Into<PathBuf>) -> Result<Vec<ColumnDescriptor>, InputError> {
    let path = path.into();
    if !path.exists() {
        return Err(InputError::FileNotFound { path });
    }
    let contents = std::fs::read_to_string(&path)?;
    let file: ColumnFile = toml::from_str(&contents).map_err(|e| InputError::InvalidColumns {
        path: path.clone(),
        message: e.to_string(),
    })?;
    info!(columns = file.columns.len(), path = %path.display(), "loaded columns");
    Ok(file.columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnWidth;
    use serde_json::json;
    use std::fs;

    #[test]
    fn rows_decode_from_json_array() {
        let data = br#"[{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]"#;
        let rows = load_rows_from_reader(&data[..], Path::new("rows.json")).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], json!({"id": 2, "name": "b"}));
    }

    #[test]
    fn non_array_rows_are_rejected() {
        let err = load_rows_from_reader(&br#"{"id": 1}"#[..], Path::new("rows.json")).unwrap_err();
        match err {
            InputError::InvalidRows { path, message } => {
                assert_eq!(path, PathBuf::from("rows.json"));
                assert!(message.contains("an object"), "got {message}");
            }
            other => panic!("expected InvalidRows, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = load_rows_from_reader(&b"[{"[..], Path::new("rows.json")).unwrap_err();
        assert!(matches!(err, InputError::InvalidRows { .. }));
    }

    #[test]
    fn missing_rows_file_is_reported() {
        let err = load_rows(Path::new("/nonexistent/gridcore/rows.json")).unwrap_err();
        assert!(matches!(err, InputError::FileNotFound { .. }));
    }

    #[test]
    fn rows_file_round_trip_through_disk() {
        let path = std::env::temp_dir().join("gridcore_test_rows.json");
        fs::write(&path, r#"[{"id": "x"}]"#).unwrap();
        let rows = load_rows(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(rows, vec![json!({"id": "x"})]);
    }

    #[test]
    fn columns_load_from_toml() {
        let path = std::env::temp_dir().join("gridcore_test_columns.toml");
        fs::write(
            &path,
            r#"
[[columns]]
name = "name"
label = "Name"
sortable = true
width = 200

[[columns]]
name = "secret"
label = "Secret"
hidden = true
"#,
        )
        .unwrap();
        let columns = load_columns(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(columns.len(), 2);
        assert!(columns[0].sortable);
        assert_eq!(columns[0].width, ColumnWidth::Fixed(200));
        assert!(columns[1].hidden);
    }

    #[test]
    fn bad_column_toml_is_rejected() {
        let path = std::env::temp_dir().join("gridcore_test_bad_columns.toml");
        fs::write(&path, "[[columns]]\nlabel = 3\n").unwrap();
        let err = load_columns(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, InputError::InvalidColumns { .. }));
    }
}
