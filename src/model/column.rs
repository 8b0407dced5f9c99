//! Column descriptors.
//!
//! A descriptor names the row field a column shows, its header label and the
//! width constraint the layout engine must honour.

use crate::model::row::{self, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Width constraint of a column.
///
/// Serialized as a bare number (fixed pixels), a `{min, max}` table (bounded),
/// or omitted (flexible).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawWidth", into = "RawWidth")]
pub enum ColumnWidth {
    /// Receives an even share of the spare horizontal space.
    #[default]
    Flexible,
    /// Absolute width in pixels; never redistributed.
    Fixed(u32),
    /// Flexible width kept within optional bounds.
    Bounded {
        /// Lower bound in pixels.
        min: Option<u32>,
        /// Upper bound in pixels.
        max: Option<u32>,
    },
}

impl ColumnWidth {
    /// Returns true for [`ColumnWidth::Fixed`].
    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum RawWidth {
    Fixed(u32),
    Bounded {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<u32>,
    },
}

impl From<RawWidth> for ColumnWidth {
    fn from(raw: RawWidth) -> Self {
        match raw {
            RawWidth::Fixed(px) => Self::Fixed(px),
            RawWidth::Bounded {
                min: None,
                max: None,
            } => Self::Flexible,
            RawWidth::Bounded { min, max } => Self::Bounded { min, max },
        }
    }
}

impl From<ColumnWidth> for RawWidth {
    fn from(width: ColumnWidth) -> Self {
        match width {
            ColumnWidth::Fixed(px) => Self::Fixed(px),
            ColumnWidth::Flexible => Self::Bounded {
                min: None,
                max: None,
            },
            ColumnWidth::Bounded { min, max } => Self::Bounded { min, max },
        }
    }
}

/// Describes one grid column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Field name, possibly a dotted path into nested records.
    pub name: String,
    /// Header text.
    pub label: String,
    /// Whether clicking the header sorts by this column.
    #[serde(default)]
    pub sortable: bool,
    /// Explicit filter participation; `None` means "unless hidden".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<bool>,
    /// Hidden columns take no width and are not rendered.
    #[serde(default)]
    pub hidden: bool,
    /// When false, `name` is looked up literally instead of as a dotted path.
    #[serde(default = "default_nested")]
    pub nested: bool,
    /// Width constraint.
    #[serde(default)]
    pub width: ColumnWidth,
}

fn default_nested() -> bool {
    true
}

impl ColumnDescriptor {
    /// Create a flexible, visible, non-sortable column.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            sortable: false,
            filter: None,
            hidden: false,
            nested: true,
            width: ColumnWidth::Flexible,
        }
    }

    /// Set the width constraint.
    pub fn with_width(mut self, width: ColumnWidth) -> Self {
        self.width = width;
        self
    }

    /// Mark the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Mark the column hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Set explicit filter participation.
    pub fn with_filter(mut self, filter: bool) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Whether free-text filtering searches this column.
    ///
    /// Excluded when `filter` is explicitly false, or when the column is hidden
    /// and `filter` was left unset.
    pub fn is_searchable(&self) -> bool {
        match self.filter {
            Some(filter) => filter,
            None => !self.hidden,
        }
    }

    /// Resolve this column's value in a row.
    pub fn value<'a>(&self, row: &'a Row) -> Option<&'a Value> {
        if self.nested {
            row::field(row, &self.name)
        } else {
            row.get(self.name.as_str())
        }
    }

    /// Resolve this column's value as display text; unresolved renders empty.
    pub fn cell_text(&self, row: &Row) -> String {
        row::display_value(self.value(row))
    }
}

/// Derive columns from the keys of the first row.
///
/// Used when the caller supplies no column set. Returns an empty set for empty
/// data or a first row that is not an object.
pub fn columns_from_data(data: &[Row]) -> Vec<ColumnDescriptor> {
    let Some(Value::Object(first)) = data.first() else {
        return Vec::new();
    };
    first
        .keys()
        .map(|key| ColumnDescriptor::new(key.clone(), key.clone()))
        .collect()
}
