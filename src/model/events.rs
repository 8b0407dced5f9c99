//! Events the grid emits to its caller, and the sort order they carry.

use crate::model::error::GridError;
use crate::model::row::Row;
use std::fmt;
use std::str::FromStr;

/// Direction of the active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    /// `ASC`
    #[default]
    Ascending,
    /// `DESC`
    Descending,
}

impl SortOrder {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Wire form: `ASC` or `DESC`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = GridError;

    /// Parse `ASC` / `DESC` case-insensitively; an empty string means ascending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match upper.as_str() {
            "" | "ASC" => Ok(Self::Ascending),
            "DESC" => Ok(Self::Descending),
            _ => Err(GridError::invalid(
                "sort_order",
                format!("must be empty, ASC or DESC (got {s:?})"),
            )),
        }
    }
}

/// Notifications sent from the grid to its caller.
///
/// Delivered over an `std::sync::mpsc` channel handed to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// A sortable header was activated.
    SortChange {
        /// Column name now sorted by.
        name: String,
        /// Direction now in effect.
        order: SortOrder,
    },
    /// A single row changed selection state.
    RowSelect {
        /// The row whose membership changed.
        row: Row,
        /// Its index in the full data set.
        index: usize,
        /// Membership after the change.
        selected: bool,
    },
    /// The select-all checkbox changed; `rows` holds only the rows actually toggled.
    SelectAll {
        /// Rows whose membership changed.
        rows: Vec<Row>,
        /// Membership after the change.
        selected: bool,
    },
    /// A row was clicked.
    RowClick {
        /// Clicked row.
        row: Row,
        /// Its index in the full data set.
        index: usize,
    },
    /// A row was double-clicked.
    RowDoubleClick {
        /// Clicked row.
        row: Row,
        /// Its index in the full data set.
        index: usize,
    },
}
