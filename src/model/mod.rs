//! Domain model types (pure).
//!
//! Rows, column descriptors, grid events and the error taxonomy.

pub mod column;
pub mod error;
pub mod events;
pub mod key_action;
pub mod row;

// Re-export for convenience
pub use column::{columns_from_data, ColumnDescriptor, ColumnWidth};
pub use error::{AppError, GridError, InputError};
pub use events::{GridEvent, SortOrder};
pub use key_action::KeyAction;
pub use row::{IdMatcher, Row, RowMatcher, SharedMatcher};
