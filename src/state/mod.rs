//! Grid state machines.
//!
//! Selection, sorting and the row query pipeline are plain data
//! transformations testable without a terminal. [`GridController`] ties them
//! to the window and layout engines.

pub mod controller;
pub mod query;
pub mod scheduler;
pub mod selection;
pub mod sort;

pub use controller::{ClickTarget, GridController, RowKey};
pub use query::{filter_rows, page_rows, sort_rows, QueryResult, RowQuery};
pub use scheduler::{Scheduler, Task};
pub use selection::SelectionModel;
pub use sort::{SortComparator, SortKey};
