//! Configuration module.
//!
//! [`GridConfig`] is the immutable description of one grid: its columns,
//! which interactions are enabled and how rows are identified. It is
//! validated once, when built. Engine tunables that users may want to adjust
//! without recompiling live in [`loader::GridSettings`].

pub mod keybindings;
pub mod loader;

pub use keybindings::KeyBindings;
pub use loader::{
    apply_cli_overrides, apply_env_overrides, load_config_with_precedence, merge_config,
    merge_config_onto, ConfigError, ConfigFile, GridSettings,
};

use crate::model::{ColumnDescriptor, GridError, IdMatcher, SharedMatcher, SortOrder};
use crate::view_state::types::RowHeight;
use std::sync::Arc;

/// Validated grid configuration.
#[derive(Clone)]
pub struct GridConfig {
    columns: Vec<ColumnDescriptor>,
    selectable: bool,
    multiple: bool,
    sortable: bool,
    resizable: bool,
    clickable: bool,
    sort_by: Option<String>,
    sort_order: SortOrder,
    matcher: SharedMatcher,
    offset_rows: usize,
    default_row_height: RowHeight,
    checkbox_width: u32,
    row_border: usize,
}

impl std::fmt::Debug for GridConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridConfig")
            .field("columns", &self.columns.len())
            .field("selectable", &self.selectable)
            .field("multiple", &self.multiple)
            .field("sortable", &self.sortable)
            .field("resizable", &self.resizable)
            .field("clickable", &self.clickable)
            .field("sort_by", &self.sort_by)
            .field("sort_order", &self.sort_order)
            .field("offset_rows", &self.offset_rows)
            .field("default_row_height", &self.default_row_height)
            .finish_non_exhaustive()
    }
}

impl GridConfig {
    /// Start building a configuration for `columns`.
    pub fn builder(columns: Vec<ColumnDescriptor>) -> GridConfigBuilder {
        GridConfigBuilder::new(columns)
    }

    /// All column descriptors, hidden ones included.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Same configuration over a different column set.
    ///
    /// # Errors
    ///
    /// [`GridError::InvalidConfiguration`] when the active `sort_by` names no
    /// column of the new set.
    pub fn with_columns(&self, columns: Vec<ColumnDescriptor>) -> Result<Self, GridError> {
        if let Some(name) = &self.sort_by {
            if !columns.iter().any(|c| &c.name == name) {
                return Err(GridError::invalid(
                    "sort_by",
                    format!("no column named {name:?}"),
                ));
            }
        }
        Ok(Self {
            columns,
            ..self.clone()
        })
    }

    /// Same configuration sorted by `sort_by`, or unsorted for `None`.
    ///
    /// # Errors
    ///
    /// [`GridError::InvalidConfiguration`] when `sort_by` names no column.
    pub fn with_sort(
        &self,
        sort_by: Option<&str>,
        sort_order: SortOrder,
    ) -> Result<Self, GridError> {
        if let Some(name) = sort_by {
            if self.column(name).is_none() {
                return Err(GridError::invalid(
                    "sort_by",
                    format!("no column named {name:?}"),
                ));
            }
        }
        Ok(Self {
            sort_by: sort_by.map(str::to_string),
            sort_order,
            ..self.clone()
        })
    }

    /// Columns that take part in layout and rendering.
    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| !c.hidden)
    }

    /// Look a column up by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Rows carry a selection checkbox.
    pub fn selectable(&self) -> bool {
        self.selectable
    }

    /// More than one row may be selected.
    pub fn multiple(&self) -> bool {
        self.multiple
    }

    /// Sortable headers emit sort changes.
    pub fn sortable(&self) -> bool {
        self.sortable
    }

    /// Columns may be resized by dragging.
    pub fn resizable(&self) -> bool {
        self.resizable
    }

    /// Row clicks are reported.
    pub fn clickable(&self) -> bool {
        self.clickable
    }

    /// Sort column.
    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    /// Sort direction.
    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Row identity.
    pub fn matcher(&self) -> &SharedMatcher {
        &self.matcher
    }

    /// Rows rendered above and below the viewport.
    pub fn offset_rows(&self) -> usize {
        self.offset_rows
    }

    /// Height assumed for rows before any is measured.
    pub fn default_row_height(&self) -> RowHeight {
        self.default_row_height
    }

    /// Width taken by the selection checkbox gutter.
    pub fn checkbox_width(&self) -> u32 {
        self.checkbox_width
    }

    /// Border height added to every measured row.
    pub fn row_border(&self) -> usize {
        self.row_border
    }
}

/// Builder for [`GridConfig`].
///
/// Every interaction flag starts off, `multiple` included: a selectable grid
/// is single-select until [`GridConfigBuilder::multiple`] opts in.
///
/// Nothing is checked until [`GridConfigBuilder::build`].
pub struct GridConfigBuilder {
    columns: Vec<ColumnDescriptor>,
    selectable: bool,
    multiple: bool,
    sortable: bool,
    resizable: bool,
    clickable: bool,
    sort_by: Option<String>,
    sort_order: Option<String>,
    matcher: SharedMatcher,
    offset_rows: usize,
    default_row_height: usize,
    checkbox_width: u32,
    row_border: usize,
}

impl GridConfigBuilder {
    fn new(columns: Vec<ColumnDescriptor>) -> Self {
        let defaults = GridSettings::default();
        Self {
            columns,
            selectable: false,
            multiple: false,
            sortable: false,
            resizable: false,
            clickable: false,
            sort_by: None,
            sort_order: None,
            matcher: Arc::new(IdMatcher),
            offset_rows: defaults.offset_rows,
            default_row_height: defaults.default_row_height,
            checkbox_width: defaults.checkbox_width,
            row_border: defaults.row_border,
        }
    }

    /// Enable the selection checkbox column.
    pub fn selectable(mut self, on: bool) -> Self {
        self.selectable = on;
        self
    }

    /// Allow more than one selected row.
    pub fn multiple(mut self, on: bool) -> Self {
        self.multiple = on;
        self
    }

    /// Enable sortable headers.
    pub fn sortable(mut self, on: bool) -> Self {
        self.sortable = on;
        self
    }

    /// Enable drag-resizing of columns.
    pub fn resizable(mut self, on: bool) -> Self {
        self.resizable = on;
        self
    }

    /// Report row clicks.
    pub fn clickable(mut self, on: bool) -> Self {
        self.clickable = on;
        self
    }

    /// Initially active sort column; must name one of the columns.
    pub fn sort_by(mut self, name: impl Into<String>) -> Self {
        self.sort_by = Some(name.into());
        self
    }

    /// Initial sort direction, `ASC` or `DESC` in any case.
    pub fn sort_order(mut self, order: impl Into<String>) -> Self {
        self.sort_order = Some(order.into());
        self
    }

    /// Custom row identity.
    pub fn matcher(mut self, matcher: SharedMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Take engine tunables from loaded settings.
    pub fn settings(mut self, settings: &GridSettings) -> Self {
        self.offset_rows = settings.offset_rows;
        self.default_row_height = settings.default_row_height;
        self.checkbox_width = settings.checkbox_width;
        self.row_border = settings.row_border;
        self
    }

    /// Validate and freeze the configuration.
    ///
    /// # Errors
    ///
    /// [`GridError::InvalidConfiguration`] when `sort_by` names no column,
    /// `sort_order` is neither `ASC` nor `DESC`, or the default row height
    /// is zero.
    pub fn build(self) -> Result<GridConfig, GridError> {
        let sort_by = self.sort_by.filter(|name| !name.is_empty());
        if let Some(name) = &sort_by {
            if !self.columns.iter().any(|c| &c.name == name) {
                return Err(GridError::invalid(
                    "sort_by",
                    format!("no column named {name:?}"),
                ));
            }
        }

        let sort_order = match self.sort_order.as_deref() {
            Some(raw) => raw.parse::<SortOrder>()?,
            None => SortOrder::default(),
        };

        let default_row_height = RowHeight::new(self.default_row_height)
            .map_err(|e| GridError::invalid("default_row_height", e.to_string()))?;

        Ok(GridConfig {
            columns: self.columns,
            selectable: self.selectable,
            multiple: self.multiple,
            sortable: self.sortable,
            resizable: self.resizable,
            clickable: self.clickable,
            sort_by,
            sort_order,
            matcher: self.matcher,
            offset_rows: self.offset_rows,
            default_row_height,
            checkbox_width: self.checkbox_width,
            row_border: self.row_border,
        })
    }
}
