//! Grid styling.
//!
//! Colors are optional: `--no-color` or a set `NO_COLOR` turns them off, and
//! selection and focus fall back to text modifiers alone.

use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var("NO_COLOR").is_err();
        Self { enabled }
    }

    /// Colors explicitly on or off.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== GridStyles =====

/// Styles for the parts of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyles {
    /// Header row.
    pub header: Style,
    /// Unselected body rows.
    pub row: Style,
    /// Selected body rows.
    pub selected: Style,
    /// Added on top of the row style for the focused row.
    pub focused: Style,
    /// Added on top of the header style for the focused column.
    pub focused_column: Style,
    /// Status line.
    pub status: Style,
}

impl GridStyles {
    /// Styles for the given color configuration.
    pub fn with_color_config(config: ColorConfig) -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let reversed = Style::default().add_modifier(Modifier::REVERSED);
        let underlined = Style::default().add_modifier(Modifier::UNDERLINED);
        if config.colors_enabled() {
            Self {
                header: bold.fg(Color::Cyan),
                row: Style::default(),
                selected: Style::default().fg(Color::Green),
                focused: reversed,
                focused_column: underlined,
                status: Style::default().fg(Color::DarkGray),
            }
        } else {
            Self {
                header: bold,
                row: Style::default(),
                selected: bold,
                focused: reversed,
                focused_column: underlined,
                status: Style::default(),
            }
        }
    }

    /// Style for a body row.
    pub fn for_row(&self, selected: bool, focused: bool) -> Style {
        let base = if selected { self.selected } else { self.row };
        if focused {
            base.patch(self.focused)
        } else {
            base
        }
    }
}

impl Default for GridStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }
}

// ===== Tests =====
