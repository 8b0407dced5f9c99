//! Domain-level keyboard actions independent of key bindings.

/// Grid actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `KeyAction` is handled by `KeyBindings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Row focus
    /// Move the focused row up. Default: k/↑
    FocusPrevRow,
    /// Move the focused row down. Default: j/↓
    FocusNextRow,
    /// Move up and toggle the row left behind. Default: Shift+↑
    ExtendUp,
    /// Move down and toggle the row left behind. Default: Shift+↓
    ExtendDown,

    // Scrolling
    /// Scroll up by one viewport. Default: Page Up/Ctrl+u
    PageUp,
    /// Scroll down by one viewport. Default: Page Down/Ctrl+d
    PageDown,
    /// Jump to the first row. Default: g/Home
    ScrollToTop,
    /// Jump to the last row. Default: G/End
    ScrollToBottom,
    /// Scroll the columns left. Default: h/←
    ScrollLeft,
    /// Scroll the columns right. Default: l/→
    ScrollRight,

    // Columns
    /// Focus the previous column. Default: Shift+Tab
    FocusPrevColumn,
    /// Focus the next column. Default: Tab
    FocusNextColumn,
    /// Sort by the focused column, flipping the order if already active. Default: s
    SortColumn,
    /// Narrow the focused column. Default: <
    ShrinkColumn,
    /// Widen the focused column. Default: >
    GrowColumn,

    // Selection
    /// Toggle selection of the focused row. Default: Space/Enter
    ToggleRow,
    /// Select every row, or clear the selection when all are selected. Default: a
    ToggleAll,
    /// Report a click on the focused row. Default: o
    OpenRow,

    // Application controls
    /// Exit the viewer. Default: q/Ctrl+c
    Quit,
}
