//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crossterm::event::KeyEvent;
use std::collections::HashMap;

/// Maps keyboard events to grid actions.
///
/// Provides default vim-style bindings alongside the arrow keys.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&key).copied()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        use crossterm::event::{KeyCode, KeyModifiers};

        let mut bindings = HashMap::new();
        let mut bind = |code: KeyCode, modifiers: KeyModifiers, action: KeyAction| {
            bindings.insert(KeyEvent::new(code, modifiers), action);
        };

        // Row focus
        bind(KeyCode::Up, KeyModifiers::NONE, KeyAction::FocusPrevRow);
        bind(KeyCode::Char('k'), KeyModifiers::NONE, KeyAction::FocusPrevRow);
        bind(KeyCode::Down, KeyModifiers::NONE, KeyAction::FocusNextRow);
        bind(KeyCode::Char('j'), KeyModifiers::NONE, KeyAction::FocusNextRow);
        bind(KeyCode::Up, KeyModifiers::SHIFT, KeyAction::ExtendUp);
        bind(KeyCode::Down, KeyModifiers::SHIFT, KeyAction::ExtendDown);

        // Scrolling
        bind(KeyCode::PageUp, KeyModifiers::NONE, KeyAction::PageUp);
        bind(KeyCode::Char('u'), KeyModifiers::CONTROL, KeyAction::PageUp);
        bind(KeyCode::PageDown, KeyModifiers::NONE, KeyAction::PageDown);
        bind(KeyCode::Char('d'), KeyModifiers::CONTROL, KeyAction::PageDown);
        bind(KeyCode::Home, KeyModifiers::NONE, KeyAction::ScrollToTop);
        bind(KeyCode::Char('g'), KeyModifiers::NONE, KeyAction::ScrollToTop);
        bind(KeyCode::End, KeyModifiers::NONE, KeyAction::ScrollToBottom);
        bind(KeyCode::Char('G'), KeyModifiers::SHIFT, KeyAction::ScrollToBottom);
        bind(KeyCode::Left, KeyModifiers::NONE, KeyAction::ScrollLeft);
        bind(KeyCode::Char('h'), KeyModifiers::NONE, KeyAction::ScrollLeft);
        bind(KeyCode::Right, KeyModifiers::NONE, KeyAction::ScrollRight);
        bind(KeyCode::Char('l'), KeyModifiers::NONE, KeyAction::ScrollRight);

        // Columns
        bind(KeyCode::Tab, KeyModifiers::NONE, KeyAction::FocusNextColumn);
        bind(KeyCode::BackTab, KeyModifiers::SHIFT, KeyAction::FocusPrevColumn);
        bind(KeyCode::Char('s'), KeyModifiers::NONE, KeyAction::SortColumn);
        // terminals disagree on whether < and > carry SHIFT
        for modifiers in [KeyModifiers::NONE, KeyModifiers::SHIFT] {
            bind(KeyCode::Char('<'), modifiers, KeyAction::ShrinkColumn);
            bind(KeyCode::Char('>'), modifiers, KeyAction::GrowColumn);
        }

        // Selection
        bind(KeyCode::Char(' '), KeyModifiers::NONE, KeyAction::ToggleRow);
        bind(KeyCode::Enter, KeyModifiers::NONE, KeyAction::ToggleRow);
        bind(KeyCode::Char('a'), KeyModifiers::NONE, KeyAction::ToggleAll);
        bind(KeyCode::Char('o'), KeyModifiers::NONE, KeyAction::OpenRow);

        // Application controls
        bind(KeyCode::Char('q'), KeyModifiers::NONE, KeyAction::Quit);
        bind(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyAction::Quit);

        Self { bindings }
    }
}
