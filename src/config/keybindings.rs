//! Keyboard bindings configuration.

use crate::model::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to domain actions.
///
/// Provides default vim-style bindings.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    ///
    /// Only code and modifiers take part; SHIFT is ignored on character keys
    /// because the character already carries the case.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        let modifiers = match key.code {
            KeyCode::Char(_) => key.modifiers - KeyModifiers::SHIFT,
            _ => key.modifiers,
        };
        self.bindings.get(&KeyEvent::new(key.code, modifiers)).copied()
    }

    fn bind(&mut self, code: KeyCode, modifiers: KeyModifiers, action: KeyAction) {
        self.bindings.insert(KeyEvent::new(code, modifiers), action);
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut keys = Self {
            bindings: HashMap::new(),
        };
        let none = KeyModifiers::NONE;

        // Horizontal scrolling
        keys.bind(KeyCode::Char('h'), none, KeyAction::ScrollLeft);
        keys.bind(KeyCode::Left, none, KeyAction::ScrollLeft);
        keys.bind(KeyCode::Char('l'), none, KeyAction::ScrollRight);
        keys.bind(KeyCode::Right, none, KeyAction::ScrollRight);
        keys.bind(KeyCode::Char('H'), none, KeyAction::PageLeft);
        keys.bind(KeyCode::PageUp, none, KeyAction::PageLeft);
        keys.bind(KeyCode::Char('L'), none, KeyAction::PageRight);
        keys.bind(KeyCode::PageDown, none, KeyAction::PageRight);

        // Rows
        keys.bind(KeyCode::Char('k'), none, KeyAction::ScrollUp);
        keys.bind(KeyCode::Up, none, KeyAction::ScrollUp);
        keys.bind(KeyCode::Char('j'), none, KeyAction::ScrollDown);
        keys.bind(KeyCode::Down, none, KeyAction::ScrollDown);

        // Ends of the timeline
        keys.bind(KeyCode::Char('g'), none, KeyAction::ScrollToStart);
        keys.bind(KeyCode::Home, none, KeyAction::ScrollToStart);
        keys.bind(KeyCode::Char('G'), none, KeyAction::ScrollToPresent);
        keys.bind(KeyCode::End, none, KeyAction::ScrollToPresent);

        keys.bind(KeyCode::Char('z'), none, KeyAction::ToggleZoom);
        for (index, digit) in ['1', '2', '3', '4', '5'].into_iter().enumerate() {
            keys.bind(KeyCode::Char(digit), none, KeyAction::JumpTo(index));
        }
        keys.bind(KeyCode::Tab, none, KeyAction::ToggleSidebar);

        // Application controls
        keys.bind(KeyCode::Char('q'), none, KeyAction::Quit);
        keys.bind(KeyCode::Esc, none, KeyAction::Quit);
        keys.bind(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyAction::Quit);

        keys
    }
}
