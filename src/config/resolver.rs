use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::{DialogAction, GlobalAction, NavAction, SelectionAction};
use crate::config::keybindings::KeybindingsConfig;

/// Maps key events to actions, and actions back to hint labels.
pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    // Global actions
    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => kb.quit.matches(event),
            GlobalAction::Back => kb.back.matches(event),
            GlobalAction::Suspend => kb.suspend.matches(event),
        }
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => kb.quit.display(),
            GlobalAction::Back => kb.back.display(),
            GlobalAction::Suspend => kb.suspend.display(),
        }
    }

    // Navigation actions
    pub fn matches_nav(&self, event: &KeyEvent, action: NavAction) -> bool {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => kb.up.matches(event),
            NavAction::Down => kb.down.matches(event),
            NavAction::PageUp => kb.page_up.matches(event),
            NavAction::PageDown => kb.page_down.matches(event),
            NavAction::Home => kb.home.matches(event),
            NavAction::End => kb.end.matches(event),
            NavAction::Select => kb.select.matches(event),
        }
    }

    pub fn display_nav(&self, action: NavAction) -> String {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => kb.up.display(),
            NavAction::Down => kb.down.display(),
            NavAction::PageUp => kb.page_up.display(),
            NavAction::PageDown => kb.page_down.display(),
            NavAction::Home => kb.home.display(),
            NavAction::End => kb.end.display(),
            NavAction::Select => kb.select.display(),
        }
    }

    // Multi-select actions
    pub fn matches_selection(&self, event: &KeyEvent, action: SelectionAction) -> bool {
        let kb = &self.keybindings.selection;
        match action {
            SelectionAction::Toggle => kb.toggle.matches(event),
            SelectionAction::ToggleAll => kb.toggle_all.matches(event),
            SelectionAction::Filter => kb.filter.matches(event),
        }
    }

    pub fn display_selection(&self, action: SelectionAction) -> String {
        let kb = &self.keybindings.selection;
        match action {
            SelectionAction::Toggle => kb.toggle.display(),
            SelectionAction::ToggleAll => kb.toggle_all.display(),
            SelectionAction::Filter => kb.filter.display(),
        }
    }

    // Dialog actions
    pub fn matches_dialog(&self, event: &KeyEvent, action: DialogAction) -> bool {
        let kb = &self.keybindings.dialog;
        match action {
            DialogAction::Confirm => kb.confirm.matches(event),
            DialogAction::Cancel => kb.cancel.matches(event),
            DialogAction::Dismiss => kb.dismiss.matches(event),
        }
    }

    pub fn display_dialog(&self, action: DialogAction) -> String {
        let kb = &self.keybindings.dialog;
        match action {
            DialogAction::Confirm => kb.confirm.display(),
            DialogAction::Cancel => kb.cancel.display(),
            DialogAction::Dismiss => kb.dismiss.display(),
        }
    }
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(Arc::new(KeybindingsConfig::default()))
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_bindings() {
        let keys = KeyResolver::default();
        assert!(keys.matches_global(&press(KeyCode::Char('q')), GlobalAction::Quit));
        assert!(keys.matches_nav(&press(KeyCode::Char('j')), NavAction::Down));
        assert!(keys.matches_nav(&press(KeyCode::Down), NavAction::Down));
        assert!(keys.matches_selection(&press(KeyCode::Char(' ')), SelectionAction::Toggle));
        assert!(!keys.matches_nav(&press(KeyCode::Char('G')), NavAction::Home));
        assert!(keys.matches_nav(&press(KeyCode::Char('G')), NavAction::End));
    }

    #[test]
    fn test_display_joins_alternatives() {
        let keys = KeyResolver::default();
        assert_eq!(keys.display_nav(NavAction::Up), "k/↑");
        assert_eq!(keys.display_selection(SelectionAction::Toggle), "Space");
        assert_eq!(keys.display_global(GlobalAction::Suspend), "ctrl+z");
    }
}
