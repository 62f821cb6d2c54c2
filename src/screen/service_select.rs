use std::fmt;
use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::Theme;
use crate::config::{KeyResolver, NavAction, SelectionAction};
use crate::ui::{
    Component, EventResult, Keybinding, MultiSelect, MultiSelectEvent, Result, Screen,
};
use crate::workbook::ServiceCatalog;

#[derive(Debug, PartialEq, Eq)]
pub enum ServiceSelectEvent {
    /// Checked service names, in catalog order.
    Continue(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ServiceRow(String);

impl fmt::Display for ServiceRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One checkbox per distinct service in the loaded workbook.
pub struct ServiceSelectScreen {
    select: MultiSelect<ServiceRow>,
    resolver: Arc<KeyResolver>,
}

impl ServiceSelectScreen {
    pub fn new(catalog: &ServiceCatalog, resolver: Arc<KeyResolver>) -> Self {
        let rows = catalog.services().map(|s| ServiceRow(s.to_string())).collect();
        Self {
            select: MultiSelect::new(rows, resolver.clone()).with_title("Services"),
            resolver,
        }
    }
}

impl Screen for ServiceSelectScreen {
    type Output = ServiceSelectEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(match self.select.handle_key(key)? {
            EventResult::Event(MultiSelectEvent::Confirmed(rows)) => {
                ServiceSelectEvent::Continue(rows.into_iter().map(|r| r.0).collect()).into()
            }
            EventResult::Consumed => EventResult::Consumed,
            EventResult::Ignored => EventResult::Ignored,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.select.render(frame, area, theme);
    }

    fn breadcrumb(&self) -> String {
        "Services".to_string()
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        selection_keybindings(&self.resolver, "Continue")
    }
}

/// Hints shared by both selection screens.
pub(super) fn selection_keybindings(resolver: &KeyResolver, confirm: &str) -> Vec<Keybinding> {
    vec![
        Keybinding::new(resolver.display_selection(SelectionAction::Toggle), "Toggle"),
        Keybinding::new(resolver.display_selection(SelectionAction::ToggleAll), "All"),
        Keybinding::new(resolver.display_selection(SelectionAction::Filter), "Filter"),
        Keybinding::new(resolver.display_nav(NavAction::Select), confirm),
    ]
}
