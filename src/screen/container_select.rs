use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use super::service_select::selection_keybindings;
use crate::Theme;
use crate::config::KeyResolver;
use crate::ui::{Component, EventResult, Keybinding, MultiSelect, MultiSelectEvent, Result, Screen};
use crate::workbook::{ContainerEntry, ServiceCatalog};

#[derive(Debug, PartialEq, Eq)]
pub enum ContainerSelectEvent {
    /// Checked entries in list order; possibly empty.
    Export(Vec<ContainerEntry>),
}

/// `service: container` rows for the services chosen on the previous screen.
pub struct ContainerSelectScreen {
    select: MultiSelect<ContainerEntry>,
    resolver: Arc<KeyResolver>,
}

impl ContainerSelectScreen {
    pub fn new(catalog: &ServiceCatalog, services: &[String], resolver: Arc<KeyResolver>) -> Self {
        let entries = catalog.entries_for(services);
        Self {
            select: MultiSelect::new(entries, resolver.clone()).with_title("Containers"),
            resolver,
        }
    }
}

impl Screen for ContainerSelectScreen {
    type Output = ContainerSelectEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(match self.select.handle_key(key)? {
            EventResult::Event(MultiSelectEvent::Confirmed(entries)) => {
                ContainerSelectEvent::Export(entries).into()
            }
            EventResult::Consumed => EventResult::Consumed,
            EventResult::Ignored => EventResult::Ignored,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.select.render(frame, area, theme);
    }

    fn breadcrumb(&self) -> String {
        "Containers".to_string()
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        selection_keybindings(&self.resolver, "Export")
    }
}
