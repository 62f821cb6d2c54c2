use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{ListItem, Paragraph};

use crate::Theme;
use crate::config::{KeyResolver, NavAction};
use crate::ui::{Component, EventResult, Keybinding, List, ListEvent, ListRow, Result, Screen};

#[derive(Debug, PartialEq, Eq)]
pub enum HomeEvent {
    OpenPicker,
}

#[derive(Clone, Copy)]
enum HomeAction {
    SelectFile,
}

impl ListRow for HomeAction {
    fn render_row(&self, theme: &Theme) -> ListItem<'static> {
        let label = match self {
            Self::SelectFile => "Select Excel File",
        };
        ListItem::new(label).style(Style::default().fg(theme.text()))
    }
}

/// Landing view with a single button.
pub struct HomeScreen {
    actions: List<HomeAction>,
    resolver: Arc<KeyResolver>,
}

impl HomeScreen {
    pub fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            actions: List::new(vec![HomeAction::SelectFile], resolver.clone()),
            resolver,
        }
    }
}

impl Screen for HomeScreen {
    type Output = HomeEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(match self.actions.handle_key(key)? {
            EventResult::Event(ListEvent::Activated(HomeAction::SelectFile)) => {
                HomeEvent::OpenPicker.into()
            }
            other if other.is_consumed() => EventResult::Consumed,
            _ => EventResult::Ignored,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let panel = area.centered(Constraint::Length(48), Constraint::Length(6));
        let [banner, buttons] =
            Layout::vertical([Constraint::Length(3), Constraint::Length(3)]).areas(panel);

        let title = Paragraph::new(vec![
            Line::styled(
                "Instrument Selector",
                Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD),
            ),
            Line::styled(
                "Pick a workbook of services and containers",
                Style::default().fg(theme.subtext0()),
            ),
        ])
        .centered();
        frame.render_widget(title, banner);
        self.actions.render(frame, buttons, theme);
    }

    fn breadcrumb(&self) -> String {
        "Home".to_string()
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        vec![Keybinding::new(
            self.resolver.display_nav(NavAction::Select),
            "Open",
        )]
    }
}
