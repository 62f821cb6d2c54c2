use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, List as RatatuiList, ListItem, ListState, Paragraph};

use crate::Theme;
use crate::config::{KeyResolver, NavAction};
use crate::ui::{Component, EventResult, Result};

const PAGE_STEP: usize = 10;

pub enum ListEvent<T> {
    Activated(T),
}

pub trait ListRow {
    fn render_row(&self, theme: &Theme) -> ListItem<'static>;
}

/// Single-choice list: navigate and press select to activate a row.
pub struct List<T: ListRow + Clone> {
    items: Vec<T>,
    state: ListState,
    title: Option<String>,
    empty_text: &'static str,
    resolver: Arc<KeyResolver>,
}

impl<T: ListRow + Clone> List<T> {
    pub fn new(items: Vec<T>, resolver: Arc<KeyResolver>) -> Self {
        let mut list = Self {
            items: Vec::new(),
            state: ListState::default(),
            title: None,
            empty_text: "Nothing here",
            resolver,
        };
        list.set_items(items);
        list
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub const fn with_empty_text(mut self, text: &'static str) -> Self {
        self.empty_text = text;
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn selected(&self) -> Option<&T> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    /// Replace the rows and move the cursor back to the top.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.state = ListState::default();
        if !self.items.is_empty() {
            self.state.select(Some(0));
        }
    }

    fn last_index(&self) -> usize {
        self.items.len().saturating_sub(1)
    }
}

impl<T: ListRow + Clone> Component for List<T> {
    type Output = ListEvent<T>;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.items.is_empty() {
            return Ok(EventResult::Ignored);
        }
        let current = self.state.selected().unwrap_or(0);

        let target = if self.resolver.matches_nav(&key, NavAction::Down) {
            usize::min(current + 1, self.last_index())
        } else if self.resolver.matches_nav(&key, NavAction::Up) {
            current.saturating_sub(1)
        } else if self.resolver.matches_nav(&key, NavAction::Home) {
            0
        } else if self.resolver.matches_nav(&key, NavAction::End) {
            self.last_index()
        } else if self.resolver.matches_nav(&key, NavAction::PageDown) {
            usize::min(current + PAGE_STEP, self.last_index())
        } else if self.resolver.matches_nav(&key, NavAction::PageUp) {
            current.saturating_sub(PAGE_STEP)
        } else if self.resolver.matches_nav(&key, NavAction::Select) {
            return Ok(self
                .selected()
                .cloned()
                .map_or(EventResult::Ignored, |item| ListEvent::Activated(item).into()));
        } else {
            return Ok(EventResult::Ignored);
        };

        self.state.select(Some(target));
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border()));
        if let Some(title) = &self.title {
            block = block
                .title(title.as_str())
                .title_style(Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD));
        }

        if self.items.is_empty() {
            let empty = Paragraph::new(self.empty_text)
                .style(Style::default().fg(theme.overlay0()))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self.items.iter().map(|i| i.render_row(theme)).collect();
        let list = RatatuiList::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::*;
    use crate::ui::components::test_support::{char, press};

    #[derive(Clone, Debug, PartialEq)]
    struct Row(&'static str);

    impl ListRow for Row {
        fn render_row(&self, _theme: &Theme) -> ListItem<'static> {
            ListItem::new(self.0)
        }
    }

    fn list(rows: &[&'static str]) -> List<Row> {
        List::new(rows.iter().copied().map(Row).collect(), Arc::new(KeyResolver::default()))
    }

    fn activate(list: &mut List<Row>) -> Option<Row> {
        match list.handle_key(press(KeyCode::Enter)).unwrap() {
            EventResult::Event(ListEvent::Activated(row)) => Some(row),
            _ => None,
        }
    }

    #[test]
    fn test_navigation_clamps_at_ends() {
        let mut list = list(&["a", "b", "c"]);
        list.handle_key(char('k')).unwrap();
        assert_eq!(list.selected(), Some(&Row("a")));

        list.handle_key(char('G')).unwrap();
        assert_eq!(list.selected(), Some(&Row("c")));
        list.handle_key(press(KeyCode::Down)).unwrap();
        assert_eq!(list.selected(), Some(&Row("c")));

        list.handle_key(char('g')).unwrap();
        assert_eq!(activate(&mut list), Some(Row("a")));
    }

    #[test]
    fn test_page_keys_move_by_step() {
        let rows: Vec<&'static str> = vec!["x"; 25];
        let mut list = list(&rows);
        list.handle_key(press(KeyCode::PageDown)).unwrap();
        assert_eq!(list.state.selected(), Some(PAGE_STEP));
        list.handle_key(press(KeyCode::PageDown)).unwrap();
        list.handle_key(press(KeyCode::PageDown)).unwrap();
        assert_eq!(list.state.selected(), Some(24));
        list.handle_key(press(KeyCode::PageUp)).unwrap();
        assert_eq!(list.state.selected(), Some(14));
    }

    #[test]
    fn test_empty_list_ignores_keys() {
        let mut list = list(&[]);
        assert_eq!(list.selected(), None);
        assert!(!list.handle_key(press(KeyCode::Enter)).unwrap().is_consumed());
    }

    #[test]
    fn test_set_items_resets_cursor() {
        let mut list = list(&["a", "b"]);
        list.handle_key(char('j')).unwrap();
        list.set_items(vec![Row("c"), Row("d"), Row("e")]);
        assert_eq!(list.selected(), Some(&Row("c")));
    }

    #[test]
    fn test_unbound_key_is_ignored() {
        let mut list = list(&["a"]);
        assert!(!list.handle_key(char('z')).unwrap().is_consumed());
    }
}
