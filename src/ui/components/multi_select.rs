use std::fmt::Display;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List as RatatuiList, ListItem, ListState, Paragraph};

use crate::Theme;
use crate::config::{GlobalAction, KeyResolver, NavAction, SelectionAction};
use crate::search::Matcher;
use crate::ui::{Component, EventResult, Result};

const PAGE_STEP: usize = 10;

pub enum MultiSelectEvent<T> {
    /// The checked rows, in list order. May be empty.
    Confirmed(Vec<T>),
}

/// Checkbox list with a fuzzy filter.
///
/// Rows are labelled by their `Display` form, which is also what the filter
/// matches against. Checked state belongs to the row, not to its filtered
/// position, so narrowing the filter never loses a selection.
pub struct MultiSelect<T: Display + Clone> {
    items: Vec<T>,
    labels: Vec<String>,
    checked: Vec<bool>,
    visible: Vec<usize>,
    state: ListState,
    query: String,
    filtering: bool,
    title: String,
    matcher: Matcher,
    resolver: Arc<KeyResolver>,
}

impl<T: Display + Clone> MultiSelect<T> {
    pub fn new(items: Vec<T>, resolver: Arc<KeyResolver>) -> Self {
        let labels: Vec<String> = items.iter().map(ToString::to_string).collect();
        let mut select = Self {
            checked: vec![false; items.len()],
            visible: (0..items.len()).collect(),
            items,
            labels,
            state: ListState::default(),
            query: String::new(),
            filtering: false,
            title: String::new(),
            matcher: Matcher::new(),
            resolver,
        };
        select.clamp_cursor();
        select
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn checked_items(&self) -> Vec<T> {
        self.items
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(item, _)| item.clone())
            .collect()
    }

    pub fn checked_count(&self) -> usize {
        self.checked.iter().filter(|c| **c).count()
    }

    #[cfg(test)]
    pub const fn is_filtering(&self) -> bool {
        self.filtering
    }

    fn cursor_item(&self) -> Option<usize> {
        self.state.selected().and_then(|i| self.visible.get(i)).copied()
    }

    fn clamp_cursor(&mut self) {
        if self.visible.is_empty() {
            self.state.select(None);
        } else {
            let i = self.state.selected().unwrap_or(0);
            self.state.select(Some(i.min(self.visible.len() - 1)));
        }
    }

    fn refilter(&mut self) {
        self.visible = self
            .matcher
            .filter(self.labels.iter().map(String::as_str), &self.query);
        self.state.select(Some(0));
        self.clamp_cursor();
    }

    fn toggle_cursor(&mut self) {
        if let Some(idx) = self.cursor_item() {
            self.checked[idx] = !self.checked[idx];
        }
    }

    /// Check every visible row, or uncheck them all if they already are.
    fn toggle_visible(&mut self) {
        let all_checked = self.visible.iter().all(|&i| self.checked[i]);
        for &i in &self.visible {
            self.checked[i] = !all_checked;
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> EventResult<MultiSelectEvent<T>> {
        if self.resolver.matches_global(&key, GlobalAction::Back) {
            self.filtering = false;
            self.query.clear();
            self.refilter();
            return EventResult::Consumed;
        }
        if self.resolver.matches_nav(&key, NavAction::Select) {
            self.filtering = false;
            return EventResult::Consumed;
        }

        match key.code {
            KeyCode::Backspace => {
                self.query.pop();
                self.refilter();
            }
            KeyCode::Char(c) => {
                self.query.push(c);
                self.refilter();
            }
            _ => {}
        }
        EventResult::Consumed
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> EventResult<MultiSelectEvent<T>> {
        let r = Arc::clone(&self.resolver);

        if r.matches_selection(&key, SelectionAction::Toggle) {
            self.toggle_cursor();
            return EventResult::Consumed;
        }
        if r.matches_selection(&key, SelectionAction::ToggleAll) {
            self.toggle_visible();
            return EventResult::Consumed;
        }
        if r.matches_selection(&key, SelectionAction::Filter) {
            self.filtering = true;
            return EventResult::Consumed;
        }
        if r.matches_nav(&key, NavAction::Select) {
            return MultiSelectEvent::Confirmed(self.checked_items()).into();
        }
        if r.matches_global(&key, GlobalAction::Back) && !self.query.is_empty() {
            self.query.clear();
            self.refilter();
            return EventResult::Consumed;
        }

        let Some(current) = self.state.selected() else {
            return EventResult::Ignored;
        };
        let last = self.visible.len().saturating_sub(1);
        let target = if r.matches_nav(&key, NavAction::Down) {
            usize::min(current + 1, last)
        } else if r.matches_nav(&key, NavAction::Up) {
            current.saturating_sub(1)
        } else if r.matches_nav(&key, NavAction::Home) {
            0
        } else if r.matches_nav(&key, NavAction::End) {
            last
        } else if r.matches_nav(&key, NavAction::PageDown) {
            usize::min(current + PAGE_STEP, last)
        } else if r.matches_nav(&key, NavAction::PageUp) {
            current.saturating_sub(PAGE_STEP)
        } else {
            return EventResult::Ignored;
        };
        self.state.select(Some(target));
        EventResult::Consumed
    }
}

impl<T: Display + Clone> Component for MultiSelect<T> {
    type Output = MultiSelectEvent<T>;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(if self.filtering {
            self.handle_filter_key(key)
        } else {
            self.handle_list_key(key)
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let show_filter = self.filtering || !self.query.is_empty();
        let (list_area, filter_area) = if show_filter {
            let [list, filter] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
            (list, Some(filter))
        } else {
            (area, None)
        };

        let title = format!(
            " {} ({}/{} selected) ",
            self.title,
            self.checked_count(),
            self.items.len()
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border()))
            .title(title)
            .title_style(Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD));

        if self.visible.is_empty() {
            let text = if self.items.is_empty() {
                "Nothing to select"
            } else {
                "No rows match the filter"
            };
            let empty = Paragraph::new(text)
                .style(Style::default().fg(theme.overlay0()))
                .block(block);
            frame.render_widget(empty, list_area);
        } else {
            let rows: Vec<ListItem> = self
                .visible
                .iter()
                .map(|&i| {
                    let (mark, mark_style) = if self.checked[i] {
                        ("[x] ", Style::default().fg(theme.success()))
                    } else {
                        ("[ ] ", Style::default().fg(theme.overlay1()))
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(mark, mark_style),
                        Span::styled(self.labels[i].clone(), Style::default().fg(theme.text())),
                    ]))
                })
                .collect();

            let list = RatatuiList::new(rows)
                .block(block)
                .highlight_style(
                    Style::default()
                        .bg(theme.selection_bg())
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▶ ");
            frame.render_stateful_widget(list, list_area, &mut self.state);
        }

        if let Some(filter_area) = filter_area {
            let (text, style) = if self.filtering {
                (
                    format!("/{}_", self.query),
                    Style::default().fg(theme.warning()),
                )
            } else {
                (
                    format!("/{} ({} matches)", self.query, self.visible.len()),
                    Style::default().fg(theme.subtext0()),
                )
            };
            frame.render_widget(Paragraph::new(text).style(style), filter_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ui::components::test_support::{char, press};

    fn select(rows: &[&str]) -> MultiSelect<String> {
        MultiSelect::new(
            rows.iter().map(ToString::to_string).collect(),
            Arc::new(KeyResolver::default()),
        )
    }

    fn confirm(select: &mut MultiSelect<String>) -> Vec<String> {
        match select.handle_key(press(KeyCode::Enter)).unwrap() {
            EventResult::Event(MultiSelectEvent::Confirmed(rows)) => rows,
            _ => panic!("expected a confirmation"),
        }
    }

    fn type_filter(select: &mut MultiSelect<String>, query: &str) {
        select.handle_key(char('/')).unwrap();
        for c in query.chars() {
            select.handle_key(char(c)).unwrap();
        }
    }

    #[test]
    fn test_confirm_returns_checked_in_list_order() {
        let mut s = select(&["ENT", "Ortho", "Cardio"]);
        s.handle_key(char('G')).unwrap();
        s.handle_key(char(' ')).unwrap();
        s.handle_key(char('g')).unwrap();
        s.handle_key(char(' ')).unwrap();

        assert_eq!(confirm(&mut s), vec!["ENT", "Cardio"]);
    }

    #[test]
    fn test_nothing_checked_confirms_empty() {
        let mut s = select(&["ENT"]);
        assert_eq!(confirm(&mut s), Vec::<String>::new());
    }

    #[test]
    fn test_toggle_twice_unchecks() {
        let mut s = select(&["ENT", "Ortho"]);
        s.handle_key(char(' ')).unwrap();
        s.handle_key(char(' ')).unwrap();
        assert_eq!(s.checked_count(), 0);
    }

    #[test]
    fn test_toggle_all_checks_then_clears() {
        let mut s = select(&["ENT", "Ortho", "Cardio"]);
        s.handle_key(char(' ')).unwrap();
        s.handle_key(char('a')).unwrap();
        assert_eq!(s.checked_count(), 3);
        s.handle_key(char('a')).unwrap();
        assert_eq!(s.checked_count(), 0);
    }

    #[test]
    fn test_filter_narrows_rows_and_keeps_checks() {
        let mut s = select(&["ENT: ToolA", "Ortho: Tray1", "Ortho: Tray2"]);
        s.handle_key(char(' ')).unwrap();

        type_filter(&mut s, "tray");
        assert!(s.is_filtering());
        assert_eq!(s.visible, vec![1, 2]);

        // Enter leaves filter mode; a second Enter confirms
        s.handle_key(press(KeyCode::Enter)).unwrap();
        assert!(!s.is_filtering());
        s.handle_key(char('j')).unwrap();
        s.handle_key(char(' ')).unwrap();

        assert_eq!(confirm(&mut s), vec!["ENT: ToolA", "Ortho: Tray2"]);
    }

    #[test]
    fn test_toggle_all_only_touches_visible_rows() {
        let mut s = select(&["ENT: ToolA", "Ortho: Tray1", "Ortho: Tray2"]);
        type_filter(&mut s, "ortho");
        s.handle_key(press(KeyCode::Enter)).unwrap();
        s.handle_key(char('a')).unwrap();
        assert_eq!(s.checked_items(), vec!["Ortho: Tray1", "Ortho: Tray2"]);
    }

    #[test]
    fn test_filter_mode_swallows_bound_letters() {
        let mut s = select(&["Jaw set", "Knee set"]);
        type_filter(&mut s, "jk a");
        assert_eq!(s.query, "jk a");
        assert_eq!(s.checked_count(), 0);
    }

    #[test]
    fn test_escape_clears_filter_before_bubbling() {
        let mut s = select(&["ENT", "Ortho"]);
        type_filter(&mut s, "ent");
        assert!(s.handle_key(press(KeyCode::Esc)).unwrap().is_consumed());
        assert_eq!(s.visible, vec![0, 1]);
        assert!(!s.is_filtering());

        type_filter(&mut s, "ent");
        s.handle_key(press(KeyCode::Enter)).unwrap();
        assert!(s.handle_key(press(KeyCode::Esc)).unwrap().is_consumed());
        assert!(s.query.is_empty());
        assert!(!s.handle_key(press(KeyCode::Esc)).unwrap().is_consumed());
    }

    #[test]
    fn test_no_match_leaves_no_cursor() {
        let mut s = select(&["ENT"]);
        type_filter(&mut s, "zzz");
        assert_eq!(s.state.selected(), None);
        s.handle_key(press(KeyCode::Enter)).unwrap();
        s.handle_key(char(' ')).unwrap();
        assert_eq!(s.checked_count(), 0);
    }
}
