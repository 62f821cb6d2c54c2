use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::Theme;
use crate::config::{DialogAction, KeyResolver};
use crate::notice::{Notice, NoticeLevel};
use crate::ui::{Component, EventResult, Result};

#[derive(Debug, PartialEq, Eq)]
pub enum MessageDialogEvent {
    Dismissed,
}

/// Modal message box for a [`Notice`], colored by its level.
pub struct MessageDialog {
    notice: Notice,
    resolver: Arc<KeyResolver>,
}

impl MessageDialog {
    pub const fn new(notice: Notice, resolver: Arc<KeyResolver>) -> Self {
        Self { notice, resolver }
    }

    #[cfg(test)]
    pub const fn notice(&self) -> &Notice {
        &self.notice
    }
}

impl Component for MessageDialog {
    type Output = MessageDialogEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.resolver.matches_dialog(&key, DialogAction::Dismiss) {
            return Ok(MessageDialogEvent::Dismissed.into());
        }
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup_area = area.centered(Constraint::Percentage(60), Constraint::Percentage(40));
        frame.render_widget(Clear, popup_area);

        let accent = match self.notice.level {
            NoticeLevel::Info => theme.info(),
            NoticeLevel::Warning => theme.warning(),
            NoticeLevel::Error => theme.error(),
        };

        let mut lines = vec![Line::from("")];
        lines.extend(
            self.notice
                .message
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(theme.text())))),
        );
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(
                "Press {} to dismiss",
                self.resolver.display_dialog(DialogAction::Dismiss)
            ),
            Style::default().fg(theme.overlay1()),
        )));

        let block = Block::default()
            .title(format!(" {} ", self.notice.title))
            .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(theme.base()));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}
