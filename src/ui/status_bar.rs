use std::path::{Path, PathBuf};
use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Theme;
use crate::config::{GlobalAction, KeyResolver};

/// A key hint: the key label and what it does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    pub key: String,
    pub description: String,
}

impl Keybinding {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
        }
    }
}

struct LoadedWorkbook {
    name: String,
    services: usize,
    containers: usize,
}

/// Bottom panel: what is loaded on the left, key hints on the right.
pub struct StatusBar {
    workbook: Option<LoadedWorkbook>,
    output_dir: PathBuf,
    resolver: Arc<KeyResolver>,
}

impl StatusBar {
    pub const fn new(output_dir: PathBuf, resolver: Arc<KeyResolver>) -> Self {
        Self {
            workbook: None,
            output_dir,
            resolver,
        }
    }

    pub fn set_workbook(&mut self, path: &Path, services: usize, containers: usize) {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        self.workbook = Some(LoadedWorkbook {
            name,
            services,
            containers,
        });
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme, local: &[Keybinding]) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [info_area, keys_area] =
            Layout::horizontal([Constraint::Length(40), Constraint::Min(20)]).areas(inner);
        self.render_info(frame, info_area, theme);

        let hints: Vec<Keybinding> = local.iter().cloned().chain(self.global_keybindings()).collect();
        render_keybindings(frame, keys_area, theme, &hints);
    }

    fn render_info(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let w = area.width as usize;
        let label_style = Style::default().fg(theme.overlay1());
        let value_style = Style::default().fg(theme.text());

        let mut lines = match &self.workbook {
            Some(wb) => vec![
                Line::from(Span::styled(
                    truncate_str(&wb.name, w),
                    Style::default().fg(theme.lavender()).add_modifier(Modifier::BOLD),
                )),
                status_line("services", &wb.services.to_string(), w, label_style, value_style),
                status_line("rows", &wb.containers.to_string(), w, label_style, value_style),
            ],
            None => vec![Line::from(Span::styled(
                "No workbook loaded",
                Style::default().fg(theme.overlay0()).add_modifier(Modifier::BOLD),
            ))],
        };
        lines.push(status_line(
            "output",
            &self.output_dir.display().to_string(),
            w,
            label_style,
            value_style,
        ));

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn global_keybindings(&self) -> Vec<Keybinding> {
        vec![
            Keybinding::new(self.resolver.display_global(GlobalAction::Back), "Back"),
            Keybinding::new(self.resolver.display_global(GlobalAction::Quit), "Quit"),
        ]
    }
}

/// Lay hints out column by column, aligning the separators.
fn render_keybindings(frame: &mut Frame, area: Rect, theme: &Theme, hints: &[Keybinding]) {
    if hints.is_empty() || area.height == 0 {
        return;
    }

    let key_w = hints.iter().map(|kb| kb.key.chars().count()).max().unwrap_or(1);
    let desc_w = hints
        .iter()
        .map(|kb| kb.description.chars().count())
        .max()
        .unwrap_or(1);
    // key + " │ " + description + gap
    let col_width = u16::try_from(key_w + 3 + desc_w + 2).unwrap_or(u16::MAX);
    let num_cols = (area.width / col_width).max(1) as usize;
    let num_rows = area.height as usize;

    let mut columns: Vec<Vec<Line>> = vec![Vec::new(); num_cols];
    for (i, kb) in hints.iter().enumerate() {
        let col = i / num_rows;
        if col >= num_cols {
            break;
        }
        columns[col].push(Line::from(vec![
            Span::styled(format!("{:>key_w$}", kb.key), Style::default().fg(theme.peach())),
            Span::styled(" │ ", Style::default().fg(theme.surface2())),
            Span::styled(kb.description.clone(), Style::default().fg(theme.subtext0())),
        ]));
    }

    let col_areas = Layout::horizontal(vec![Constraint::Length(col_width); num_cols]).split(area);
    for (lines, col_area) in columns.into_iter().zip(col_areas.iter()) {
        frame.render_widget(Paragraph::new(lines), *col_area);
    }
}

fn status_line<'a>(
    label: &'a str,
    value: &str,
    max_width: usize,
    label_style: Style,
    value_style: Style,
) -> Line<'a> {
    const LABEL_W: usize = 9;
    let available = max_width.saturating_sub(LABEL_W + 1);
    Line::from(vec![
        Span::styled(format!("{label:>LABEL_W$}"), label_style),
        Span::raw(" "),
        Span::styled(truncate_str(value, available), value_style),
    ])
}

/// Shorten to `max_width` characters, ending in "..." when cut.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return s.chars().take(max_width).collect();
    }
    let kept: String = s.chars().take(max_width - 3).collect();
    format!("{kept}...")
}
