use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::ListItem;
use tracing::{debug, warn};

use crate::Theme;
use crate::config::{KeyResolver, NavAction};
use crate::notice::Notice;
use crate::ui::{Component, EventResult, Keybinding, List, ListEvent, ListRow, Result, Screen};

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xls"];

#[derive(Debug, PartialEq, Eq)]
pub enum FilePickerEvent {
    Chosen(PathBuf),
    Failed(Notice),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Parent(PathBuf),
    Dir(PathBuf),
    Workbook(PathBuf),
}

impl Entry {
    fn name(path: &Path) -> String {
        path.file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
    }
}

impl ListRow for Entry {
    fn render_row(&self, theme: &Theme) -> ListItem<'static> {
        match self {
            Self::Parent(_) => ListItem::new("..").style(Style::default().fg(theme.overlay1())),
            Self::Dir(path) => ListItem::new(format!("{}/", Self::name(path)))
                .style(Style::default().fg(theme.blue()).add_modifier(Modifier::BOLD)),
            Self::Workbook(path) => {
                ListItem::new(Self::name(path)).style(Style::default().fg(theme.text()))
            }
        }
    }
}

fn is_workbook(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        WORKBOOK_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    })
}

/// `..` first (unless at the root), then folders, then workbooks, each group
/// sorted case-insensitively. Hidden entries are skipped.
fn read_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut dirs = Vec::new();
    let mut workbooks = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if Entry::name(&path).starts_with('.') {
            continue;
        }
        if path.is_dir() {
            dirs.push(path);
        } else if is_workbook(&path) {
            workbooks.push(path);
        }
    }

    let by_name = |a: &PathBuf, b: &PathBuf| {
        Entry::name(a)
            .to_lowercase()
            .cmp(&Entry::name(b).to_lowercase())
    };
    dirs.sort_by(by_name);
    workbooks.sort_by(by_name);

    let parent = dir.parent().map(|p| Entry::Parent(p.to_path_buf()));
    Ok(parent
        .into_iter()
        .chain(dirs.into_iter().map(Entry::Dir))
        .chain(workbooks.into_iter().map(Entry::Workbook))
        .collect())
}

/// Directory browser that only shows folders and Excel workbooks.
pub struct FilePickerScreen {
    dir: PathBuf,
    list: List<Entry>,
    resolver: Arc<KeyResolver>,
}

impl FilePickerScreen {
    /// Starts in `start_dir`, or shows an empty listing if it cannot be read.
    pub fn new(start_dir: PathBuf, resolver: Arc<KeyResolver>) -> Self {
        let dir = std::path::absolute(&start_dir).unwrap_or(start_dir);
        let entries = read_entries(&dir).unwrap_or_else(|e| {
            warn!("Cannot list {}: {}", dir.display(), e);
            dir.parent()
                .map(|p| vec![Entry::Parent(p.to_path_buf())])
                .unwrap_or_default()
        });
        let list = List::new(entries, resolver.clone())
            .with_title(format!(" {} ", dir.display()))
            .with_empty_text("No folders or Excel files here");
        Self {
            dir,
            list,
            resolver,
        }
    }

    #[cfg(test)]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn enter_dir(&mut self, dir: PathBuf) -> EventResult<FilePickerEvent> {
        match read_entries(&dir) {
            Ok(entries) => {
                debug!("Browsing {}", dir.display());
                self.list.set_items(entries);
                self.list.set_title(format!(" {} ", dir.display()));
                self.dir = dir;
                EventResult::Consumed
            }
            Err(e) => FilePickerEvent::Failed(Notice::error(format!(
                "Cannot open folder '{}': {e}",
                dir.display()
            )))
            .into(),
        }
    }
}

impl Screen for FilePickerScreen {
    type Output = FilePickerEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(match self.list.handle_key(key)? {
            EventResult::Event(ListEvent::Activated(Entry::Parent(dir) | Entry::Dir(dir))) => {
                self.enter_dir(dir)
            }
            EventResult::Event(ListEvent::Activated(Entry::Workbook(path))) => {
                FilePickerEvent::Chosen(path).into()
            }
            EventResult::Consumed => EventResult::Consumed,
            EventResult::Ignored => EventResult::Ignored,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.list.render(frame, area, theme);
    }

    fn breadcrumb(&self) -> String {
        "Open workbook".to_string()
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        vec![
            Keybinding::new(self.resolver.display_nav(NavAction::Select), "Open"),
            Keybinding::new(
                format!(
                    "{}/{}",
                    self.resolver.display_nav(NavAction::Up),
                    self.resolver.display_nav(NavAction::Down)
                ),
                "Move",
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crossterm::event::{KeyCode, KeyModifiers};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("archive")).unwrap();
        fs::create_dir(dir.path().join(".cache")).unwrap();
        fs::write(dir.path().join("b-instruments.XLSX"), b"").unwrap();
        fs::write(dir.path().join("a-legacy.xls"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::write(dir.path().join("archive").join("old.xlsx"), b"").unwrap();
        dir
    }

    #[test]
    fn test_lists_dirs_then_workbooks() {
        let dir = fixture();
        let names: Vec<String> = read_entries(dir.path())
            .unwrap()
            .iter()
            .map(|e| match e {
                Entry::Parent(_) => "..".to_string(),
                Entry::Dir(p) => format!("{}/", Entry::name(p)),
                Entry::Workbook(p) => Entry::name(p),
            })
            .collect();
        assert_eq!(names, vec!["..", "archive/", "a-legacy.xls", "b-instruments.XLSX"]);
    }

    #[test]
    fn test_descend_and_choose() {
        let dir = fixture();
        let mut picker =
            FilePickerScreen::new(dir.path().to_path_buf(), Arc::new(KeyResolver::default()));

        // ".." then "archive/"
        picker.handle_key(key(KeyCode::Down)).unwrap();
        picker.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(picker.dir().ends_with("archive"));

        // ".." then "old.xlsx"
        picker.handle_key(key(KeyCode::Down)).unwrap();
        let result = picker.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(
            result,
            EventResult::Event(FilePickerEvent::Chosen(picker.dir().join("old.xlsx")))
        );
    }

    #[test]
    fn test_parent_goes_up() {
        let dir = fixture();
        let start = dir.path().join("archive");
        let mut picker = FilePickerScreen::new(start, Arc::new(KeyResolver::default()));
        picker.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(picker.dir(), std::path::absolute(dir.path()).unwrap());
    }

    #[test]
    fn test_escape_is_left_to_the_app() {
        let dir = fixture();
        let mut picker =
            FilePickerScreen::new(dir.path().to_path_buf(), Arc::new(KeyResolver::default()));
        assert!(!picker.handle_key(key(KeyCode::Esc)).unwrap().is_consumed());
    }

    #[test]
    fn test_unreadable_start_dir_still_opens() {
        let dir = TempDir::new().unwrap();
        let picker = FilePickerScreen::new(dir.path().join("missing"), Arc::new(KeyResolver::default()));
        assert_eq!(picker.list.selected(), Some(&Entry::Parent(dir.path().to_path_buf())));
    }
}
