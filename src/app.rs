use std::path::{Path, PathBuf};
use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use tracing::{debug, info, warn};

use crate::Theme;
use crate::config::{GlobalAction, KeyResolver};
use crate::export::{Answer, ExportFlow, Launcher, NoopLauncher, Prompt, Step, SystemLauncher};
use crate::notice::Notice;
use crate::screen::{
    ContainerSelectEvent, ContainerSelectScreen, FilePickerEvent, FilePickerScreen, HomeEvent,
    HomeScreen, ServiceSelectEvent, ServiceSelectScreen,
};
use crate::tui::{Event, Tui};
use crate::ui::{
    Component, ConfirmDialog, ConfirmEvent, EventResult, Keybinding, MessageDialog,
    MessageDialogEvent, Screen, StatusBar, TextInput, TextInputEvent,
};
use crate::workbook::{self, ServiceCatalog};

const FRAME_RATE: f64 = 30.0;
const STATUS_BAR_HEIGHT: u16 = 6;

/// Settings resolved from the config file and the command line.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub start_dir: PathBuf,
    pub output_dir: PathBuf,
    pub open_after_export: bool,
}

enum View {
    Home(HomeScreen),
    FilePicker(FilePickerScreen),
    Services(ServiceSelectScreen),
    Containers(ContainerSelectScreen),
}

/// What a view asked the App to do.
enum Action {
    OpenPicker,
    Load(PathBuf),
    Show(Notice),
    ChooseContainers(Vec<String>),
    Export(Vec<workbook::ContainerEntry>),
}

enum Overlay {
    Message(MessageDialog),
    Confirm(ConfirmDialog),
    Input(TextInput),
}

pub struct App {
    views: Vec<View>,
    overlay: Option<Overlay>,
    export: Option<ExportFlow>,
    catalog: Arc<ServiceCatalog>,
    status_bar: StatusBar,
    options: AppOptions,
    resolver: Arc<KeyResolver>,
    theme: Theme,
    should_quit: bool,
    should_suspend: bool,
}

impl App {
    pub fn new(options: AppOptions, resolver: Arc<KeyResolver>, theme: Theme) -> Self {
        Self {
            views: vec![View::Home(HomeScreen::new(resolver.clone()))],
            overlay: None,
            export: None,
            catalog: Arc::new(ServiceCatalog::default()),
            status_bar: StatusBar::new(options.output_dir.clone(), resolver.clone()),
            options,
            resolver,
            theme,
            should_quit: false,
            should_suspend: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new(FRAME_RATE)?;
        tui.enter()?;
        let result = self.event_loop(&mut tui).await;
        // Restore the terminal before any error report is printed
        tui.exit()?;
        result
    }

    async fn event_loop(&mut self, tui: &mut Tui) -> Result<()> {
        while let Some(event) = tui.next_event().await {
            match event {
                Event::Quit => self.should_quit = true,
                Event::Render => self.draw(tui)?,
                Event::Resize(width, height) => {
                    debug!("Resized to {}x{}", width, height);
                    self.draw(tui)?;
                }
                Event::Key(key) => self.handle_key(key)?,
                Event::Paste(text) => {
                    if let Some(Overlay::Input(input)) = &mut self.overlay {
                        input.handle_paste(&text);
                    }
                }
                Event::Error(e) => warn!("Terminal event error: {}", e),
            }

            if self.should_suspend {
                tui.suspend()?;
                tui.resume()?;
                self.should_suspend = false;
            }
            if self.should_quit {
                info!("Quitting");
                break;
            }
        }
        Ok(())
    }

    /// Load a workbook and move on to service selection, or report why not.
    /// The App always ends up on the home view or the service view.
    pub fn open_workbook(&mut self, path: &Path) {
        self.views.truncate(1);
        match workbook::load_catalog(path) {
            Ok(catalog) => {
                let rows: usize = catalog.groups().iter().map(|g| g.containers.len()).sum();
                info!(
                    "Loaded {} services ({} rows) from {}",
                    catalog.len(),
                    rows,
                    path.display()
                );
                self.status_bar.set_workbook(path, catalog.len(), rows);
                self.catalog = Arc::new(catalog);
                self.views.push(View::Services(ServiceSelectScreen::new(
                    &self.catalog,
                    self.resolver.clone(),
                )));
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
                self.show(Notice::error(format!("Failed to read Excel file: {e}")));
            }
        }
    }

    /// Route a key press: the overlay gets it first, then the top view, then
    /// the global bindings.
    ///
    /// # Errors
    /// Export write failures are returned unchanged and end the program.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.overlay.is_some() {
            return self.handle_overlay_key(key);
        }
        if self.resolver.matches_global(&key, GlobalAction::Suspend) {
            self.should_suspend = true;
            return Ok(());
        }

        let action = match self.views.last_mut() {
            Some(View::Home(screen)) => map_event(screen.handle_key(key)?, |e| match e {
                HomeEvent::OpenPicker => Action::OpenPicker,
            }),
            Some(View::FilePicker(screen)) => map_event(screen.handle_key(key)?, |e| match e {
                FilePickerEvent::Chosen(path) => Action::Load(path),
                FilePickerEvent::Failed(notice) => Action::Show(notice),
            }),
            Some(View::Services(screen)) => map_event(screen.handle_key(key)?, |e| match e {
                ServiceSelectEvent::Continue(services) => Action::ChooseContainers(services),
            }),
            Some(View::Containers(screen)) => map_event(screen.handle_key(key)?, |e| match e {
                ContainerSelectEvent::Export(entries) => Action::Export(entries),
            }),
            None => EventResult::Ignored,
        };

        match action {
            EventResult::Event(action) => self.perform(action),
            EventResult::Consumed => {}
            EventResult::Ignored => self.handle_global_key(key),
        }
        Ok(())
    }

    fn handle_global_key(&mut self, key: KeyEvent) {
        if self.resolver.matches_global(&key, GlobalAction::Back) {
            if self.views.len() > 1 {
                self.views.pop();
            }
        } else if self.resolver.matches_global(&key, GlobalAction::Quit) {
            self.should_quit = true;
        }
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::OpenPicker => {
                let picker = FilePickerScreen::new(self.options.start_dir.clone(), self.resolver.clone());
                self.views.push(View::FilePicker(picker));
            }
            Action::Load(path) => self.open_workbook(&path),
            Action::Show(notice) => self.show(notice),
            Action::ChooseContainers(services) => {
                debug!("Services chosen: {:?}", services);
                let screen =
                    ContainerSelectScreen::new(&self.catalog, &services, self.resolver.clone());
                self.views.push(View::Containers(screen));
            }
            Action::Export(entries) => {
                info!("Starting export of {} rows", entries.len());
                let mut flow =
                    ExportFlow::new(entries, self.options.output_dir.clone(), self.launcher());
                let step = flow.start();
                self.export = Some(flow);
                self.apply_step(step);
            }
        }
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) -> Result<()> {
        let answer = match &mut self.overlay {
            Some(Overlay::Message(dialog)) => {
                if let EventResult::Event(MessageDialogEvent::Dismissed) = dialog.handle_key(key)? {
                    self.overlay = None;
                }
                return Ok(());
            }
            Some(Overlay::Confirm(dialog)) => match dialog.handle_key(key)? {
                EventResult::Event(ConfirmEvent::Confirmed) => Answer::Yes,
                EventResult::Event(ConfirmEvent::Cancelled) => Answer::No,
                _ => return Ok(()),
            },
            Some(Overlay::Input(input)) => match input.handle_key(key)? {
                EventResult::Event(TextInputEvent::Submitted(text)) => Answer::Submitted(text),
                EventResult::Event(TextInputEvent::Cancelled) => Answer::Cancelled,
                _ => return Ok(()),
            },
            None => return Ok(()),
        };

        self.overlay = None;
        if let Some(flow) = &mut self.export {
            let step = flow.respond(answer)?;
            self.apply_step(step);
        }
        Ok(())
    }

    fn apply_step(&mut self, step: Step) {
        match step {
            Step::Prompt(prompt) => self.overlay = Some(self.prompt_overlay(&prompt)),
            Step::Finished(notice) => {
                self.export = None;
                if let Some(notice) = notice {
                    self.show(notice);
                }
            }
        }
    }

    fn prompt_overlay(&self, prompt: &Prompt) -> Overlay {
        if !prompt.is_text() {
            return Overlay::Confirm(
                ConfirmDialog::new(prompt.message(), self.resolver.clone()).with_title(prompt.title()),
            );
        }
        let input = TextInput::new(prompt.title());
        Overlay::Input(match prompt {
            Prompt::SaveAs { suggested } => input.with_value(suggested.display().to_string()),
            _ => input.with_placeholder(prompt.message()),
        })
    }

    fn show(&mut self, notice: Notice) {
        debug!("Showing {:?}: {}", notice.level, notice.message);
        self.overlay = Some(Overlay::Message(MessageDialog::new(notice, self.resolver.clone())));
    }

    fn launcher(&self) -> Box<dyn Launcher> {
        if self.options.open_after_export {
            Box::new(SystemLauncher)
        } else {
            Box::new(NoopLauncher)
        }
    }

    fn draw(&mut self, tui: &mut Tui) -> Result<()> {
        tui.draw(|frame| self.render(frame))?;
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .areas(frame.area());

        self.render_breadcrumbs(frame, header);

        let theme = self.theme;
        let local = match self.views.last_mut() {
            Some(View::Home(screen)) => render_view(screen, frame, body, &theme),
            Some(View::FilePicker(screen)) => render_view(screen, frame, body, &theme),
            Some(View::Services(screen)) => render_view(screen, frame, body, &theme),
            Some(View::Containers(screen)) => render_view(screen, frame, body, &theme),
            None => vec![],
        };
        self.status_bar.render(frame, footer, &theme, &local);

        match &mut self.overlay {
            Some(Overlay::Message(dialog)) => dialog.render(frame, body, &theme),
            Some(Overlay::Confirm(dialog)) => dialog.render(frame, body, &theme),
            Some(Overlay::Input(input)) => input.render(frame, body, &theme),
            None => {}
        }
    }

    fn render_breadcrumbs(&self, frame: &mut Frame, area: Rect) {
        let separator = Span::styled(" › ", Style::default().fg(self.theme.overlay0()));
        let mut spans = vec![Span::styled(
            " instrument-selector ",
            Style::default()
                .fg(self.theme.base())
                .bg(self.theme.mauve())
                .add_modifier(Modifier::BOLD),
        )];
        for crumb in self.breadcrumbs() {
            spans.push(separator.clone());
            spans.push(Span::styled(crumb, Style::default().fg(self.theme.text())));
        }
        frame.render_widget(Line::from(spans), area);
    }

    fn breadcrumbs(&self) -> Vec<String> {
        self.views
            .iter()
            .map(|view| match view {
                View::Home(s) => s.breadcrumb(),
                View::FilePicker(s) => s.breadcrumb(),
                View::Services(s) => s.breadcrumb(),
                View::Containers(s) => s.breadcrumb(),
            })
            .collect()
    }
}

fn map_event<E>(result: EventResult<E>, f: impl FnOnce(E) -> Action) -> EventResult<Action> {
    match result {
        EventResult::Event(e) => EventResult::Event(f(e)),
        EventResult::Consumed => EventResult::Consumed,
        EventResult::Ignored => EventResult::Ignored,
    }
}

fn render_view<S: Screen>(screen: &mut S, frame: &mut Frame, area: Rect, theme: &Theme) -> Vec<Keybinding> {
    screen.render(frame, area, theme);
    screen.keybindings()
}

#[cfg(test)]
mod tests {
    use calamine::{Reader, open_workbook_auto};
    use crossterm::event::{KeyCode, KeyModifiers};
    use pretty_assertions::assert_eq;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    use super::*;
    use crate::notice::NoticeLevel;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn source_workbook(dir: &Path) -> PathBuf {
        let path = dir.join("instruments.xlsx");
        let mut wb = Workbook::new();
        let sheet = wb.add_worksheet();
        let rows = [
            ("Service", "Container Name"),
            ("Ortho", "Tray1"),
            ("Ortho", "Tray2"),
            ("ENT", "ToolA"),
        ];
        for (r, (service, container)) in (0u32..).zip(rows) {
            sheet.write_string(r, 0, service).unwrap();
            sheet.write_string(r, 1, container).unwrap();
        }
        wb.save(&path).unwrap();
        path
    }

    fn app(output_dir: &Path) -> App {
        App::new(
            AppOptions {
                start_dir: output_dir.to_path_buf(),
                output_dir: output_dir.to_path_buf(),
                open_after_export: false,
            },
            Arc::new(KeyResolver::default()),
            Theme::default(),
        )
    }

    fn shown(app: &App) -> Option<&Notice> {
        match &app.overlay {
            Some(Overlay::Message(dialog)) => Some(dialog.notice()),
            _ => None,
        }
    }

    /// Load the fixture, tick Ortho and both of its containers.
    fn select_ortho(app: &mut App, source: &Path) {
        app.open_workbook(source);
        // ENT, Ortho
        press(app, KeyCode::Char('j'));
        press(app, KeyCode::Char(' '));
        press(app, KeyCode::Enter);
        press(app, KeyCode::Char('a'));
    }

    #[test]
    fn test_export_to_new_doctor_file() {
        let dir = TempDir::new().unwrap();
        let source = source_workbook(dir.path());
        let mut app = app(dir.path());

        select_ortho(&mut app, &source);
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Smith");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('y'));

        let notice = shown(&app).unwrap();
        assert_eq!(notice.level, NoticeLevel::Info);
        assert!(notice.message.ends_with("in 'Smith.xlsx' successfully."));

        let target = dir.path().join("Smith.xlsx");
        let mut written = open_workbook_auto(&target).unwrap();
        let sheets = written.sheet_names();
        assert_eq!(sheets.len(), 1);
        assert!(sheets[0].starts_with("Ortho_"));
        let rows: Vec<Vec<String>> = written
            .worksheet_range(&sheets[0])
            .unwrap()
            .rows()
            .map(|r| r.iter().map(ToString::to_string).collect())
            .collect();
        assert_eq!(
            rows,
            vec![
                vec!["Service", "Container Name"],
                vec!["Ortho", "Tray1"],
                vec!["Ortho", "Tray2"],
            ]
        );
    }

    #[test]
    fn test_empty_selection_warns_and_stays() {
        let dir = TempDir::new().unwrap();
        let source = source_workbook(dir.path());
        let mut app = app(dir.path());

        select_ortho(&mut app, &source);
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(shown(&app), Some(&Notice::warning("No containers selected.")));
        assert!(matches!(app.views.last(), Some(View::Containers(_))));
        assert!(app.export.is_none());

        press(&mut app, KeyCode::Enter);
        assert!(app.overlay.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_cancelled_doctor_name_is_silent() {
        let dir = TempDir::new().unwrap();
        let source = source_workbook(dir.path());
        let mut app = app(dir.path());

        select_ortho(&mut app, &source);
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Smith");
        press(&mut app, KeyCode::Esc);

        assert!(app.overlay.is_none());
        assert!(app.export.is_none());
        assert!(!dir.path().join("Smith.xlsx").exists());
    }

    #[test]
    fn test_unreadable_workbook_reports_and_returns_home() {
        let dir = TempDir::new().unwrap();
        let bogus = dir.path().join("broken.xlsx");
        std::fs::write(&bogus, b"not a workbook").unwrap();
        let mut app = app(dir.path());

        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.views.last(), Some(View::FilePicker(_))));
        app.open_workbook(&bogus);

        let notice = shown(&app).unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.starts_with("Failed to read Excel file: "));
        assert_eq!(app.views.len(), 1);
    }

    #[test]
    fn test_back_pops_views_and_quit_stops() {
        let dir = TempDir::new().unwrap();
        let source = source_workbook(dir.path());
        let mut app = app(dir.path());

        select_ortho(&mut app, &source);
        assert_eq!(app.breadcrumbs(), vec!["Home", "Services", "Containers"]);

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.breadcrumbs(), vec!["Home"]);
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_write_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let source = source_workbook(dir.path());
        let mut app = app(&dir.path().join("no-such-dir"));

        select_ortho(&mut app, &source);
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Smith");
        press(&mut app, KeyCode::Enter);

        let result = app.handle_key(KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE));
        assert!(result.is_err());
    }
}
