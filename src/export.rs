//! The export dialog sequence.
//!
//! [`ExportFlow`] is a small state machine driven by the App: it hands out a
//! [`Prompt`] for the App to show, receives the user's [`Answer`], and either
//! asks the next question or finishes with an optional [`Notice`]. All file
//! writes happen inside [`ExportFlow::respond`].
//!
//! ```text
//! DoctorName ──cancel──▶ (silent)
//!     │
//!     ├─ {name}.xlsx exists ──▶ ConfirmAppend ──yes──▶ append sheet
//!     │                             └──no──▶ SaveAs ──▶ [ConfirmOverwrite] ──▶ write + open
//!     └─ missing ──▶ ConfirmCreate ──yes──▶ write + open
//! ```

mod launcher;

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, warn};

pub use launcher::{Launcher, NoopLauncher, SystemLauncher};

use crate::notice::Notice;
use crate::workbook::{self, ContainerEntry, SheetName, WorkbookResult};

const XLSX_EXTENSION: &str = "xlsx";
const CANCELED: &str = "Operation canceled.";

/// A question the App must put to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    DoctorName,
    ConfirmAppend { file_name: String },
    ConfirmCreate { file_name: String },
    SaveAs { suggested: PathBuf },
    ConfirmOverwrite { path: PathBuf },
}

impl Prompt {
    pub const fn title(&self) -> &'static str {
        match self {
            Self::DoctorName => "Enter Doctor's Name",
            Self::ConfirmAppend { .. } => "File Exists",
            Self::ConfirmCreate { .. } => "File Not Found",
            Self::SaveAs { .. } => "Save As",
            Self::ConfirmOverwrite { .. } => "Overwrite File",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::DoctorName => "Please enter the doctor's name".to_string(),
            Self::ConfirmAppend { file_name } => {
                format!("File '{file_name}' already exists. Do you want to append to this file?")
            }
            Self::ConfirmCreate { file_name } => {
                format!("File '{file_name}' does not exist. Do you want to create a new file?")
            }
            Self::SaveAs { .. } => "Save selected instruments to".to_string(),
            Self::ConfirmOverwrite { path } => {
                format!("'{}' already exists. Do you want to replace it?", path.display())
            }
        }
    }

    /// Whether the prompt takes free text rather than yes/no.
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::DoctorName | Self::SaveAs { .. })
    }
}

/// The user's reply to a [`Prompt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Submitted(String),
    Cancelled,
    Yes,
    No,
}

/// What the App should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Prompt(Prompt),
    /// The flow is over. `None` means it was abandoned silently.
    Finished(Option<Notice>),
}

#[derive(Debug)]
enum State {
    DoctorName,
    AppendChoice { file_name: String, path: PathBuf },
    CreateChoice { file_name: String, path: PathBuf },
    SaveAs { suggested: PathBuf },
    Overwrite { path: PathBuf },
    Done,
}

pub struct ExportFlow {
    rows: Vec<ContainerEntry>,
    output_dir: PathBuf,
    launcher: Box<dyn Launcher>,
    clock: fn() -> NaiveDateTime,
    state: State,
}

impl ExportFlow {
    pub fn new(rows: Vec<ContainerEntry>, output_dir: PathBuf, launcher: Box<dyn Launcher>) -> Self {
        Self {
            rows,
            output_dir,
            launcher,
            clock: || Local::now().naive_local(),
            state: State::DoctorName,
        }
    }

    #[cfg(test)]
    fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// First step. Refuses to go anywhere without rows to export.
    pub fn start(&mut self) -> Step {
        if self.rows.is_empty() {
            self.state = State::Done;
            return Step::Finished(Some(Notice::warning("No containers selected.")));
        }
        self.state = State::DoctorName;
        Step::Prompt(Prompt::DoctorName)
    }

    /// The question currently awaiting an answer, if any.
    pub fn prompt(&self) -> Option<Prompt> {
        match &self.state {
            State::DoctorName => Some(Prompt::DoctorName),
            State::AppendChoice { file_name, .. } => Some(Prompt::ConfirmAppend {
                file_name: file_name.clone(),
            }),
            State::CreateChoice { file_name, .. } => Some(Prompt::ConfirmCreate {
                file_name: file_name.clone(),
            }),
            State::SaveAs { suggested } => Some(Prompt::SaveAs {
                suggested: suggested.clone(),
            }),
            State::Overwrite { path } => Some(Prompt::ConfirmOverwrite { path: path.clone() }),
            State::Done => None,
        }
    }

    /// Feed the user's answer to the current prompt.
    ///
    /// # Errors
    /// Workbook write failures are returned as-is; the flow is finished
    /// afterwards and nothing is rolled back.
    pub fn respond(&mut self, answer: Answer) -> WorkbookResult<Step> {
        let state = std::mem::replace(&mut self.state, State::Done);
        debug!("Export flow: {:?} <- {:?}", state, answer);

        let step = match (state, answer) {
            (State::DoctorName, Answer::Cancelled) => {
                info!("Doctor name prompt cancelled, export abandoned");
                Step::Finished(None)
            }
            (State::DoctorName, Answer::Submitted(name)) => self.choose_target(&name),

            (State::AppendChoice { file_name, path }, Answer::Yes) => self.append(&file_name, &path)?,
            (State::AppendChoice { path, .. }, Answer::No) => {
                self.state = State::SaveAs {
                    suggested: path.clone(),
                };
                Step::Prompt(Prompt::SaveAs { suggested: path })
            }

            (State::SaveAs { .. }, Answer::Cancelled) => Step::Finished(Some(Notice::warning(CANCELED))),
            (State::SaveAs { .. }, Answer::Submitted(raw)) => {
                let raw = raw.trim();
                if raw.is_empty() {
                    Step::Finished(Some(Notice::warning(CANCELED)))
                } else {
                    let path = self.save_as_path(raw);
                    if path.exists() {
                        self.state = State::Overwrite { path: path.clone() };
                        Step::Prompt(Prompt::ConfirmOverwrite { path })
                    } else {
                        self.save_as(&path)?
                    }
                }
            }

            (State::Overwrite { path }, Answer::Yes) => self.save_as(&path)?,
            (State::Overwrite { .. }, Answer::No | Answer::Cancelled) => {
                Step::Finished(Some(Notice::warning(CANCELED)))
            }

            (State::CreateChoice { file_name, path }, Answer::Yes) => self.create(&file_name, &path)?,
            (State::CreateChoice { .. }, Answer::No | Answer::Cancelled) => {
                Step::Finished(Some(Notice::warning(CANCELED)))
            }

            (State::AppendChoice { .. }, Answer::Cancelled) => {
                Step::Finished(Some(Notice::warning(CANCELED)))
            }

            (State::Done, _) => Step::Finished(None),

            // An answer of the wrong kind leaves the question open.
            (state, answer) => {
                warn!("Ignoring {:?} while in {:?}", answer, state);
                self.state = state;
                self.prompt().map_or(Step::Finished(None), Step::Prompt)
            }
        };

        Ok(step)
    }

    fn choose_target(&mut self, name: &str) -> Step {
        let name = name.trim();
        if name.is_empty() || name.contains(['/', '\\']) {
            return Step::Finished(Some(Notice::warning("Invalid doctor name.")));
        }

        let file_name = format!("{name}.{XLSX_EXTENSION}");
        let path = self.output_dir.join(&file_name);

        if path.is_file() {
            debug!("{} exists, asking to append", path.display());
            self.state = State::AppendChoice {
                file_name: file_name.clone(),
                path,
            };
            Step::Prompt(Prompt::ConfirmAppend { file_name })
        } else {
            debug!("{} does not exist, asking to create", path.display());
            self.state = State::CreateChoice {
                file_name: file_name.clone(),
                path,
            };
            Step::Prompt(Prompt::ConfirmCreate { file_name })
        }
    }

    fn sheet_name(&self) -> SheetName {
        // start() guarantees at least one row
        let service = self.rows.first().map_or("", |r| r.service.as_str());
        SheetName::timestamped(service, (self.clock)())
    }

    fn append(&self, file_name: &str, path: &Path) -> WorkbookResult<Step> {
        let sheet = workbook::append_sheet(path, &self.sheet_name(), &self.rows)?;
        Ok(Step::Finished(Some(Notice::info(
            "Export Successful",
            format!("Selected instruments appended to '{sheet}' in '{file_name}' successfully."),
        ))))
    }

    fn create(&self, file_name: &str, path: &Path) -> WorkbookResult<Step> {
        let sheet = self.sheet_name().render();
        workbook::write_new(path, &sheet, &self.rows)?;
        let message = self.open_written(
            path,
            format!("Selected instruments exported to '{sheet}' in '{file_name}' successfully."),
        );
        Ok(Step::Finished(Some(Notice::info("Export Successful", message))))
    }

    fn save_as(&self, path: &Path) -> WorkbookResult<Step> {
        let sheet = self.sheet_name().render();
        workbook::write_new(path, &sheet, &self.rows)?;
        let message = self.open_written(path, "Selected instruments exported successfully.".to_string());
        Ok(Step::Finished(Some(Notice::info("Export Successful", message))))
    }

    fn open_written(&self, path: &Path, message: String) -> String {
        match self.launcher.open(path) {
            Ok(()) => message,
            Err(err) => {
                warn!("Failed to open {}: {}", path.display(), err);
                format!("{message}\n(Could not open the file: {err})")
            }
        }
    }

    /// Relative paths are taken from the output directory. Anything not
    /// already ending in `.xlsx` gets it appended.
    fn save_as_path(&self, raw: &str) -> PathBuf {
        let mut path = PathBuf::from(raw);
        if path.is_relative() {
            path = self.output_dir.join(path);
        }
        let has_xlsx = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(XLSX_EXTENSION));
        if !has_xlsx {
            let mut raw = path.into_os_string();
            raw.push(".");
            raw.push(XLSX_EXTENSION);
            path = PathBuf::from(raw);
        }
        path
    }
}
