use std::path::Path;

use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::{debug, info};

use super::catalog::ContainerEntry;
use super::error::{WorkbookError, WorkbookResult};
use super::reader::{CONTAINER_COLUMN, SERVICE_COLUMN};

/// Excel refuses sheet names longer than this.
pub const SHEET_NAME_MAX: usize = 31;
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

const FORBIDDEN_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];
const SERVICE_COLUMN_WIDTH: f64 = 24.0;
const CONTAINER_COLUMN_WIDTH: f64 = 40.0;

/// Name of an exported sheet: `{service}_{YYYY-MM-DD_HH-MM-SS}`.
///
/// The service part is sanitized and shortened so the rendered name always
/// fits [`SHEET_NAME_MAX`]; the timestamp is kept whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetName {
    service: String,
    stamp: String,
}

impl SheetName {
    pub fn timestamped(service: &str, at: NaiveDateTime) -> Self {
        let service: String = service
            .chars()
            .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '-' } else { c })
            .collect();
        Self {
            service: service.trim_matches('\'').to_string(),
            stamp: at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    pub fn render(&self) -> String {
        self.with_suffix("")
    }

    /// First rendering not already in `taken` (compared case-insensitively),
    /// adding ` (2)`, ` (3)`, ... as needed.
    pub fn unique_among<S: AsRef<str>>(&self, taken: &[S]) -> String {
        let is_taken = |candidate: &str| {
            taken
                .iter()
                .any(|t| t.as_ref().to_lowercase() == candidate.to_lowercase())
        };

        let base = self.render();
        if !is_taken(&base) {
            return base;
        }
        (2u32..)
            .map(|n| self.with_suffix(&format!(" ({n})")))
            .find(|candidate| !is_taken(candidate))
            .unwrap_or(base)
    }

    fn with_suffix(&self, suffix: &str) -> String {
        let budget = SHEET_NAME_MAX
            .saturating_sub(self.stamp.chars().count() + 1 + suffix.chars().count());
        let service: String = self.service.chars().take(budget).collect();
        format!("{service}_{}{suffix}", self.stamp)
    }
}

/// Write a brand-new workbook holding a single sheet of `rows`.
pub fn write_new(path: &Path, sheet_name: &str, rows: &[ContainerEntry]) -> WorkbookResult<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name)?;
    write_rows(sheet, rows)?;
    workbook.save(path)?;

    info!(
        "Wrote {} rows to new workbook {} (sheet '{}')",
        rows.len(),
        path.display(),
        sheet_name
    );
    Ok(())
}

/// Add a sheet of `rows` to an existing workbook and return the sheet's final name.
///
/// The workbook is loaded whole, so existing sheets keep their formulas,
/// styles, merges and column widths. Only the new sheet is added.
pub fn append_sheet(path: &Path, name: &SheetName, rows: &[ContainerEntry]) -> WorkbookResult<String> {
    let mut book = umya_spreadsheet::reader::xlsx::read(path).map_err(|source| WorkbookError::Modify {
        path: path.to_path_buf(),
        source,
    })?;

    let taken: Vec<String> = book
        .get_sheet_collection()
        .iter()
        .map(|sheet| sheet.get_name().to_string())
        .collect();
    let sheet_name = name.unique_among(&taken);

    let sheet = book
        .new_sheet(&sheet_name)
        .map_err(|reason| WorkbookError::Sheet(reason.to_string()))?;
    append_rows(sheet, rows);

    umya_spreadsheet::writer::xlsx::write(&book, path).map_err(|source| WorkbookError::Modify {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "Appended sheet '{}' with {} rows to {} ({} existing sheets kept)",
        sheet_name,
        rows.len(),
        path.display(),
        taken.len()
    );
    Ok(sheet_name)
}

fn write_rows(sheet: &mut Worksheet, rows: &[ContainerEntry]) -> WorkbookResult<()> {
    let header = Format::new().set_bold();
    sheet.write_string_with_format(0, 0, SERVICE_COLUMN, &header)?;
    sheet.write_string_with_format(0, 1, CONTAINER_COLUMN, &header)?;
    sheet.set_column_width(0, SERVICE_COLUMN_WIDTH)?;
    sheet.set_column_width(1, CONTAINER_COLUMN_WIDTH)?;

    for (row, entry) in (1u32..).zip(rows) {
        sheet.write_string(row, 0, &entry.service)?;
        sheet.write_string(row, 1, &entry.container)?;
    }
    Ok(())
}

/// Same layout as [`write_rows`], on a sheet of a loaded workbook.
/// Coordinates are 1-based `(column, row)`.
fn append_rows(sheet: &mut umya_spreadsheet::Worksheet, rows: &[ContainerEntry]) {
    for (col, title) in [(1u32, SERVICE_COLUMN), (2, CONTAINER_COLUMN)] {
        sheet.get_cell_mut((col, 1)).set_value_string(title);
        sheet.get_style_mut((col, 1)).get_font_mut().set_bold(true);
    }
    sheet.get_column_dimension_mut("A").set_width(SERVICE_COLUMN_WIDTH);
    sheet.get_column_dimension_mut("B").set_width(CONTAINER_COLUMN_WIDTH);

    for (row, entry) in (2u32..).zip(rows) {
        sheet.get_cell_mut((1, row)).set_value_string(&entry.service);
        sheet.get_cell_mut((2, row)).set_value_string(&entry.container);
    }
    debug!("Filled {} rows", rows.len());
}

#[cfg(test)]
mod tests {
    use calamine::{Reader, open_workbook_auto};
    use rust_xlsxwriter::Formula;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap()
    }

    fn sheet_rows(path: &Path, sheet: &str) -> Vec<Vec<String>> {
        let mut workbook = open_workbook_auto(path).unwrap();
        let range = workbook.worksheet_range(sheet).unwrap();
        range
            .rows()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect()
    }

    fn is_set(flag: impl std::borrow::Borrow<bool>) -> bool {
        *flag.borrow()
    }

    fn sheet_names(path: &Path) -> Vec<String> {
        open_workbook_auto(path).unwrap().sheet_names()
    }

    #[test]
    fn test_sheet_name_format() {
        assert_eq!(
            SheetName::timestamped("Ortho", at()).render(),
            "Ortho_2024-03-09_14-05-07"
        );
    }

    #[test]
    fn test_sheet_name_truncates_service_only() {
        let name = SheetName::timestamped("Orthopedic Surgery", at()).render();
        assert_eq!(name, "Orthopedic _2024-03-09_14-05-07");
        assert_eq!(name.chars().count(), SHEET_NAME_MAX);
    }

    #[test]
    fn test_sheet_name_replaces_forbidden_chars() {
        let name = SheetName::timestamped("'ENT/H&N'", at()).render();
        assert_eq!(name, "ENT-H&N_2024-03-09_14-05-07");
    }

    #[test]
    fn test_unique_sheet_name_adds_suffix() {
        let name = SheetName::timestamped("Ortho", at());
        let taken = ["ortho_2024-03-09_14-05-07", "Ortho_2024-03-09_14-05-0 (2)"];
        let unique = name.unique_among(&taken);
        assert_eq!(unique, "Ortho_2024-03-09_14-05-07 (2)");
        assert!(unique.chars().count() <= SHEET_NAME_MAX);
    }

    #[test]
    fn test_write_new_creates_single_sheet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Smith.xlsx");
        let rows = vec![
            ContainerEntry::new("Ortho", "Tray1"),
            ContainerEntry::new("Ortho", "Tray2"),
        ];
        let name = SheetName::timestamped("Ortho", at()).render();

        write_new(&path, &name, &rows).unwrap();

        assert_eq!(sheet_names(&path), vec![name.clone()]);
        assert_eq!(
            sheet_rows(&path, &name),
            vec![
                vec!["Service", "Container Name"],
                vec!["Ortho", "Tray1"],
                vec!["Ortho", "Tray2"],
            ]
        );
    }

    #[test]
    fn test_append_keeps_existing_sheets() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Smith.xlsx");

        let mut original = Workbook::new();
        let first = original.add_worksheet().set_name("Notes").unwrap();
        first.write_string(0, 0, "Label").unwrap();
        first.write_number(0, 1, 42.5).unwrap();
        first.write_boolean(1, 0, true).unwrap();
        original.add_worksheet().set_name("Empty").unwrap();
        original.save(&path).unwrap();

        let rows = vec![ContainerEntry::new("ENT", "ToolA")];
        let name = append_sheet(&path, &SheetName::timestamped("ENT", at()), &rows).unwrap();

        assert_eq!(name, "ENT_2024-03-09_14-05-07");
        assert_eq!(sheet_names(&path), vec!["Notes", "Empty", name.as_str()]);
        assert_eq!(
            sheet_rows(&path, "Notes"),
            vec![vec!["Label", "42.5"], vec!["true", ""]]
        );
        assert_eq!(
            sheet_rows(&path, &name),
            vec![vec!["Service", "Container Name"], vec!["ENT", "ToolA"]]
        );
    }

    #[test]
    fn test_append_twice_in_same_second() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Jones.xlsx");
        let rows = vec![ContainerEntry::new("ENT", "ToolA")];
        let name = SheetName::timestamped("ENT", at());

        write_new(&path, &name.render(), &rows).unwrap();
        let second = append_sheet(&path, &name, &rows).unwrap();

        assert_eq!(second, "ENT_2024-03-09_14-05-07 (2)");
        assert_eq!(sheet_names(&path).len(), 2);
    }

    #[test]
    fn test_append_to_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.xlsx");
        let err = append_sheet(&path, &SheetName::timestamped("ENT", at()), &[]).unwrap_err();
        assert!(matches!(err, WorkbookError::Modify { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_append_keeps_formulas_and_styles() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Brown.xlsx");

        let mut original = Workbook::new();
        let totals = original.add_worksheet().set_name("Totals").unwrap();
        totals.write_number(0, 0, 1.0).unwrap();
        totals.write_number(1, 0, 2.0).unwrap();
        totals.write_formula(2, 0, Formula::new("=SUM(A1:A2)")).unwrap();
        totals
            .write_string_with_format(0, 1, "Count", &Format::new().set_bold())
            .unwrap();
        original.save(&path).unwrap();

        let rows = vec![ContainerEntry::new("Ortho", "Tray1")];
        let name = append_sheet(&path, &SheetName::timestamped("Ortho", at()), &rows).unwrap();

        assert_eq!(sheet_names(&path), vec!["Totals", name.as_str()]);

        let mut written = open_workbook_auto(&path).unwrap();
        let formulas = written.worksheet_formula("Totals").unwrap();
        assert_eq!(
            formulas.get_value((2, 0)).map(String::as_str),
            Some("SUM(A1:A2)")
        );

        let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
        let totals = book.get_sheet_by_name("Totals").unwrap();
        assert_eq!(totals.get_value("B1"), "Count");
        assert!(is_set(totals.get_style("B1").get_font().unwrap().get_bold()));

        let appended = book.get_sheet_by_name(&name).unwrap();
        assert!(is_set(appended.get_style("A1").get_font().unwrap().get_bold()));
        assert_eq!(appended.get_value("B2"), "Tray1");
    }
}
