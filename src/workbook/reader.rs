use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use tracing::{debug, info};

use super::catalog::{ServiceCatalog, SourceRow};
use super::error::{WorkbookError, WorkbookResult};

pub const SERVICE_COLUMN: &str = "Service";
pub const CONTAINER_COLUMN: &str = "Container Name";

/// Load the first worksheet of an `.xlsx`/`.xls` file and group it by service.
pub fn load_catalog(path: &Path) -> WorkbookResult<ServiceCatalog> {
    let mut workbook = open_workbook_auto(path).map_err(|source| WorkbookError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(WorkbookError::NoWorksheet)?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|source| WorkbookError::Read {
            sheet: sheet.clone(),
            source,
        })?;

    let rows = source_rows(&range)?;
    debug!("Read {} rows from sheet '{}'", rows.len(), sheet);

    let catalog = ServiceCatalog::from_rows(rows);
    info!(
        "Loaded {} services from {}",
        catalog.len(),
        path.display()
    );
    Ok(catalog)
}

/// Extract `(Service, Container Name)` pairs using the first row as header.
///
/// Rows with a blank service or container are skipped.
fn source_rows(range: &Range<Data>) -> WorkbookResult<Vec<SourceRow>> {
    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or(WorkbookError::MissingColumn(SERVICE_COLUMN))?;

    let service_col = find_column(header, SERVICE_COLUMN)?;
    let container_col = find_column(header, CONTAINER_COLUMN)?;

    Ok(rows
        .filter_map(|row| {
            let service = row.get(service_col).map(cell_text)?;
            let container = row.get(container_col).map(cell_text)?;
            if service.trim().is_empty() || container.trim().is_empty() {
                return None;
            }
            Some(SourceRow { service, container })
        })
        .collect())
}

fn find_column(header: &[Data], name: &'static str) -> WorkbookResult<usize> {
    header
        .iter()
        .position(|cell| cell_text(cell).trim() == name)
        .ok_or(WorkbookError::MissingColumn(name))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    use super::*;

    fn write_fixture(dir: &TempDir, name: &str, rows: &[[&str; 2]]) -> PathBuf {
        let path = dir.path().join(name);
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet.write_string(r as u32, c as u16, *value).unwrap();
                }
            }
        }
        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn test_load_groups_by_service() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(
            &dir,
            "input.xlsx",
            &[
                ["Service", "Container Name"],
                ["Ortho", "Tray1"],
                ["Ortho", "Tray2"],
                ["ENT", "ToolA"],
            ],
        );

        let catalog = load_catalog(&path).unwrap();
        let services: Vec<&str> = catalog.services().collect();
        assert_eq!(services, vec!["ENT", "Ortho"]);
        assert_eq!(catalog.containers_of("Ortho").unwrap(), &["Tray1", "Tray2"]);
        assert_eq!(catalog.containers_of("ENT").unwrap(), &["ToolA"]);
    }

    #[test]
    fn test_columns_found_in_any_position() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(
            &dir,
            "swapped.xlsx",
            &[
                ["Container Name", " Service "],
                ["Tray1", "Ortho"],
            ],
        );

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.containers_of("Ortho").unwrap(), &["Tray1"]);
    }

    #[test]
    fn test_blank_cells_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(
            &dir,
            "blanks.xlsx",
            &[
                ["Service", "Container Name"],
                ["Ortho", "Tray1"],
                ["", "Orphan"],
                ["ENT", ""],
            ],
        );

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.containers_of("Ortho").unwrap(), &["Tray1"]);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(
            &dir,
            "bad.xlsx",
            &[["Service", "Instrument"], ["Ortho", "Tray1"]],
        );

        let err = load_catalog(&path).unwrap_err();
        assert!(matches!(err, WorkbookError::MissingColumn(CONTAINER_COLUMN)));
        assert_eq!(err.to_string(), "missing column 'Container Name'");
    }

    #[test]
    fn test_missing_file_is_an_open_error() {
        let dir = TempDir::new().unwrap();
        let err = load_catalog(&dir.path().join("nope.xlsx")).unwrap_err();
        assert!(matches!(err, WorkbookError::Open { .. }));
    }

    #[test]
    fn test_corrupt_file_is_an_open_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.xlsx");
        std::fs::write(&path, b"definitely not a zip archive").unwrap();
        assert!(load_catalog(&path).is_err());
    }
}
