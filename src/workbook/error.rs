use std::path::PathBuf;

use thiserror::Error;

pub type WorkbookResult<T> = Result<T, WorkbookError>;

#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("cannot open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("cannot read sheet '{sheet}': {source}")]
    Read {
        sheet: String,
        #[source]
        source: calamine::Error,
    },

    #[error("workbook contains no worksheet")]
    NoWorksheet,

    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("cannot update '{}': {source}", path.display())]
    Modify {
        path: PathBuf,
        #[source]
        source: umya_spreadsheet::XlsxError,
    },

    #[error("cannot add sheet: {0}")]
    Sheet(String),

    #[error("xlsx write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
}
