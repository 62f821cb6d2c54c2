//! Reading source workbooks and writing per-doctor export workbooks.

mod catalog;
mod error;
mod reader;
mod writer;

pub use catalog::{ContainerEntry, ServiceCatalog, ServiceGroup, SourceRow};
pub use error::{WorkbookError, WorkbookResult};
pub use reader::load_catalog;
pub use writer::{SheetName, append_sheet, write_new};
