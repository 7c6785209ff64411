use std::path::PathBuf;

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{} not found", .0.display())]
    InputNotFound(PathBuf),

    #[error("input '{}' does not have a .pdf extension", .0.display())]
    UnsupportedExtension(PathBuf),

    #[error("failed to open PDF '{}': {source}", path.display())]
    DocumentOpen {
        path: PathBuf,
        #[source]
        source: pdf_extract::Error,
    },

    #[error("failed to load PDF from memory: {0}")]
    DocumentLoad(#[from] pdf_extract::Error),

    #[error("failed to read text of page {page}: {message}")]
    PageText { page: usize, message: String },

    #[error("failed to write workbook '{}': {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },

    #[error("failed to build workbook: {0}")]
    Workbook(#[from] XlsxError),

    #[error("table {sheet} exceeds worksheet limits")]
    SheetTooLarge { sheet: String },

    #[error("invalid option: {0}")]
    InvalidOption(String),
}
