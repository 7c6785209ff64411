mod error;
mod model;
mod options;
mod pdf_reader;
mod rows;
mod sanitize;
mod spans;
mod table_detect;
mod walker;
mod warning;
mod xlsx_out;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::xlsx_out::{write_xlsx, write_xlsx_to_buffer};

pub use error::ExtractError;
pub use model::{
    BoundingBox, DetectedTable, DetectionMethod, PageSummary, PageText, RawSpan, RowText, Table,
    TextBlock, TextLine, TextSpan,
};
pub use options::{
    DEFAULT_MIN_HEADER_COLS, DEFAULT_MIN_TABLE_ROWS, DEFAULT_ROW_TOLERANCE, ExtractOptions,
    PageSelection,
};
pub use pdf_reader::{PageSource, PdfDocument};
pub use rows::{cluster_rows, quantize, row_texts};
pub use sanitize::clean;
pub use spans::collect_spans;
pub use table_detect::{PageDetection, detect, detect_flexible, detect_page, detect_strict};
pub use walker::{ExtractedDocument, Progress, walk_pages};
pub use warning::{ExtractWarning, WarningCode};

const OUTPUT_SUFFIX: &str = "_tables.xlsx";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionReport {
    /// `None` when no tables were found and nothing was written.
    pub output: Option<PathBuf>,
    pub page_count: usize,
    pub table_count: usize,
    pub pages: Vec<PageSummary>,
    pub warnings: Vec<ExtractWarning>,
}

impl ExtractionReport {
    fn new(document: &ExtractedDocument, output: Option<PathBuf>) -> Self {
        Self {
            output,
            page_count: document.page_count,
            table_count: document.tables.len(),
            pages: document.pages.clone(),
            warnings: document.warnings.clone(),
        }
    }
}

fn ensure_input_exists(input_pdf: &Path) -> Result<(), ExtractError> {
    if input_pdf.exists() {
        Ok(())
    } else {
        Err(ExtractError::InputNotFound(input_pdf.to_path_buf()))
    }
}

/// Derives `<dir>/<stem>_tables.xlsx` from a `.pdf` input path.
pub fn output_path_for(input_pdf: &Path) -> Result<PathBuf, ExtractError> {
    let is_pdf = input_pdf
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    let stem = input_pdf.file_stem().filter(|stem| !stem.is_empty());
    let (true, Some(stem)) = (is_pdf, stem) else {
        return Err(ExtractError::UnsupportedExtension(input_pdf.to_path_buf()));
    };

    let mut file_name = OsString::from(stem);
    file_name.push(OUTPUT_SUFFIX);
    Ok(input_pdf.with_file_name(file_name))
}

/// Opens the PDF, detects tables on every selected page and returns them in
/// page order. The document is closed before this returns.
pub fn extract_tables(
    input_pdf: &Path,
    options: &ExtractOptions,
    progress: &mut dyn FnMut(&Progress),
) -> Result<ExtractedDocument, ExtractError> {
    options.validate()?;
    ensure_input_exists(input_pdf)?;

    let mut document = PdfDocument::open(input_pdf)?;
    Ok(walk_pages(&mut document, options, progress))
}

/// Extracts every table of `input_pdf` into one workbook. The workbook goes to
/// `output_xlsx` when given, otherwise next to the input as
/// `<stem>_tables.xlsx`. Nothing is written when no table is found.
pub fn extract_pdf_to_xlsx(
    input_pdf: &Path,
    output_xlsx: Option<&Path>,
    options: &ExtractOptions,
    progress: &mut dyn FnMut(&Progress),
) -> Result<ExtractionReport, ExtractError> {
    ensure_input_exists(input_pdf)?;
    let output = match output_xlsx {
        Some(path) => path.to_path_buf(),
        None => output_path_for(input_pdf)?,
    };

    let document = extract_tables(input_pdf, options, progress)?;
    if document.tables.is_empty() {
        info!(input = %input_pdf.display(), "no tables detected; workbook not written");
        return Ok(ExtractionReport::new(&document, None));
    }

    write_xlsx(&output, &document.tables)?;
    info!(
        output = %output.display(),
        tables = document.tables.len(),
        "workbook written"
    );
    Ok(ExtractionReport::new(&document, Some(output)))
}

/// In-memory variant of [`extract_pdf_to_xlsx`]. Returns `None` for the
/// workbook when no table is found.
pub fn extract_pdf_bytes_to_xlsx_buffer(
    input_pdf: &[u8],
    options: &ExtractOptions,
) -> Result<(Option<Vec<u8>>, ExtractionReport), ExtractError> {
    options.validate()?;

    let document = {
        let mut pdf = PdfDocument::from_bytes(input_pdf)?;
        walk_pages(&mut pdf, options, &mut |_| {})
    };
    let report = ExtractionReport::new(&document, None);
    if document.tables.is_empty() {
        return Ok((None, report));
    }

    Ok((Some(write_xlsx_to_buffer(&document.tables)?), report))
}
