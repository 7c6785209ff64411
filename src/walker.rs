use tracing::{debug, warn};

use crate::model::{DetectedTable, DetectionMethod, PageSummary};
use crate::options::ExtractOptions;
use crate::pdf_reader::PageSource;
use crate::spans::collect_spans;
use crate::table_detect::detect_page;
use crate::warning::{ExtractWarning, WarningCode};

/// Per-page progress, reported while the walk runs. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    PageStarted {
        page: usize,
        total: usize,
    },
    PageEmpty {
        page: usize,
    },
    PageFailed {
        page: usize,
        message: String,
    },
    PageFinished {
        page: usize,
        tables: usize,
        method: Option<DetectionMethod>,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedDocument {
    pub page_count: usize,
    pub tables: Vec<DetectedTable>,
    pub pages: Vec<PageSummary>,
    pub warnings: Vec<ExtractWarning>,
}

/// Detects tables page by page, in page order. Pages that cannot be read or
/// carry no text contribute no tables and never abort the walk.
pub fn walk_pages<S: PageSource + ?Sized>(
    source: &mut S,
    options: &ExtractOptions,
    progress: &mut dyn FnMut(&Progress),
) -> ExtractedDocument {
    let total = source.page_count();
    let mut document = ExtractedDocument {
        page_count: total,
        ..ExtractedDocument::default()
    };

    for index in 0..total {
        let page = index + 1;
        if let Some(selection) = &options.pages
            && !selection.contains(page)
        {
            continue;
        }

        progress(&Progress::PageStarted { page, total });

        let text = match source.page_text(index) {
            Ok(text) => text,
            Err(error) => {
                let message = error.to_string();
                warn!(page, %message, "skipping unreadable page");
                progress(&Progress::PageFailed {
                    page,
                    message: message.clone(),
                });
                document.warnings.push(
                    ExtractWarning::new(WarningCode::PageUnreadable, message).with_page(page),
                );
                finish_page(&mut document, &mut *progress, page, None, 0);
                continue;
            }
        };

        let spans = collect_spans(&text);
        if spans.is_empty() {
            warn!(page, "no text extracted from page");
            progress(&Progress::PageEmpty { page });
            document.warnings.push(
                ExtractWarning::new(WarningCode::EmptyPage, "no text extracted from page")
                    .with_page(page),
            );
            finish_page(&mut document, &mut *progress, page, None, 0);
            continue;
        }

        let detection = detect_page(&spans, options);
        let table_count = detection.tables.len();
        debug!(page, spans = spans.len(), tables = table_count, "page processed");

        if let Some(method) = detection.method {
            document
                .tables
                .extend(detection.tables.into_iter().map(|rows| DetectedTable {
                    page,
                    method,
                    rows,
                }));
        }
        finish_page(&mut document, &mut *progress, page, detection.method, table_count);
    }

    if document.tables.is_empty() {
        document.warnings.push(ExtractWarning::new(
            WarningCode::NoTablesDetected,
            "no tables detected in the document",
        ));
    }

    document
}

fn finish_page(
    document: &mut ExtractedDocument,
    progress: &mut dyn FnMut(&Progress),
    page: usize,
    method: Option<DetectionMethod>,
    tables: usize,
) {
    document.pages.push(PageSummary {
        page,
        method,
        table_count: tables,
    });
    progress(&Progress::PageFinished {
        page,
        tables,
        method,
    });
}
