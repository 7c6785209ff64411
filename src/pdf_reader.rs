use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use pdf_extract::{Document, MediaBox, OutputDev, OutputError, Transform};
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::model::{BoundingBox, PageText, RawSpan, TextBlock, TextLine};

/// Page-indexed access to structured page text.
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// `index` is 0-based.
    fn page_text(&mut self, index: usize) -> Result<PageText, ExtractError>;
}

/// A parsed PDF. The document is released when this value drops.
pub struct PdfDocument {
    document: Document,
    page_numbers: Vec<u32>,
}

impl PdfDocument {
    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        let document = Document::load(path).map_err(|source| ExtractError::DocumentOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(document))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ExtractError> {
        Ok(Self::new(Document::load_mem(bytes)?))
    }

    fn new(document: Document) -> Self {
        if document.is_encrypted() {
            warn!("document is encrypted; page text may be unreadable");
        }
        let page_numbers = document.get_pages().into_keys().collect();
        Self {
            document,
            page_numbers,
        }
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&mut self, index: usize) -> Result<PageText, ExtractError> {
        let page = index + 1;
        let page_number = *self
            .page_numbers
            .get(index)
            .ok_or_else(|| ExtractError::PageText {
                page,
                message: "page index out of range".to_string(),
            })?;

        let mut collector = SpanCollector::new(page);
        let document = &self.document;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::output_doc_page(document, &mut collector, page_number)
        }));

        match outcome {
            Ok(Ok(())) => {
                let text = collector.finish();
                debug!(page, blocks = text.blocks.len(), "collected page text");
                Ok(text)
            }
            Ok(Err(error)) => Err(ExtractError::PageText {
                page,
                message: error.to_string(),
            }),
            Err(_) => Err(ExtractError::PageText {
                page,
                message: "text extraction panicked on malformed content".to_string(),
            }),
        }
    }
}

/// Largest gap, in font sizes, between the end of a span and the next show
/// operation that still continues the span.
const MAX_JOIN_GAP: f64 = 0.3;
/// Baseline and size drift tolerated within one span, in font sizes.
const SAME_RUN_EPSILON: f64 = 0.05;

struct PendingSpan {
    text: String,
    left: f64,
    right: f64,
    top: f64,
    baseline: f64,
    size: f64,
}

impl PendingSpan {
    /// A show operation starting at `x` continues this span when it sits on the
    /// same baseline, at the same size, and abuts the span's right edge.
    fn continues_at(&self, x: f64, baseline: f64, size: f64) -> bool {
        let epsilon = self.size * SAME_RUN_EPSILON;
        let gap = x - self.right;
        (baseline - self.baseline).abs() <= epsilon
            && (size - self.size).abs() <= epsilon
            && gap >= -self.size
            && gap <= self.size * MAX_JOIN_GAP
    }
}

/// Assembles characters into spans: contiguous runs on one baseline at one
/// font size. Kerned `TJ` strings and back-to-back show operations join the
/// pending span; a gap, baseline shift or size change closes it. A new line
/// starts whenever the baseline moves by more than half a font size.
struct SpanCollector {
    page_number: usize,
    page_top: f64,
    lines: Vec<TextLine>,
    line: TextLine,
    line_baseline: Option<f64>,
    span: Option<PendingSpan>,
    /// Set at every show-operation or text-line boundary.
    at_boundary: bool,
}

impl SpanCollector {
    fn new(page_number: usize) -> Self {
        Self {
            page_number,
            page_top: 0.0,
            lines: Vec::new(),
            line: TextLine::default(),
            line_baseline: None,
            span: None,
            at_boundary: true,
        }
    }

    fn push_char(&mut self, x: f64, baseline: f64, size: f64, advance: f64, ch: &str) {
        if std::mem::take(&mut self.at_boundary)
            && self
                .span
                .as_ref()
                .is_some_and(|span| !span.continues_at(x, baseline, size))
        {
            self.flush_span();
        }

        let top = baseline - size;
        match &mut self.span {
            Some(span) => {
                span.text.push_str(ch);
                span.left = span.left.min(x);
                span.right = span.right.max(x + advance);
                span.top = span.top.min(top);
            }
            None => {
                self.span = Some(PendingSpan {
                    text: ch.to_string(),
                    left: x,
                    right: x + advance,
                    top,
                    baseline,
                    size,
                });
            }
        }
    }

    fn flush_span(&mut self) {
        let Some(span) = self.span.take() else {
            return;
        };

        if let Some(line_baseline) = self.line_baseline
            && (span.baseline - line_baseline).abs() > span.size * 0.5
        {
            self.flush_line();
        }
        self.line_baseline.get_or_insert(span.baseline);

        self.line.spans.push(RawSpan {
            text: span.text,
            bbox: BoundingBox {
                left: span.left,
                top: span.top,
                right: span.right,
                bottom: span.baseline,
            },
        });
    }

    fn flush_line(&mut self) {
        self.line_baseline = None;
        if !self.line.spans.is_empty() {
            self.lines.push(std::mem::take(&mut self.line));
        }
    }

    fn finish(mut self) -> PageText {
        self.flush_span();
        self.flush_line();
        let blocks = if self.lines.is_empty() {
            Vec::new()
        } else {
            vec![TextBlock { lines: self.lines }]
        };
        PageText {
            page_number: self.page_number,
            blocks,
        }
    }
}

impl OutputDev for SpanCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.page_top = media_box.ury;
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        self.flush_span();
        self.flush_line();
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        let scaled_x = font_size * trm.m11 + font_size * trm.m21;
        let scaled_y = font_size * trm.m12 + font_size * trm.m22;
        let size = (scaled_x * scaled_y).abs().sqrt();
        let baseline = self.page_top - trm.m32;
        self.push_char(trm.m31, baseline, size, width * size, char);
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        self.at_boundary = true;
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        self.at_boundary = true;
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        self.at_boundary = true;
        Ok(())
    }
}
