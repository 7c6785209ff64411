use std::fmt;

use serde::Serialize;

/// Cells of one row, left to right.
pub type RowText = Vec<String>;

/// Rows of one table; every row has the same number of cells.
pub type Table = Vec<RowText>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// A span as reported by the PDF reader, before trimming and sanitizing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSpan {
    pub text: String,
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLine {
    pub spans: Vec<RawSpan>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
}

/// Structured text of one page. Coordinates grow downward from the top-left
/// corner of the media box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageText {
    pub page_number: usize,
    pub blocks: Vec<TextBlock>,
}

/// A positioned, non-empty, sanitized text fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    Strict,
    Flexible,
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::Flexible => f.write_str("flexible"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedTable {
    pub page: usize,
    pub method: DetectionMethod,
    pub rows: Table,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub page: usize,
    pub method: Option<DetectionMethod>,
    pub table_count: usize,
}
