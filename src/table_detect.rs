use tracing::debug;

use crate::model::{DetectionMethod, RowText, Table, TextSpan};
use crate::options::ExtractOptions;
use crate::rows::{cluster_rows, row_texts};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageDetection {
    pub method: Option<DetectionMethod>,
    pub tables: Vec<Table>,
}

/// Header-first detection: the first row with at least `min_header_cols`
/// cells is the header and every later row is padded or truncated to its
/// width. Rows above the header are dropped.
#[must_use]
pub fn detect_strict(rows: &[RowText], options: &ExtractOptions) -> Vec<Table> {
    let Some(header_index) = rows
        .iter()
        .position(|row| row.len() >= options.min_header_cols)
    else {
        return Vec::new();
    };

    let width = rows[header_index].len();
    let table: Table = rows[header_index..]
        .iter()
        .map(|row| {
            let mut cells = row.clone();
            cells.resize(width, String::new());
            cells
        })
        .collect();

    if table.len() >= options.min_table_rows {
        vec![table]
    } else {
        Vec::new()
    }
}

/// Header-less detection: every run of consecutive rows with the same cell
/// count is a table candidate.
#[must_use]
pub fn detect_flexible(rows: &[RowText], options: &ExtractOptions) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut current: Table = Vec::new();

    let flush_current = |current: &mut Table, tables: &mut Vec<Table>| {
        if current.len() >= options.min_table_rows {
            tables.push(std::mem::take(current));
        } else {
            current.clear();
        }
    };

    for row in rows {
        if current.last().is_some_and(|last| last.len() != row.len()) {
            flush_current(&mut current, &mut tables);
        }
        current.push(row.clone());
    }

    flush_current(&mut current, &mut tables);
    tables
}

/// Runs strict detection and only consults the flexible detector when strict
/// finds nothing.
#[must_use]
pub fn detect(rows: &[RowText], options: &ExtractOptions) -> PageDetection {
    let tables = detect_strict(rows, options);
    if !tables.is_empty() {
        debug!(tables = tables.len(), "found tables using strict method");
        return PageDetection {
            method: Some(DetectionMethod::Strict),
            tables,
        };
    }

    let tables = detect_flexible(rows, options);
    if tables.is_empty() {
        return PageDetection::default();
    }

    debug!(tables = tables.len(), "found tables using flexible method");
    PageDetection {
        method: Some(DetectionMethod::Flexible),
        tables,
    }
}

#[must_use]
pub fn detect_page(spans: &[TextSpan], options: &ExtractOptions) -> PageDetection {
    let rows = row_texts(cluster_rows(spans, options.row_tolerance));
    detect(&rows, options)
}
