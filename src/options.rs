use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::ExtractError;

pub const DEFAULT_ROW_TOLERANCE: f64 = 15.0;
pub const DEFAULT_MIN_HEADER_COLS: usize = 5;
pub const DEFAULT_MIN_TABLE_ROWS: usize = 2;

/// 1-based pages to process, written like `1-3,5,9-`. A range with no end
/// runs to the last page of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    ranges: Vec<RangeInclusive<usize>>,
}

impl PageSelection {
    #[must_use]
    pub fn contains(&self, page: usize) -> bool {
        self.ranges.iter().any(|range| range.contains(&page))
    }
}

fn parse_page(number: &str, token: &str) -> Result<usize, String> {
    match number.trim().parse::<usize>() {
        Ok(0) => Err(format!("page numbers start at 1, got '{token}'")),
        Ok(page) => Ok(page),
        Err(_) => Err(format!("'{token}' is not a page number or range")),
    }
}

fn parse_range(token: &str) -> Result<RangeInclusive<usize>, String> {
    let Some((first, last)) = token.split_once('-') else {
        let page = parse_page(token, token)?;
        return Ok(page..=page);
    };

    let first = parse_page(first, token)?;
    let last = if last.trim().is_empty() {
        usize::MAX
    } else {
        parse_page(last, token)?
    };
    if last < first {
        return Err(format!("page range '{token}' ends before it starts"));
    }
    Ok(first..=last)
}

impl FromStr for PageSelection {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let ranges = text
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(parse_range)
            .collect::<Result<Vec<_>, _>>()?;

        if ranges.is_empty() {
            return Err("no pages selected".to_string());
        }
        Ok(Self { ranges })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Vertical quantization step used to cluster spans into rows.
    pub row_tolerance: f64,
    /// Cells a row needs before the strict detector accepts it as header.
    pub min_header_cols: usize,
    /// Smallest table either detector emits, header included.
    pub min_table_rows: usize,
    pub pages: Option<PageSelection>,
}

impl ExtractOptions {
    pub fn validate(&self) -> Result<(), ExtractError> {
        if !self.row_tolerance.is_finite() || self.row_tolerance <= 0.0 {
            return Err(ExtractError::InvalidOption(format!(
                "row tolerance must be a positive number, got {}",
                self.row_tolerance
            )));
        }
        if self.min_header_cols == 0 {
            return Err(ExtractError::InvalidOption(
                "min_header_cols must be at least 1".to_string(),
            ));
        }
        if self.min_table_rows < 2 {
            return Err(ExtractError::InvalidOption(
                "min_table_rows must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            row_tolerance: DEFAULT_ROW_TOLERANCE,
            min_header_cols: DEFAULT_MIN_HEADER_COLS,
            min_table_rows: DEFAULT_MIN_TABLE_ROWS,
            pages: None,
        }
    }
}
