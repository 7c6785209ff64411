use crate::model::{PageText, TextSpan};
use crate::sanitize::clean;

/// Flattens blocks, lines and spans of a page into positioned fragments,
/// dropping spans that are empty once trimmed and sanitized.
#[must_use]
pub fn collect_spans(page: &PageText) -> Vec<TextSpan> {
    page.blocks
        .iter()
        .flat_map(|block| &block.lines)
        .flat_map(|line| &line.spans)
        .filter_map(|span| {
            let text = clean(span.text.trim());
            if text.is_empty() {
                return None;
            }
            Some(TextSpan {
                text: text.into_owned(),
                x0: span.bbox.left,
                y0: span.bbox.top,
                x1: span.bbox.right,
            })
        })
        .collect()
}
