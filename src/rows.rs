use std::collections::BTreeMap;

use crate::model::{RowText, TextSpan};

/// Index of the tolerance bucket holding `y`. Halves round to even, so
/// `bucket(25.0, 10.0)` is 2 and `bucket(35.0, 10.0)` is 4.
#[allow(clippy::cast_possible_truncation)]
fn bucket(y: f64, tolerance: f64) -> i64 {
    (y / tolerance).round_ties_even() as i64
}

/// Snaps `y` to the nearest multiple of `tolerance`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn quantize(y: f64, tolerance: f64) -> f64 {
    bucket(y, tolerance) as f64 * tolerance
}

/// Groups spans sharing a quantized top edge into rows, top to bottom, each
/// row ordered left to right.
#[must_use]
pub fn cluster_rows(spans: &[TextSpan], tolerance: f64) -> Vec<Vec<TextSpan>> {
    let mut buckets: BTreeMap<i64, Vec<TextSpan>> = BTreeMap::new();
    for span in spans {
        buckets
            .entry(bucket(span.y0, tolerance))
            .or_default()
            .push(span.clone());
    }

    buckets
        .into_values()
        .map(|mut row| {
            row.sort_by(|a, b| a.x0.total_cmp(&b.x0));
            row
        })
        .collect()
}

#[must_use]
pub fn row_texts(rows: Vec<Vec<TextSpan>>) -> Vec<RowText> {
    rows.into_iter()
        .map(|row| row.into_iter().map(|span| span.text).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{cluster_rows, quantize, row_texts};
    use crate::model::TextSpan;

    fn span(text: &str, x0: f64, y0: f64) -> TextSpan {
        TextSpan {
            text: text.to_string(),
            x0,
            y0,
            x1: x0 + 10.0,
        }
    }

    #[test]
    fn quantizes_to_nearest_multiple() {
        assert_eq!(quantize(14.0, 15.0), 15.0);
        assert_eq!(quantize(7.4, 15.0), 0.0);
        assert_eq!(quantize(123.0, 10.0), 120.0);
        assert_eq!(quantize(127.0, 10.0), 130.0);
    }

    #[test]
    fn quantize_rounds_halves_to_even() {
        assert_eq!(quantize(25.0, 10.0), 20.0);
        assert_eq!(quantize(35.0, 10.0), 40.0);
        assert_eq!(quantize(22.5, 15.0), 30.0);
        assert_eq!(quantize(7.5, 15.0), 0.0);
    }

    #[test]
    fn jittered_baselines_share_a_row() {
        let spans = vec![
            span("b", 50.0, 101.0),
            span("a", 10.0, 98.5),
            span("c", 90.0, 104.0),
            span("next", 10.0, 130.0),
        ];

        let rows = row_texts(cluster_rows(&spans, 15.0));
        assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["next"]]);
    }

    #[test]
    fn rows_are_ordered_top_to_bottom() {
        let spans = vec![
            span("bottom", 0.0, 300.0),
            span("top", 0.0, 10.0),
            span("middle", 0.0, 150.0),
        ];

        let rows = row_texts(cluster_rows(&spans, 10.0));
        assert_eq!(rows, vec![vec!["top"], vec!["middle"], vec!["bottom"]]);
    }

    #[test]
    fn every_span_lands_in_exactly_one_row() {
        let spans: Vec<TextSpan> = (0..40)
            .map(|i| span(&i.to_string(), f64::from(i % 7) * 20.0, f64::from(i) * 3.7))
            .collect();

        let rows = cluster_rows(&spans, 15.0);
        let total: usize = rows.iter().map(Vec::len).sum();
        assert_eq!(total, spans.len());
        for original in &spans {
            let hits = rows
                .iter()
                .flatten()
                .filter(|candidate| candidate.text == original.text)
                .count();
            assert_eq!(hits, 1);
        }
    }

    #[test]
    fn equal_x_keeps_input_order() {
        let spans = vec![span("first", 5.0, 0.0), span("second", 5.0, 1.0)];
        let rows = row_texts(cluster_rows(&spans, 15.0));
        assert_eq!(rows, vec![vec!["first", "second"]]);
    }
}
