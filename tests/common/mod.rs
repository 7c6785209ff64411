#![allow(dead_code)]

use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

pub const PAGE_HEIGHT: i64 = 842;
const FIRST_BASELINE: i64 = 780;
const ROW_PITCH: i64 = 20;
const COLUMN_PITCH: i64 = 90;

/// Writes a PDF where every cell is its own `Tj` placed with an absolute
/// text matrix: rows 20pt apart, columns 90pt apart. A page without rows
/// has an empty text object.
pub fn create_table_pdf(
    path: &Path,
    pages: &[Vec<Vec<&str>>],
) -> Result<(), Box<dyn std::error::Error>> {
    write_table_pdf(path, pages, plain_cell)
}

/// Same layout as [`create_table_pdf`], but each cell is a kerned `TJ`
/// array such as `[(T) 80 (otal)]`, the way typesetters emit words.
pub fn create_kerned_table_pdf(
    path: &Path,
    pages: &[Vec<Vec<&str>>],
) -> Result<(), Box<dyn std::error::Error>> {
    write_table_pdf(path, pages, kerned_cell)
}

fn plain_cell(cell: &str) -> Operation {
    Operation::new("Tj", vec![Object::string_literal(cell)])
}

fn kerned_cell(cell: &str) -> Operation {
    let split = cell.chars().next().map_or(0, char::len_utf8);
    let (head, tail) = cell.split_at(split);
    let mut parts = vec![Object::string_literal(head)];
    if !tail.is_empty() {
        parts.push(80.into());
        parts.push(Object::string_literal(tail));
    }
    Operation::new("TJ", vec![Object::Array(parts)])
}

fn write_table_pdf(
    path: &Path,
    pages: &[Vec<Vec<&str>>],
    show_cell: fn(&str) -> Operation,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut page_ids = Vec::new();

    for rows in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
        ];

        for (row_index, row) in rows.iter().enumerate() {
            let baseline = FIRST_BASELINE - ROW_PITCH * i64::try_from(row_index)?;
            for (col_index, cell) in row.iter().enumerate() {
                let x = 40 + COLUMN_PITCH * i64::try_from(col_index)?;
                operations.push(Operation::new(
                    "Tm",
                    vec![
                        1.into(),
                        0.into(),
                        0.into(),
                        1.into(),
                        x.into(),
                        baseline.into(),
                    ],
                ));
                operations.push(show_cell(cell));
            }
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| (*id).into()).collect::<Vec<_>>(),
            "Count" => i64::try_from(page_ids.len())?,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    doc.save(path)?;
    Ok(())
}

/// One row per entry of `widths`, cells labelled `{prefix}{row}.{col}`.
pub fn grid(prefix: &str, widths: &[usize]) -> Vec<Vec<String>> {
    widths
        .iter()
        .enumerate()
        .map(|(row, &width)| (0..width).map(|col| format!("{prefix}{row}.{col}")).collect())
        .collect()
}

pub fn as_strs(rows: &[Vec<String>]) -> Vec<Vec<&str>> {
    rows.iter()
        .map(|row| row.iter().map(String::as_str).collect())
        .collect()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        other => format!("{other:?}"),
    }
}

pub fn range_rows(range: &calamine::Range<Data>) -> Vec<Vec<String>> {
    range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect()
}

/// Every sheet of the workbook as `(name, rows)`, in workbook order.
pub fn read_workbook(path: &Path) -> Vec<(String, Vec<Vec<String>>)> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("workbook should open");
    let names = workbook.sheet_names();
    names
        .into_iter()
        .map(|name| {
            let range = workbook
                .worksheet_range(&name)
                .expect("sheet should be readable");
            let rows = range_rows(&range);
            (name, rows)
        })
        .collect()
}
