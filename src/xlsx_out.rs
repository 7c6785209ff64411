use std::path::Path;

use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook};

use crate::error::ExtractError;
use crate::model::DetectedTable;
use crate::sanitize::clean;

pub(crate) fn sheet_name(index: usize) -> String {
    format!("Table_{}", index + 1)
}

fn build_workbook(tables: &[DetectedTable]) -> Result<Workbook, ExtractError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for (index, table) in tables.iter().enumerate() {
        let name = sheet_name(index);
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&name)?;

        let has_header = table.rows.len() > 1;
        for (row_index, row) in table.rows.iter().enumerate() {
            let row_num = RowNum::try_from(row_index).map_err(|_| ExtractError::SheetTooLarge {
                sheet: name.clone(),
            })?;
            for (col_index, cell) in row.iter().enumerate() {
                let col_num =
                    ColNum::try_from(col_index).map_err(|_| ExtractError::SheetTooLarge {
                        sheet: name.clone(),
                    })?;
                let value = clean(cell);
                if has_header && row_index == 0 {
                    worksheet.write_string_with_format(row_num, col_num, value, &header_format)?;
                } else {
                    worksheet.write_string(row_num, col_num, value)?;
                }
            }
        }
    }

    Ok(workbook)
}

/// Writes one sheet per table, `Table_1`, `Table_2`, ... in table order.
/// A table with more than one row gets its first row as a bold header.
pub(crate) fn write_xlsx(path: &Path, tables: &[DetectedTable]) -> Result<(), ExtractError> {
    let mut workbook = build_workbook(tables)?;
    workbook
        .save(path)
        .map_err(|source| ExtractError::Export {
            path: path.to_path_buf(),
            source,
        })
}

pub(crate) fn write_xlsx_to_buffer(tables: &[DetectedTable]) -> Result<Vec<u8>, ExtractError> {
    let mut workbook = build_workbook(tables)?;
    Ok(workbook.save_to_buffer()?)
}
