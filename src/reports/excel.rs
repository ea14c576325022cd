//! In-memory xlsx generation for report exports.

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::registry::ColumnDef;
use crate::reports::render;

struct ExportFormats {
    header: Format,
    cell: Format,
}

impl ExportFormats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center)
                .set_text_wrap(),
            cell: Format::new()
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Left),
        }
    }
}

/// Build a single-sheet workbook: one header row from the column labels,
/// one row per record, cells normalized exactly as the on-screen table.
pub fn build_workbook(columns: &[ColumnDef], rows: &[Value]) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let fmt = ExportFormats::new();

    for (col, def) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, &def.label, &fmt.header)?;
        worksheet.set_column_width(col as u16, column_width(&def.label))?;
    }

    for (r, row) in rows.iter().enumerate() {
        for (c, def) in columns.iter().enumerate() {
            let text = render::cell_text(row, &def.key);
            worksheet.write_string_with_format(r as u32 + 1, c as u16, &text, &fmt.cell)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn column_width(label: &str) -> f64 {
    (label.len().max(12) + 4) as f64
}
