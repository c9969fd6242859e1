//! Workbook reading and styled writing shared by the spreadsheet tools.

use std::path::Path;

use calamine::{open_workbook, DataType, Reader, Xlsx};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};

use crate::error::RosterError;

/// Read the first worksheet: header row plus data rows, everything
/// rendered to strings. Date cells come back as `DD/MM/YYYY`.
pub fn read_sheet(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), RosterError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(RosterError::NoSheet)?;
    let range = workbook
        .worksheet_range(&name)
        .ok_or(RosterError::NoSheet)??;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(cell_to_string).collect(),
        None => return Ok((Vec::new(), Vec::new())),
    };

    let data = rows
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    Ok((headers, data))
}

pub(crate) fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(value) => value.clone(),
        DataType::Float(value) => {
            if value.fract() == 0.0 {
                format!("{}", *value as i64)
            } else {
                value.to_string()
            }
        }
        DataType::Int(value) => value.to_string(),
        DataType::Bool(value) => value.to_string(),
        DataType::DateTime(_) => match cell.as_datetime() {
            Some(dt) => dt.format("%d/%m/%Y").to_string(),
            None => String::new(),
        },
        DataType::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Column width lookup: `(header, width)` pairs with a fallback default.
pub fn width_for(widths: &[(&str, f64)], header: &str, default: f64) -> f64 {
    widths
        .iter()
        .find(|(name, _)| *name == header)
        .map(|(_, w)| *w)
        .unwrap_or(default)
}

/// Write one styled sheet: bold bordered header, bordered cells, fixed
/// column widths, frozen header row. Values under a header listed in
/// `numeric_columns` are written as numbers when their digits parse.
pub fn write_styled_sheet(
    path: &Path,
    sheet_name: &str,
    headers: &[&str],
    rows: &[Vec<String>],
    numeric_columns: &[&str],
    widths: &[(&str, f64)],
) -> Result<(), RosterError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    let header_format = Format::new()
        .set_font_name("Calibri")
        .set_font_size(11)
        .set_bold()
        .set_align(FormatAlign::Left)
        .set_border(FormatBorder::Thin);
    let cell_format = Format::new()
        .set_font_name("Calibri")
        .set_font_size(10)
        .set_align(FormatAlign::Left)
        .set_border(FormatBorder::Thin);

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        worksheet.set_column_width(col as u16, width_for(widths, header, 15.0))?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            let header = headers.get(col).copied().unwrap_or_default();
            let numeric = numeric_columns.contains(&header) && !value.is_empty();
            let parsed = numeric.then(|| digits_of(value)).flatten();

            match parsed {
                Some(number) => worksheet.write_number_with_format(
                    (row_idx + 1) as u32,
                    col as u16,
                    number as f64,
                    &cell_format,
                )?,
                None => worksheet.write_string_with_format(
                    (row_idx + 1) as u32,
                    col as u16,
                    value,
                    &cell_format,
                )?,
            };
        }
    }

    worksheet.set_freeze_panes(1, 0)?;
    workbook.save(path)?;
    Ok(())
}

fn digits_of(value: &str) -> Option<i64> {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
