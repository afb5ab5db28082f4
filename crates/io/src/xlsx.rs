// Excel file import (xlsx, xlsm, xls, xlsb, ods)
//
// Only the first worksheet is read; its first row holds the headers.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use vatcheck_recon::model::{Cell, Dataset};

use crate::table::build_dataset;

pub fn import(path: &Path) -> Result<Dataset, String> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file: {}", e))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let Some(first) = sheet_names.first() else {
        return Err("Excel file contains no sheets".to_string());
    };
    if sheet_names.len() > 1 {
        log::debug!("{}: reading sheet '{}' of {}", path.display(), first, sheet_names.len());
    }

    let range = workbook
        .worksheet_range(first)
        .map_err(|e| format!("Failed to read sheet '{}': {}", first, e))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Dataset::default());
    };
    let headers: Vec<String> = header_row.iter().map(header_text).collect();

    let body: Vec<Vec<Cell>> = rows.map(|row| row.iter().map(to_cell).collect()).collect();
    Ok(build_dataset(headers, body))
}

fn header_text(data: &Data) -> String {
    match to_cell(data) {
        Cell::Text(s) => s,
        Cell::Number(n) if n.fract() == 0.0 => format!("{}", n as i64),
        Cell::Number(n) => n.to_string(),
        Cell::Empty => String::new(),
    }
}

/// Map a calamine value onto the engine's scalar union.
fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
        // Serial date number; dates are never aggregated.
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}
