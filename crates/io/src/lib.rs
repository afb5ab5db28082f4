// File loading and input discovery

pub mod csv;
pub mod discover;
mod table;
pub mod xlsx;

use std::path::Path;

use vatcheck_recon::model::Dataset;

pub use discover::{discover_inputs, find_file, list_spreadsheets, InputFiles, SPREADSHEET_EXTENSIONS};

/// Load a spreadsheet export by extension.
///
/// CSV-family files go through the delimiter sniffer (TSV is always tab);
/// Excel and ODS workbooks read their first sheet.
pub fn load_dataset(path: &Path) -> Result<Dataset, String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let dataset = match ext.as_str() {
        "csv" | "txt" => csv::import(path),
        "tsv" => csv::import_with_delimiter(path, b'\t'),
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => xlsx::import(path),
        "" => Err(format!("{}: file has no extension", path.display())),
        other => Err(format!("{}: unsupported file type '.{}'", path.display(), other)),
    }?;

    log::info!(
        "loaded {} ({} rows, {} columns)",
        path.display(),
        dataset.len(),
        dataset.headers().len()
    );
    Ok(dataset)
}
