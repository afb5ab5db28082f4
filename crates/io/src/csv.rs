// CSV/TSV import into a reconciliation Dataset

use std::io::Read;
use std::path::Path;

use vatcheck_recon::model::{Cell, Dataset};

use crate::table::build_dataset;

pub fn import(path: &Path) -> Result<Dataset, String> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    import_from_string(&content, delimiter)
}

pub fn import_with_delimiter(path: &Path, delimiter: u8) -> Result<Dataset, String> {
    let content = read_file_as_utf8(path)?;
    import_from_string(&content, delimiter)
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Higher field count breaks ties: more columns, more likely the real delimiter
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed.
///
/// Korean accounting exports are frequently CP949/EUC-KR; a leading UTF-8 BOM
/// (Excel "CSV UTF-8") is dropped.
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;
    Ok(decode(bytes))
}

fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, had_errors) = encoding_rs::EUC_KR.decode(&bytes);
            if had_errors {
                log::warn!("input is neither UTF-8 nor clean EUC-KR; some characters were replaced");
            }
            decoded.into_owned()
        }
    }
}

fn import_from_string(content: &str, delimiter: u8) -> Result<Dataset, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record.map_err(|e| e.to_string())?.iter().map(str::to_string).collect(),
        None => return Ok(Dataset::default()),
    };

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in records {
        let record = record.map_err(|e| e.to_string())?;
        raw_rows.push(record.iter().map(str::to_string).collect());
    }

    let numeric = numeric_columns(headers.len(), &raw_rows);
    let rows = raw_rows.into_iter().map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(col, field)| typed_cell(field, numeric.get(col).copied().unwrap_or(false)))
            .collect()
    });

    Ok(build_dataset(headers, rows))
}

/// A column is numeric when every non-blank cell parses as a plain number.
/// Formatted amounts ("1,200") keep the column textual.
fn numeric_columns(width: usize, rows: &[Vec<String>]) -> Vec<bool> {
    (0..width)
        .map(|col| {
            let mut seen = false;
            for row in rows {
                let Some(field) = row.get(col).map(|f| f.trim()) else {
                    continue;
                };
                if field.is_empty() {
                    continue;
                }
                if field.parse::<f64>().is_err() {
                    return false;
                }
                seen = true;
            }
            seen
        })
        .collect()
}

fn typed_cell(field: String, numeric: bool) -> Cell {
    if field.trim().is_empty() {
        return Cell::Empty;
    }
    if numeric {
        if let Ok(n) = field.trim().parse::<f64>() {
            return Cell::Number(n);
        }
    }
    Cell::Text(field)
}
