// Locate the expected export files in an input folder

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Extensions scanned, in preference order. Every entry is accepted by
/// `load_dataset`.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "tsv", "txt"];

const AUTHORITY_MARKERS: &[&str] = &["hometax", "홈택스"];
const LEDGER_MARKERS: &[&str] = &["ecount", "이카운트"];
const SALES_MARKERS: &[&str] = &["매출", "sell", "sales"];
const PURCHASE_MARKERS: &[&str] = &["매입", "buy", "purchase"];

/// The four inputs of a quarterly check. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InputFiles {
    pub ledger_sales: Option<PathBuf>,
    pub ledger_purchases: Option<PathBuf>,
    pub authority_sales: Option<PathBuf>,
    pub authority_purchases: Option<PathBuf>,
}

impl InputFiles {
    pub fn found(&self) -> usize {
        [
            &self.ledger_sales,
            &self.ledger_purchases,
            &self.authority_sales,
            &self.authority_purchases,
        ]
        .iter()
        .filter(|p| p.is_some())
        .count()
    }
}

/// All loadable files directly inside `dir`, grouped by extension
/// preference and sorted by name within each group.
pub fn list_spreadsheets(dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let Some(dir_str) = dir.to_str() else {
        log::warn!("input path is not valid UTF-8: {}", dir.display());
        return out;
    };
    let base = glob::Pattern::escape(dir_str);
    let options = glob::MatchOptions {
        case_sensitive: false,
        ..glob::MatchOptions::new()
    };

    for ext in SPREADSHEET_EXTENSIONS {
        let full = format!("{}/*.{ext}", base.trim_end_matches('/'));
        match glob::glob_with(&full, options) {
            Ok(paths) => {
                let mut group: Vec<PathBuf> = paths.filter_map(Result::ok).filter(|p| p.is_file()).collect();
                group.sort();
                out.extend(group);
            }
            Err(e) => log::warn!("bad glob pattern {full}: {e}"),
        }
    }
    out
}

/// First spreadsheet in `dir` whose lowercased file name contains `keyword`.
pub fn find_file(keyword: &str, dir: &Path) -> Option<PathBuf> {
    let keyword = keyword.to_lowercase();
    list_spreadsheets(dir)
        .into_iter()
        .find(|p| file_name_lower(p).contains(&keyword))
}

/// Assign every spreadsheet in `dir` to one of the four input slots.
///
/// Authority files are recognized by a hometax marker; any other sales or
/// purchases file is treated as the ledger export, with explicit ecount files
/// taking precedence.
pub fn discover_inputs(dir: &Path) -> InputFiles {
    let mut inputs = InputFiles::default();
    let mut ledger_sales_fallback = None;
    let mut ledger_purchases_fallback = None;

    for path in list_spreadsheets(dir) {
        let name = file_name_lower(&path);
        let is_sales = contains_any(&name, SALES_MARKERS);
        let is_purchase = contains_any(&name, PURCHASE_MARKERS);
        if !is_sales && !is_purchase {
            log::debug!("ignoring {}: no sales/purchases marker", path.display());
            continue;
        }

        if contains_any(&name, AUTHORITY_MARKERS) {
            let slot = if is_sales {
                &mut inputs.authority_sales
            } else {
                &mut inputs.authority_purchases
            };
            slot.get_or_insert(path);
        } else if contains_any(&name, LEDGER_MARKERS) {
            let slot = if is_sales {
                &mut inputs.ledger_sales
            } else {
                &mut inputs.ledger_purchases
            };
            slot.get_or_insert(path);
        } else if is_sales {
            ledger_sales_fallback.get_or_insert(path);
        } else {
            ledger_purchases_fallback.get_or_insert(path);
        }
    }

    if inputs.ledger_sales.is_none() {
        inputs.ledger_sales = ledger_sales_fallback;
    }
    if inputs.ledger_purchases.is_none() {
        inputs.ledger_purchases = ledger_purchases_fallback;
    }

    inputs
}

fn file_name_lower(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
