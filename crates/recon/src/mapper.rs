use crate::config::ReconConfig;
use crate::model::{ColumnMapping, Dataset};

/// Resolve raw headers to canonical fields.
///
/// Fields are tried in config order; for each, headers are scanned in dataset
/// order and the first header whose cleaned form contains one of the field's
/// candidates wins. A bound header stays available to later fields.
pub fn map_columns(dataset: &Dataset, config: &ReconConfig) -> ColumnMapping {
    map_headers(dataset.headers(), config)
}

pub fn map_headers<S: AsRef<str>>(headers: &[S], config: &ReconConfig) -> ColumnMapping {
    let cleaned: Vec<String> = headers.iter().map(|h| clean_header(h.as_ref())).collect();
    let mut mapping = ColumnMapping::default();

    for rule in &config.fields {
        let hit = cleaned.iter().position(|header| {
            rule.candidates.iter().any(|cand| header.contains(cand.as_str()))
        });
        if let Some(idx) = hit {
            mapping.insert(rule.field, headers[idx].as_ref());
        }
    }

    log::debug!(
        "mapped {}/{} fields: {}",
        mapping.len(),
        config.fields.len(),
        mapping
            .iter()
            .map(|(f, h)| format!("{f}={h}"))
            .collect::<Vec<_>>()
            .join(", ")
    );

    mapping
}

/// Trimmed, with inner spaces removed ("공급 가액 " → "공급가액").
fn clean_header(header: &str) -> String {
    header.trim().replace(' ', "")
}
