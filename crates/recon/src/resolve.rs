use crate::config::ReconConfig;
use crate::model::{CanonicalField, ColumnMapping};

/// First field in `preference` that `mapping` has a header for.
pub fn first_mapped(mapping: &ColumnMapping, preference: &[CanonicalField]) -> Option<CanonicalField> {
    preference.iter().copied().find(|f| mapping.contains(*f))
}

/// First field in `preference` that both mappings have a header for.
pub fn first_common(
    a: &ColumnMapping,
    b: &ColumnMapping,
    preference: &[CanonicalField],
) -> Option<CanonicalField> {
    preference
        .iter()
        .copied()
        .find(|f| a.contains(*f) && b.contains(*f))
}

/// Best grouping key shared by both sides (business id, then partner).
pub fn resolve_key(a: &ColumnMapping, b: &ColumnMapping, config: &ReconConfig) -> Option<CanonicalField> {
    let key = first_common(a, b, &config.key_preference);
    match key {
        Some(field) if Some(field) != config.key_preference.first().copied() => {
            log::info!("falling back to '{field}' as grouping key");
        }
        None => log::info!("no common grouping key; skipping per-key comparison"),
        _ => {}
    }
    key
}

/// Column used for amounts on one side (supply, then total).
pub fn resolve_amount(mapping: &ColumnMapping, config: &ReconConfig) -> Option<CanonicalField> {
    first_mapped(mapping, &config.amount_preference)
}
