use crate::config::ReconConfig;
use crate::model::{CanonicalField, ColumnMapping, Dataset, GroupKey, Ledger};
use crate::normalize::normalize;

/// Sum normalized amounts per exact key value.
///
/// Either field unmapped → empty ledger. Rows with an empty key cell are
/// skipped; they still count towards `column_total`.
pub fn aggregate(
    dataset: &Dataset,
    mapping: &ColumnMapping,
    key_field: CanonicalField,
    amount_field: CanonicalField,
    config: &ReconConfig,
) -> Ledger {
    let mut ledger = Ledger::new();

    let (Some(key_idx), Some(amount_idx)) = (
        header_index(dataset, mapping, key_field),
        header_index(dataset, mapping, amount_field),
    ) else {
        return ledger;
    };

    let mut skipped = 0usize;
    for row in dataset.rows() {
        let Some(key) = GroupKey::from_cell(&row[key_idx]) else {
            skipped += 1;
            continue;
        };
        let sum = ledger.entry(key).or_insert(0);
        *sum = sum.saturating_add(normalize(&row[amount_idx], config));
    }

    if skipped > 0 {
        log::debug!("{skipped} row(s) without a '{key_field}' value left out of grouping");
    }

    ledger
}

/// Sum of normalized amounts across every row, independent of grouping.
/// Saturates at the `i64` bounds.
pub fn column_total(
    dataset: &Dataset,
    mapping: &ColumnMapping,
    amount_field: CanonicalField,
    config: &ReconConfig,
) -> i64 {
    mapping
        .get(amount_field)
        .map(|header| {
            dataset
                .column(header)
                .map(|c| normalize(c, config))
                .fold(0i64, i64::saturating_add)
        })
        .unwrap_or(0)
}

fn header_index(dataset: &Dataset, mapping: &ColumnMapping, field: CanonicalField) -> Option<usize> {
    mapping.get(field).and_then(|h| dataset.column_index(h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::map_columns;
    use crate::model::Cell;
    use CanonicalField::*;

    fn sales() -> Dataset {
        Dataset::with_rows(
            &["거래처명", "공급가액"],
            vec![
                vec![Cell::from("ACME"), Cell::from("1,000원")],
                vec![Cell::from("ACME"), Cell::from(2500.7)],
                vec![Cell::from("Beta"), Cell::from(300i64)],
                vec![Cell::from("acme"), Cell::from(1i64)],
                vec![Cell::Empty, Cell::from(50i64)],
            ],
        )
    }

    #[test]
    fn sums_per_exact_key() {
        let ds = sales();
        let config = ReconConfig::default();
        let mapping = map_columns(&ds, &config);
        let ledger = aggregate(&ds, &mapping, Partner, SupplyAmount, &config);

        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger[&GroupKey::from("ACME")], 3500);
        assert_eq!(ledger[&GroupKey::from("Beta")], 300);
        // No case folding.
        assert_eq!(ledger[&GroupKey::from("acme")], 1);
    }

    #[test]
    fn empty_key_rows_still_count_in_total() {
        let ds = sales();
        let config = ReconConfig::default();
        let mapping = map_columns(&ds, &config);
        assert_eq!(column_total(&ds, &mapping, SupplyAmount, &config), 1000 + 2500 + 300 + 1 + 50);
    }

    #[test]
    fn numeric_and_text_keys_do_not_merge() {
        let ds = Dataset::with_rows(
            &["사업자번호", "합계"],
            vec![
                vec![Cell::from(1234567890i64), Cell::from(10i64)],
                vec![Cell::from("1234567890"), Cell::from(20i64)],
            ],
        );
        let config = ReconConfig::default();
        let mapping = map_columns(&ds, &config);
        let ledger = aggregate(&ds, &mapping, BusinessId, TotalAmount, &config);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn sums_saturate_instead_of_overflowing() {
        let ds = Dataset::with_rows(
            &["거래처명", "공급가액"],
            vec![
                vec![Cell::from("ACME"), Cell::from("9e18")],
                vec![Cell::from("ACME"), Cell::from("9e18")],
                vec![Cell::from("Beta"), Cell::from("-1e30")],
                vec![Cell::from("Beta"), Cell::from("-1e30")],
            ],
        );
        let config = ReconConfig::default();
        let mapping = map_columns(&ds, &config);
        let ledger = aggregate(&ds, &mapping, Partner, SupplyAmount, &config);
        assert_eq!(ledger[&GroupKey::from("ACME")], i64::MAX);
        assert_eq!(ledger[&GroupKey::from("Beta")], i64::MIN);

        let upper = Dataset::with_rows(
            &["공급가액"],
            vec![vec![Cell::from("9e18")], vec![Cell::from("9e18")]],
        );
        let mapping = map_columns(&upper, &config);
        assert_eq!(column_total(&upper, &mapping, SupplyAmount, &config), i64::MAX);
    }

    #[test]
    fn unmapped_amount_gives_empty_ledger() {
        let ds = sales();
        let config = ReconConfig::default();
        let mapping = map_columns(&ds, &config);
        assert!(aggregate(&ds, &mapping, Partner, TotalAmount, &config).is_empty());
        assert_eq!(column_total(&ds, &mapping, TotalAmount, &config), 0);
    }
}
