use crate::aggregate::aggregate;
use crate::classify::classify;
use crate::config::ReconConfig;
use crate::mapper::map_columns;
use crate::model::{CanonicalField, ColumnMapping, Dataset, Discrepancies, ReconResult};
use crate::resolve::{resolve_amount, resolve_key};
use crate::summary::summarize;

/// Reconcile side A (internal books) against side B (tax authority).
///
/// Either side may be absent. Never fails: mapping gaps skip the per-key
/// comparison, bad cells count as 0. `label` only tags the output.
pub fn reconcile(a: Option<&Dataset>, b: Option<&Dataset>, label: &str, config: &ReconConfig) -> ReconResult {
    let mapping_a = a.map(|ds| map_columns(ds, config)).unwrap_or_default();
    let mapping_b = b.map(|ds| map_columns(ds, config)).unwrap_or_default();

    let summary = summarize(a, b, &mapping_a, &mapping_b, label, config);

    let (Some(a), Some(b)) = (a, b) else {
        log::debug!("[{label}] one side absent; totals only");
        return summary;
    };

    match compare(a, b, &mapping_a, &mapping_b, config) {
        Some((key_field, discrepancies)) => {
            log::info!(
                "[{label}] grouped by '{key_field}': {} missing in B, {} missing in A, {} mismatched",
                discrepancies.missing_in_b.len(),
                discrepancies.missing_in_a.len(),
                discrepancies.amount_mismatch.len(),
            );
            ReconResult {
                key_field: Some(key_field),
                discrepancies,
                ..summary
            }
        }
        None => summary,
    }
}

/// `reconcile` with the built-in defaults.
pub fn reconcile_default(a: Option<&Dataset>, b: Option<&Dataset>, label: &str) -> ReconResult {
    reconcile(a, b, label, &ReconConfig::default())
}

fn compare(
    a: &Dataset,
    b: &Dataset,
    mapping_a: &ColumnMapping,
    mapping_b: &ColumnMapping,
    config: &ReconConfig,
) -> Option<(CanonicalField, Discrepancies)> {
    let key_field = resolve_key(mapping_a, mapping_b, config)?;
    let amount_a = resolve_amount(mapping_a, config)?;
    let amount_b = resolve_amount(mapping_b, config)?;

    let ledger_a = aggregate(a, mapping_a, key_field, amount_a, config);
    let ledger_b = aggregate(b, mapping_b, key_field, amount_b, config);

    Some((key_field, classify(&ledger_a, &ledger_b, config.tolerance)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, GroupKey, SideSummary};

    fn ecount() -> Dataset {
        Dataset::with_rows(
            &["일자", "거래처명", "사업자번호", "공급가액", "부가세"],
            vec![
                vec!["2026-01-05".into(), "ACME".into(), "111-11-11111".into(), Cell::from(1_000_000i64), Cell::from(100_000i64)],
                vec!["2026-01-09".into(), "Beta".into(), "222-22-22222".into(), Cell::from(500_000i64), Cell::from(50_000i64)],
                vec!["2026-02-01".into(), "Gamma".into(), "333-33-33333".into(), Cell::from(70_000i64), Cell::from(7_000i64)],
            ],
        )
    }

    fn hometax() -> Dataset {
        Dataset::with_rows(
            &["작성일자", "공급받는자사업자등록번호", "상호", "공급가액", "세액"],
            vec![
                vec!["2026-01-05".into(), "111-11-11111".into(), "ACME".into(), "900,000".into(), "90,000".into()],
                vec!["2026-01-09".into(), "222-22-22222".into(), "Beta".into(), "500,000".into(), "50,000".into()],
                vec!["2026-03-02".into(), "444-44-44444".into(), "Delta".into(), "20,000".into(), "2,000".into()],
            ],
        )
    }

    #[test]
    fn full_pipeline() {
        let r = reconcile_default(Some(&ecount()), Some(&hometax()), "sales");
        assert_eq!(r.key_field, Some(CanonicalField::BusinessId));
        assert_eq!(r.side_a.total, 1_570_000);
        assert_eq!(r.side_b.total, 1_420_000);
        assert_eq!(r.delta, 150_000);

        assert_eq!(r.missing_in_b().len(), 1);
        assert_eq!(r.missing_in_b()[0].key, GroupKey::from("333-33-33333"));
        assert_eq!(r.missing_in_a().len(), 1);
        assert_eq!(r.missing_in_a()[0].amount, 20_000);
        assert_eq!(r.amount_mismatch().len(), 1);
        assert_eq!(r.amount_mismatch()[0].diff, 100_000);
        assert_eq!(r.issue_count(), 3);
        assert!(!r.is_clean());
    }

    #[test]
    fn absent_b_gives_totals_only() {
        let a = ecount();
        let r = reconcile_default(Some(&a), None, "sales");
        assert_eq!(r.side_b.row_count, 0);
        assert_eq!(r.side_b.total, 0);
        assert_eq!(r.delta, r.side_a.total);
        assert_eq!(r.key_field, None);
        assert_eq!(r.issue_count(), 0);
    }

    #[test]
    fn both_absent_is_all_zero() {
        let r = reconcile_default(None, None, "purchases");
        assert_eq!(r.label, "purchases");
        assert_eq!(r.side_a.row_count + r.side_b.row_count, 0);
        assert_eq!(r.delta, 0);
        assert!(r.is_clean());
    }

    #[test]
    fn no_common_key_skips_grouping_but_keeps_totals() {
        let a = Dataset::with_rows(&["공급가액"], vec![vec![Cell::from(10i64)]]);
        let b = Dataset::with_rows(&["공급가액"], vec![vec![Cell::from(4i64)]]);
        let r = reconcile_default(Some(&a), Some(&b), "sales");
        assert_eq!(r.key_field, None);
        assert_eq!(r.delta, 6);
        assert_eq!(r.issue_count(), 0);
    }

    #[test]
    fn one_side_without_amount_skips_grouping() {
        let a = Dataset::with_rows(&["거래처", "공급가액"], vec![vec!["ACME".into(), Cell::from(10i64)]]);
        let b = Dataset::with_rows(&["거래처", "비고"], vec![vec!["ACME".into(), "x".into()]]);
        let r = reconcile_default(Some(&a), Some(&b), "sales");
        assert_eq!(r.key_field, None);
        assert_eq!(r.side_b, SideSummary { row_count: 1, total: 0 });
        assert_eq!(r.issue_count(), 0);
    }

    #[test]
    fn deterministic() {
        let (a, b) = (ecount(), hometax());
        let first = reconcile_default(Some(&a), Some(&b), "sales");
        let second = reconcile_default(Some(&a), Some(&b), "sales");
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
