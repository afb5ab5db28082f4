use crate::aggregate::column_total;
use crate::config::ReconConfig;
use crate::model::{ColumnMapping, Dataset, Discrepancies, ReconResult, SideSummary, VatEstimate};
use crate::resolve::resolve_amount;

/// Row count and total for one side. Absent dataset → zeros.
pub fn summarize_side(dataset: Option<&Dataset>, mapping: &ColumnMapping, config: &ReconConfig) -> SideSummary {
    let Some(dataset) = dataset else {
        return SideSummary::default();
    };

    let total = resolve_amount(mapping, config)
        .map(|field| column_total(dataset, mapping, field, config))
        .unwrap_or(0);

    SideSummary {
        row_count: dataset.len(),
        total,
    }
}

/// Scalar part of a result: counts, totals, delta. Per-key lists are left
/// empty for the engine to fill.
pub fn summarize(
    a: Option<&Dataset>,
    b: Option<&Dataset>,
    mapping_a: &ColumnMapping,
    mapping_b: &ColumnMapping,
    label: &str,
    config: &ReconConfig,
) -> ReconResult {
    let side_a = summarize_side(a, mapping_a, config);
    let side_b = summarize_side(b, mapping_b, config);

    ReconResult {
        label: label.to_string(),
        key_field: None,
        side_a,
        side_b,
        delta: side_a.total.saturating_sub(side_b.total),
        discrepancies: Discrepancies::default(),
    }
}

/// VAT payable projection from side-A totals of a sales and a purchases run.
pub fn estimate_vat(sales: &ReconResult, purchases: &ReconResult, rate: f64) -> VatEstimate {
    vat_from_totals(sales.side_a.total, purchases.side_a.total, rate)
}

pub fn vat_from_totals(sales_total: i64, purchase_total: i64, rate: f64) -> VatEstimate {
    let sales_tax = sales_total as f64 * rate;
    let purchase_tax = purchase_total as f64 * rate;
    VatEstimate {
        rate,
        sales_tax,
        purchase_tax,
        payable: sales_tax - purchase_tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::map_columns;
    use crate::model::Cell;

    fn ds(amounts: &[i64]) -> Dataset {
        Dataset::with_rows(&["공급가액"], amounts.iter().map(|a| vec![Cell::from(*a)]).collect())
    }

    #[test]
    fn delta_is_a_minus_b() {
        let config = ReconConfig::default();
        let a = ds(&[600_000, 400_000]);
        let b = ds(&[900_000]);
        let r = summarize(
            Some(&a),
            Some(&b),
            &map_columns(&a, &config),
            &map_columns(&b, &config),
            "sales",
            &config,
        );
        assert_eq!(r.side_a, SideSummary { row_count: 2, total: 1_000_000 });
        assert_eq!(r.side_b, SideSummary { row_count: 1, total: 900_000 });
        assert_eq!(r.delta, 100_000);
        assert_eq!(r.label, "sales");
    }

    #[test]
    fn absent_side_is_zero() {
        let config = ReconConfig::default();
        let a = ds(&[5]);
        let r = summarize(Some(&a), None, &map_columns(&a, &config), &ColumnMapping::default(), "x", &config);
        assert_eq!(r.side_b, SideSummary::default());
        assert_eq!(r.delta, 5);
    }

    #[test]
    fn falls_back_to_total_column() {
        let config = ReconConfig::default();
        let d = Dataset::with_rows(&["합계"], vec![vec![Cell::from("1,100")], vec![Cell::from("2,200")]]);
        let s = summarize_side(Some(&d), &map_columns(&d, &config), &config);
        assert_eq!(s.total, 3300);
    }

    #[test]
    fn no_amount_column_counts_rows_only() {
        let config = ReconConfig::default();
        let d = Dataset::with_rows(&["메모"], vec![vec![Cell::from("a")], vec![Cell::from("b")]]);
        let s = summarize_side(Some(&d), &map_columns(&d, &config), &config);
        assert_eq!(s, SideSummary { row_count: 2, total: 0 });
    }

    #[test]
    fn payable_is_sales_tax_minus_purchase_tax() {
        let v = vat_from_totals(10_000_000, 4_000_000, 0.10);
        assert!((v.sales_tax - 1_000_000.0).abs() < 1e-6);
        assert!((v.purchase_tax - 400_000.0).abs() < 1e-6);
        assert!((v.payable - 600_000.0).abs() < 1e-6);
    }

    #[test]
    fn refund_position_is_negative() {
        let v = vat_from_totals(1_000, 5_000, 0.10);
        assert!(v.payable < 0.0);
    }
}
