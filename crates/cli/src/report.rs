// Quarterly check report: JSON document and plain-text summary

use std::fmt;

use serde::Serialize;
use vatcheck_recon::model::{MismatchEntry, MissingEntry};
use vatcheck_recon::{ReconResult, VatEstimate};

use crate::util::{format_signed, format_thousands, format_won, pad_right};

const RULE_WIDTH: usize = 50;
const KEY_WIDTH: usize = 24;
const AMOUNT_WIDTH: usize = 14;

/// Top-level JSON written by `vatcheck check`.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub quarter: String,
    pub company_name: String,
    pub sales: ReconResult,
    pub purchases: ReconResult,
    pub vat_estimate: VatEstimate,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.sales.is_clean() && self.purchases.is_clean()
    }

    pub fn issue_count(&self) -> usize {
        self.sales.issue_count() + self.purchases.issue_count()
    }
}

/// Plain-text summary of a check, rendered through `Display`.
pub struct Summary<'a> {
    pub report: &'a CheckReport,
    /// Header line under the title, e.g. `2026Q1 (2026-01-01 ~ 2026-03-31)`.
    pub period: &'a str,
    /// Who prepared the check and for whom.
    pub representative: &'a str,
    pub accountant_name: &'a str,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{rule}")?;
        writeln!(f, "  {} VAT self-check", report.company_name)?;
        writeln!(f, "  period: {}", self.period)?;
        writeln!(f, "{rule}")?;

        for result in [&report.sales, &report.purchases] {
            writeln!(f)?;
            write_result(f, result)?;
        }

        let v = &report.vat_estimate;
        let rate_pct = (v.rate * 10_000.0).round() / 100.0;
        writeln!(f)?;
        writeln!(f, "VAT estimate (ledger basis, {rate_pct}%)")?;
        write_amount_line(f, "sales tax", v.sales_tax)?;
        write_amount_line(f, "purchase tax", v.purchase_tax)?;
        write_amount_line(f, "payable", v.payable)?;

        writeln!(f)?;
        writeln!(
            f,
            "prepared by {} {} for {}",
            report.company_name, self.representative, self.accountant_name
        )
    }
}

fn write_amount_line(f: &mut fmt::Formatter<'_>, label: &str, amount: f64) -> fmt::Result {
    writeln!(f, "  {}{:>w$}", pad_right(label, KEY_WIDTH), format_won(amount), w = AMOUNT_WIDTH)
}

fn write_result(f: &mut fmt::Formatter<'_>, r: &ReconResult) -> fmt::Result {
    match r.key_field {
        Some(key) => writeln!(f, "{} (grouped by {key})", r.label)?,
        None => writeln!(f, "{} (totals only)", r.label)?,
    }

    writeln!(
        f,
        "  {}{:>w$}{:>w$}{:>w$}",
        pad_right("", 8),
        "ledger",
        "authority",
        "diff",
        w = AMOUNT_WIDTH
    )?;
    writeln!(
        f,
        "  {}{:>w$}{:>w$}{:>w$}",
        pad_right("rows", 8),
        format_thousands(r.side_a.row_count as i64),
        format_thousands(r.side_b.row_count as i64),
        format_signed(r.side_a.row_count as i64 - r.side_b.row_count as i64),
        w = AMOUNT_WIDTH
    )?;
    writeln!(
        f,
        "  {}{:>w$}{:>w$}{:>w$}",
        pad_right("total", 8),
        format_thousands(r.side_a.total),
        format_thousands(r.side_b.total),
        format_signed(r.delta),
        w = AMOUNT_WIDTH
    )?;

    if r.is_clean() {
        return writeln!(f, "  match");
    }

    write_missing(f, "missing from authority (ledger only)", r.missing_in_b())?;
    write_missing(f, "missing from ledger (authority only)", r.missing_in_a())?;
    write_mismatch(f, r.amount_mismatch())?;

    writeln!(f, "  {} issue(s)", r.issue_count())
}

fn write_missing(f: &mut fmt::Formatter<'_>, title: &str, entries: &[MissingEntry]) -> fmt::Result {
    if entries.is_empty() {
        return Ok(());
    }
    writeln!(f, "  {title}: {}", entries.len())?;
    for e in entries {
        writeln!(
            f,
            "    {}{:>w$}",
            pad_right(&e.key.to_string(), KEY_WIDTH),
            format_thousands(e.amount),
            w = AMOUNT_WIDTH
        )?;
    }
    Ok(())
}

fn write_mismatch(f: &mut fmt::Formatter<'_>, entries: &[MismatchEntry]) -> fmt::Result {
    if entries.is_empty() {
        return Ok(());
    }
    writeln!(f, "  amount mismatch: {}", entries.len())?;
    for e in entries {
        writeln!(
            f,
            "    {}{:>w$}{:>w$}{:>w$}",
            pad_right(&e.key.to_string(), KEY_WIDTH),
            format_thousands(e.amount_a),
            format_thousands(e.amount_b),
            format_signed(e.diff),
            w = AMOUNT_WIDTH
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vatcheck_recon::model::{Cell, Dataset};
    use vatcheck_recon::{estimate_vat, reconcile_default};

    fn ds(rows: &[(&str, i64)]) -> Dataset {
        Dataset::with_rows(
            &["거래처명", "공급가액"],
            rows.iter().map(|(k, v)| vec![Cell::from(*k), Cell::from(*v)]).collect(),
        )
    }

    fn report(a: &Dataset, b: &Dataset) -> CheckReport {
        let sales = reconcile_default(Some(a), Some(b), "sales");
        let purchases = reconcile_default(None, None, "purchases");
        let vat_estimate = estimate_vat(&sales, &purchases, 0.1);
        CheckReport {
            quarter: "2026Q1".into(),
            company_name: "테스트상회".into(),
            sales,
            purchases,
            vat_estimate,
        }
    }

    fn summary(r: &CheckReport) -> String {
        Summary {
            report: r,
            period: "2026Q1",
            representative: "김대표",
            accountant_name: "한빛세무회계",
        }
        .to_string()
    }

    #[test]
    fn clean_report() {
        let a = ds(&[("쿠팡", 1_000_000)]);
        let r = report(&a, &a);
        assert!(r.is_clean());
        let text = summary(&r);
        assert!(text.contains("테스트상회 VAT self-check"));
        assert!(text.contains("sales (grouped by partner)"));
        assert!(text.contains("purchases (totals only)"));
        assert!(text.contains("  match"));
        assert!(text.contains("100,000"));
        assert!(text.ends_with("prepared by 테스트상회 김대표 for 한빛세무회계\n"));
    }

    #[test]
    fn discrepancies_listed() {
        let a = ds(&[("쿠팡", 1_000_000), ("네이버", 500_000)]);
        let b = ds(&[("쿠팡", 900_000)]);
        let r = report(&a, &b);
        assert!(!r.is_clean());
        assert_eq!(r.issue_count(), 2);

        let text = summary(&r);
        assert!(text.contains("missing from authority (ledger only): 1"));
        assert!(text.contains("amount mismatch: 1"));
        assert!(text.contains("+100,000"));
        assert!(text.contains("+600,000"));
        assert!(text.contains("2 issue(s)"));
    }

    #[test]
    fn json_document_shape() {
        let a = ds(&[("쿠팡", 1_000)]);
        let json = serde_json::to_value(report(&a, &a)).unwrap();
        assert_eq!(json["quarter"], "2026Q1");
        assert_eq!(json["sales"]["side_a"]["total"], 1_000);
        assert_eq!(json["purchases"]["key_field"], serde_json::Value::Null);
        assert_eq!(json["vat_estimate"]["payable"], 100.0);
    }
}
