use std::collections::BTreeSet;

use crate::model::{Discrepancies, GroupKey, Ledger, MismatchEntry, MissingEntry};

/// Compare two ledgers key by key.
///
/// A side holding exactly 0 counts as missing, even when 0 was recorded on
/// purpose; "missing" wins over "mismatch". Keys are visited in ascending
/// order so the output is deterministic. Differences are measured without
/// overflow; `diff` saturates at the `i64` bounds.
pub fn classify(a: &Ledger, b: &Ledger, tolerance: i64) -> Discrepancies {
    let keys: BTreeSet<&GroupKey> = a.keys().chain(b.keys()).collect();
    // Negative tolerance is rejected by config validation; treat it as exact.
    let tolerance = u64::try_from(tolerance).unwrap_or(0);
    let mut out = Discrepancies::default();

    for key in keys {
        let amount_a = a.get(key).copied().unwrap_or(0);
        let amount_b = b.get(key).copied().unwrap_or(0);

        if amount_a > 0 && amount_b == 0 {
            out.missing_in_b.push(MissingEntry {
                key: key.clone(),
                amount: amount_a,
            });
        } else if amount_a == 0 && amount_b > 0 {
            out.missing_in_a.push(MissingEntry {
                key: key.clone(),
                amount: amount_b,
            });
        } else if amount_a.abs_diff(amount_b) > tolerance {
            out.amount_mismatch.push(MismatchEntry {
                key: key.clone(),
                amount_a,
                amount_b,
                diff: amount_a.saturating_sub(amount_b),
            });
        }
    }

    out
}
