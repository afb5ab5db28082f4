use crate::config::{ReconConfig, DEFAULT_CURRENCY_MARKERS};
use crate::model::Cell;

/// Convert a raw cell into a whole currency amount. Never fails: anything
/// that isn't a finite number after cleanup becomes 0.
pub fn normalize(cell: &Cell, config: &ReconConfig) -> i64 {
    normalize_with(cell, &config.currency_markers)
}

/// `normalize` with the default currency markers.
pub fn normalize_amount(cell: &Cell) -> i64 {
    normalize_with(cell, &DEFAULT_CURRENCY_MARKERS)
}

fn normalize_with<S: AsRef<str>>(cell: &Cell, markers: &[S]) -> i64 {
    match cell {
        Cell::Empty => 0,
        Cell::Number(n) => truncate(*n),
        Cell::Text(s) => parse_text(s, markers),
    }
}

fn truncate(n: f64) -> i64 {
    if n.is_finite() {
        n.trunc() as i64
    } else {
        0
    }
}

fn parse_text<S: AsRef<str>>(raw: &str, markers: &[S]) -> i64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    let mut s = cleaned.as_str();
    for marker in markers {
        let marker = marker.as_ref();
        if marker.is_empty() {
            continue;
        }
        s = s.strip_suffix(marker).unwrap_or(s);
        s = s.strip_prefix(marker).unwrap_or(s);
    }

    s.parse::<f64>().map(truncate).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.into())
    }

    #[test]
    fn empty_and_nan_are_zero() {
        assert_eq!(normalize_amount(&Cell::Empty), 0);
        assert_eq!(normalize_amount(&Cell::Number(f64::NAN)), 0);
        assert_eq!(normalize_amount(&Cell::Number(f64::INFINITY)), 0);
        assert_eq!(normalize_amount(&text("")), 0);
        assert_eq!(normalize_amount(&text("nan")), 0);
    }

    #[test]
    fn numbers_truncate_toward_zero() {
        assert_eq!(normalize_amount(&Cell::Number(1234.99)), 1234);
        assert_eq!(normalize_amount(&Cell::Number(-1234.99)), -1234);
        assert_eq!(normalize_amount(&Cell::Number(0.4)), 0);
    }

    #[test]
    fn text_with_separators_and_marker() {
        assert_eq!(normalize_amount(&text("1,234,567원")), 1_234_567);
        assert_eq!(normalize_amount(&text(" 1 234 원 ")), 1234);
        assert_eq!(normalize_amount(&text("₩50,000")), 50_000);
        assert_eq!(normalize_amount(&text("-3,000.75")), -3000);
        assert_eq!(normalize_amount(&text("1e3")), 1000);
    }

    #[test]
    fn garbage_text_is_zero() {
        assert_eq!(normalize_amount(&text("N/A")), 0);
        assert_eq!(normalize_amount(&text("원")), 0);
        assert_eq!(normalize_amount(&text("12abc")), 0);
    }

    #[test]
    fn configured_markers_are_used() {
        let mut config = ReconConfig::default();
        config.currency_markers = vec!["KRW".into()];
        assert_eq!(normalize(&text("1,000KRW"), &config), 1000);
        assert_eq!(normalize(&text("1,000원"), &config), 0);
        assert_eq!(normalize(&Cell::Number(7.9), &config), 7);
    }

    #[test]
    fn normalize_is_idempotent_on_samples() {
        for cell in [text("1,234,567원"), text("-0.5"), Cell::Number(99.9), Cell::Empty, text("x")] {
            let once = normalize_amount(&cell);
            assert_eq!(normalize_amount(&Cell::Number(once as f64)), once);
        }
    }
}
