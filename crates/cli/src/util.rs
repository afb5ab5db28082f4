use unicode_width::UnicodeWidthStr;

/// Display width of a string; Hangul and other CJK glyphs take two columns.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `width` display columns, adding ".." if truncated.
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    if width < 3 {
        return s
            .chars()
            .next()
            .filter(|ch| unicode_width::UnicodeWidthChar::width(*ch).unwrap_or(0) <= width)
            .map(String::from)
            .unwrap_or_default();
    }

    // Leave room for ".."
    let budget = width - 2;
    let mut used = 0;
    let mut end_byte = 0;
    for (i, ch) in s.char_indices() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        end_byte = i + ch.len_utf8();
    }

    format!("{}..", &s[..end_byte])
}

/// Pad or truncate a string to exactly `width` display columns.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let sw = display_width(s);
    if sw > width {
        let t = truncate_display(s, width);
        let tw = display_width(&t);
        format!("{}{}", t, " ".repeat(width.saturating_sub(tw)))
    } else {
        format!("{}{}", s, " ".repeat(width - sw))
    }
}

/// `1234567` -> `"1,234,567"`
pub(crate) fn format_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Like `format_thousands` but always carries a sign: `+405,000`, `-1`, `0`.
pub(crate) fn format_signed(n: i64) -> String {
    if n > 0 {
        format!("+{}", format_thousands(n))
    } else {
        format_thousands(n)
    }
}

/// Round a tax amount to whole won for display.
pub(crate) fn format_won(amount: f64) -> String {
    format_thousands(amount.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_width_hangul() {
        assert_eq!(display_width("hello"), 5);
        assert_eq!(display_width("쿠팡"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn truncate_fits() {
        assert_eq!(truncate_display("abc", 5), "abc");
        assert_eq!(truncate_display("abc", 3), "abc");
    }

    #[test]
    fn truncate_cuts() {
        assert_eq!(truncate_display("abcdef", 5), "abc..");
        assert_eq!(truncate_display("abc", 2), "a");
        assert_eq!(truncate_display("", 0), "");
    }

    #[test]
    fn truncate_hangul_boundary() {
        // 8 columns; budget of 4 keeps two syllables
        let t = truncate_display("주식회사", 6);
        assert_eq!(t, "주식..");
        assert!(display_width(&t) <= 6);
    }

    #[test]
    fn pad_right_aligns_mixed_scripts() {
        assert_eq!(pad_right("ab", 5), "ab   ");
        assert_eq!(pad_right("쿠팡", 6), "쿠팡  ");
        assert_eq!(pad_right("abcdef", 5), "abc..");
        // odd budget cannot split a wide glyph; pad the remainder
        assert_eq!(display_width(&pad_right("주식회사", 5)), 5);
    }

    #[test]
    fn thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(-1_234_567), "-1,234,567");
        assert_eq!(format_thousands(i64::MIN), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn signed_and_won() {
        assert_eq!(format_signed(405_000), "+405,000");
        assert_eq!(format_signed(-1), "-1");
        assert_eq!(format_signed(0), "0");
        assert_eq!(format_won(334_999.6), "335,000");
    }
}
