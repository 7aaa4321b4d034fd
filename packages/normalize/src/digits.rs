//! Full-width digit folding and thousands-separator stripping.

/// Folds full-width digits (０-９) to their ASCII equivalents, leaving
/// every other character untouched.
#[must_use]
pub fn fold_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            // U+FF10..=U+FF19 map to U+0030..=U+0039.
            '０'..='９' => char::from_u32(u32::from(c) - 0xFF10 + 0x30).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Removes full-width (，) and half-width (,) thousands separators.
#[must_use]
pub fn strip_separators(s: &str) -> String {
    s.chars().filter(|c| *c != '，' && *c != ',').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_full_width_digits() {
        assert_eq!(fold_digits("２３"), "23");
        assert_eq!(fold_digits("０１２"), "012");
    }

    #[test]
    fn folds_mixed_width_digits() {
        assert_eq!(fold_digits("2３4"), "234");
    }

    #[test]
    fn leaves_non_digit_characters_untouched() {
        assert_eq!(fold_digits("床面積２３：１８㎡"), "床面積23：18㎡");
        assert_eq!(fold_digits("山田太郎"), "山田太郎");
    }

    #[test]
    fn strips_both_separator_widths() {
        assert_eq!(strip_separators("1，234,567"), "1234567");
    }

    #[test]
    fn strip_passes_through_unseparated_digits() {
        assert_eq!(strip_separators("980"), "980");
    }
}
