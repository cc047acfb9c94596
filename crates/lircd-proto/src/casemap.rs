//! RFC 1459 case mapping.
//!
//! Identifiers are compared case-insensitively, and under `rfc1459` the
//! characters `[]\~` are the uppercase forms of `{}|^`. The directory keys
//! its registered namespace by the folded form produced here.

/// Fold a single character.
#[inline]
pub const fn irc_lower_char(c: char) -> char {
    match c {
        'A'..='Z' => c.to_ascii_lowercase(),
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        _ => c,
    }
}

/// Fold a whole identifier into its directory key.
pub fn irc_to_lower(s: &str) -> String {
    let mut folded = String::with_capacity(s.len());
    folded.extend(s.chars().map(irc_lower_char));
    folded
}

/// Case-insensitive identifier comparison.
pub fn irc_eq(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a
            .chars()
            .map(irc_lower_char)
            .eq(b.chars().map(irc_lower_char))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_ascii_and_rfc1459_specials() {
        assert_eq!(irc_to_lower("SliCk"), "slick");
        assert_eq!(irc_to_lower("[Foo]\\Bar~"), "{foo}|bar^");
        assert_eq!(irc_to_lower("already{lower}"), "already{lower}");
    }

    #[test]
    fn leaves_non_ascii_untouched() {
        assert_eq!(irc_lower_char('É'), 'É');
        assert_eq!(irc_lower_char('-'), '-');
    }

    #[test]
    fn equality_ignores_case_mapping() {
        assert!(irc_eq("Same", "sAME"));
        assert!(irc_eq("nick[away]", "NICK{AWAY}"));
        assert!(irc_eq("a\\b", "A|B"));
        assert!(!irc_eq("same", "sane"));
        assert!(!irc_eq("same", "same_"));
    }
}
