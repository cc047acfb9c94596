//! Identifier (nickname) grammar.
//!
//! ```text
//! nickname = ( letter / special ) *8( letter / digit / special / "-" )
//! special  = "[" / "]" / "\" / "`" / "_" / "^" / "{" / "|" / "}"
//! ```
//!
//! The placeholder assigned to fresh connections is not a valid choice.

/// Identifier carried by a session before the client picks one.
pub const PLACEHOLDER_NICK: &str = "AUTH";

/// Longest identifier accepted: one leading character plus eight more.
pub const NICK_MAX_LEN: usize = 9;

#[inline]
fn is_special(c: char) -> bool {
    matches!(c, '[' | ']' | '\\' | '`' | '_' | '^' | '{' | '|' | '}')
}

/// Extension trait for validating identifiers.
pub trait NickExt {
    /// Whether this string satisfies the identifier grammar.
    ///
    /// ```
    /// use lircd_proto::NickExt;
    ///
    /// assert!("Test".is_valid_nick());
    /// assert!("[away]-9".is_valid_nick());
    /// assert!(!"1R23".is_valid_nick());
    /// assert!(!"R123333333".is_valid_nick());
    /// ```
    fn is_valid_nick(&self) -> bool;

    /// Whether this string is the reserved placeholder (any case).
    fn is_placeholder_nick(&self) -> bool;
}

impl NickExt for str {
    fn is_valid_nick(&self) -> bool {
        let mut chars = self.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if !(first.is_ascii_alphabetic() || is_special(first)) {
            return false;
        }

        let mut rest = 0usize;
        for c in chars {
            rest += 1;
            if rest > NICK_MAX_LEN - 1 {
                return false;
            }
            if !(c.is_ascii_alphanumeric() || is_special(c) || c == '-') {
                return false;
            }
        }
        true
    }

    fn is_placeholder_nick(&self) -> bool {
        crate::casemap::irc_eq(self, PLACEHOLDER_NICK)
    }
}

impl NickExt for String {
    fn is_valid_nick(&self) -> bool {
        self.as_str().is_valid_nick()
    }

    fn is_placeholder_nick(&self) -> bool {
        self.as_str().is_placeholder_nick()
    }
}
