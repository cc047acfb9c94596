//! User mode change strings.
//!
//! `+iw`, `-w+i` and bare `iw` (implicitly adding) are all accepted. Signs
//! switch direction for every flag that follows them.

/// One flag toggled by a mode string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeChange {
    /// `true` for `+`, `false` for `-`.
    pub adding: bool,
    /// The flag character. Not validated here.
    pub flag: char,
}

impl ModeChange {
    /// Shorthand for an added flag.
    pub const fn plus(flag: char) -> Self {
        Self { adding: true, flag }
    }

    /// Shorthand for a removed flag.
    pub const fn minus(flag: char) -> Self {
        Self { adding: false, flag }
    }
}

/// Split a user mode string into individual changes, in order.
///
/// ```
/// use lircd_proto::{parse_user_modes, ModeChange};
///
/// assert_eq!(
///     parse_user_modes("-w+i"),
///     vec![ModeChange::minus('w'), ModeChange::plus('i')]
/// );
/// ```
pub fn parse_user_modes(modes: &str) -> Vec<ModeChange> {
    let mut adding = true;
    let mut changes = Vec::with_capacity(modes.len());
    for c in modes.chars() {
        match c {
            '+' => adding = true,
            '-' => adding = false,
            flag => changes.push(ModeChange { adding, flag }),
        }
    }
    changes
}
