//! User mode flags.

use lircd_proto::ModeChange;

/// Flags a client may set or clear on itself.
pub const USABLE_USER_MODES: &str = "iw";

/// User modes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UserModes {
    pub invisible: bool, // +i
    pub wallops: bool,   // +w
}

impl UserModes {
    /// Current state of `flag`, or `None` if the flag is not a usable mode.
    pub fn get(&self, flag: char) -> Option<bool> {
        match flag {
            'i' => Some(self.invisible),
            'w' => Some(self.wallops),
            _ => None,
        }
    }

    /// Set or clear `flag`. Returns `false` for flags that are not usable.
    pub fn set(&mut self, flag: char, on: bool) -> bool {
        match flag {
            'i' => self.invisible = on,
            'w' => self.wallops = on,
            _ => return false,
        }
        true
    }

    /// Convert modes to a string like "+iw".
    pub fn as_mode_string(&self) -> String {
        let mut s = String::from("+");
        s.extend(USABLE_USER_MODES.chars().filter(|&f| self.get(f) == Some(true)));
        s
    }

    /// Apply changes in order and report the net difference.
    ///
    /// A flag toggled back within the same call (`-w+w`) does not appear in
    /// the result. Unusable flags are skipped and flagged in [`ModeDiff::unknown`].
    pub fn apply(&mut self, changes: &[ModeChange]) -> ModeDiff {
        let before = *self;
        let mut unknown = false;
        for change in changes {
            if !self.set(change.flag, change.adding) {
                unknown = true;
            }
        }

        let mut diff = ModeDiff {
            unknown,
            ..ModeDiff::default()
        };
        for flag in USABLE_USER_MODES.chars() {
            match (before.get(flag), self.get(flag)) {
                (Some(false), Some(true)) => diff.added.push(flag),
                (Some(true), Some(false)) => diff.removed.push(flag),
                _ => {}
            }
        }
        diff
    }
}

/// Net effect of one mode command.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ModeDiff {
    /// Flags newly set.
    pub added: String,
    /// Flags newly cleared.
    pub removed: String,
    /// At least one requested flag was not usable.
    pub unknown: bool,
}

impl ModeDiff {
    /// Nothing changed.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Wire form: `-<removed>+<added>`, each half omitted when empty.
    pub fn to_mode_string(&self) -> String {
        let mut s = String::new();
        if !self.removed.is_empty() {
            s.push('-');
            s.push_str(&self.removed);
        }
        if !self.added.is_empty() {
            s.push('+');
            s.push_str(&self.added);
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lircd_proto::parse_user_modes;

    fn apply(modes: &mut UserModes, s: &str) -> ModeDiff {
        modes.apply(&parse_user_modes(s))
    }

    #[test]
    fn mode_string_lists_set_flags() {
        let mut modes = UserModes::default();
        assert_eq!(modes.as_mode_string(), "+");
        modes.wallops = true;
        assert_eq!(modes.as_mode_string(), "+w");
        modes.invisible = true;
        assert_eq!(modes.as_mode_string(), "+iw");
    }

    #[test]
    fn setting_reports_only_changes() {
        let mut modes = UserModes::default();
        let diff = apply(&mut modes, "+iw");
        assert_eq!(diff.to_mode_string(), "+iw");
        assert!(!diff.unknown);

        let diff = apply(&mut modes, "+i");
        assert!(diff.is_empty());
    }

    #[test]
    fn toggle_within_one_command_cancels_out() {
        let mut modes = UserModes {
            invisible: true,
            wallops: true,
        };
        let diff = apply(&mut modes, "-w+w");
        assert!(diff.is_empty());
        assert_eq!(modes.as_mode_string(), "+iw");

        let diff = apply(&mut modes, "+w-w");
        assert_eq!(diff.to_mode_string(), "-w");
        assert_eq!(modes.as_mode_string(), "+i");
    }

    #[test]
    fn unknown_flags_do_not_block_known_ones() {
        let mut modes = UserModes::default();
        let diff = apply(&mut modes, "+xiz");
        assert!(diff.unknown);
        assert_eq!(diff.to_mode_string(), "+i");
        assert!(modes.invisible);
    }

    #[test]
    fn mixed_diff_puts_removals_first() {
        let mut modes = UserModes {
            invisible: true,
            wallops: false,
        };
        let diff = apply(&mut modes, "+w-i");
        assert_eq!(diff.to_mode_string(), "-i+w");
    }
}
