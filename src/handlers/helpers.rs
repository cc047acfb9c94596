//! Helper functions shared by handlers.

use lircd_proto::Message;

/// Most names a batch query (USERHOST, ISON) looks at.
pub const MAX_BATCH_TARGETS: usize = 5;

/// Names requested by a batch query.
///
/// Names may arrive as separate arguments or space-separated inside a
/// free-text tail; only the first [`MAX_BATCH_TARGETS`] are kept.
pub fn batch_targets(args: &[String]) -> Vec<&str> {
    args.iter()
        .flat_map(|arg| arg.split_whitespace())
        .take(MAX_BATCH_TARGETS)
        .collect()
}

/// `:<source> MODE <nick> :<change>`, the confirmation of a user mode change.
pub fn mode_notice(source: &str, nick: &str, change: &str) -> Message {
    Message::new("MODE", vec![nick.to_string(), change.to_string()]).with_prefix(source)
}
