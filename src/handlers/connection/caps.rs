//! CAP handler.

use crate::handlers::{Context, Handler, HandlerResult};
use async_trait::async_trait;
use lircd_proto::Command;

/// Handler for CAP command.
///
/// No capabilities are offered; every subcommand is accepted silently so
/// clients that open with `CAP LS` carry on with plain registration.
pub struct CapHandler;

#[async_trait]
impl Handler for CapHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        tracing::trace!(uid = %ctx.session.id(), subcommand = ?cmd.arg(0), "CAP ignored");
        Ok(None)
    }
}
