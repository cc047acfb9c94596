//! QUIT handler.

use crate::error::HandlerError;
use crate::handlers::{Context, Handler, HandlerResult};
use async_trait::async_trait;
use lircd_proto::Command;

/// Handler for QUIT command.
pub struct QuitHandler;

#[async_trait]
impl Handler for QuitHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        let quit_msg = cmd.arg(0).map(str::to_string);

        tracing::info!(
            uid = %ctx.session.id(),
            nick = %ctx.nick(),
            message = ?quit_msg,
            "Client quit"
        );

        // The connection loop sends ERROR and tears down.
        Err(HandlerError::Quit(quit_msg))
    }
}
