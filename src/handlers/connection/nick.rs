//! NICK handler.

use crate::error::HandlerError;
use crate::handlers::{Context, Handler, HandlerResult};
use async_trait::async_trait;
use lircd_proto::{Command, Message, NickExt};
use tracing::info;

/// Handler for NICK command.
///
/// Works both during registration and after it. A registered session that
/// changes its name is told so with a NICK line from its old display host.
pub struct NickHandler;

#[async_trait]
impl Handler for NickHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        // NICK <nickname>
        let nick = cmd.arg(0).unwrap_or("");
        if nick.is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }
        if nick.is_placeholder_nick() || !nick.is_valid_nick() {
            return Err(HandlerError::ErroneousNickname(nick.to_string()));
        }

        let renamed = ctx.matrix.directory.rename(ctx.session, nick)?;

        if renamed.was_registered && renamed.old_nick != nick {
            info!(uid = %ctx.session.id(), old = %renamed.old_nick, new = %nick, "Nick changed");
            let source = renamed.old_display_host.unwrap_or(renamed.old_nick);
            let notice = Message::new("NICK", vec![nick.to_string()]).with_prefix(source);
            ctx.send(notice).await?;
        }

        Ok(None)
    }
}
