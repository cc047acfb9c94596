//! USER handler and registration completion.

use super::welcome;
use crate::error::HandlerError;
use crate::handlers::{Context, Handler, HandlerResult};
use async_trait::async_trait;
use lircd_proto::{Command, NickExt};
use std::sync::Arc;
use tracing::info;

/// Handler for USER command.
///
/// `USER <username> <mode> <unused> :<realname>`. Completes registration
/// when a nickname is already set; otherwise the connection is dropped.
/// The welcome burst runs as deferred work so this returns immediately.
pub struct UserHandler;

#[async_trait]
impl Handler for UserHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        if ctx.session.is_registered() {
            return Err(HandlerError::AlreadyRegistered);
        }

        let username = cmd.arg(0).unwrap_or("");
        let realname = cmd.arg(3).unwrap_or("");
        {
            let mut state = ctx.session.state_mut();
            state.user = username.to_string();
            state.realname = realname.to_string();
            if state.nick.is_placeholder_nick() {
                return Err(HandlerError::RegistrationFailed("USER before NICK".into()));
            }
        }
        if username.is_empty() || realname.is_empty() {
            return Err(HandlerError::RegistrationFailed("empty user or real name".into()));
        }

        ctx.matrix.directory.promote(ctx.session)?;
        crate::metrics::client_registered();
        info!(
            uid = %ctx.session.id(),
            nick = %ctx.nick(),
            user = %username,
            "Client registered"
        );

        let burst = welcome::send(Arc::clone(ctx.session), Arc::clone(ctx.matrix));
        ctx.deferred.set(tokio::spawn(async move {
            if let Err(e) = burst.await {
                tracing::debug!(error = %e, "welcome burst cut short");
            }
        }));

        Ok(None)
    }
}
