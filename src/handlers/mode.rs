//! User mode handling.
//!
//! Handles `MODE <nick> [+/-modes]`. Sessions may only query or change
//! their own modes.

use crate::error::HandlerError;
use crate::handlers::helpers::mode_notice;
use crate::handlers::{Context, Handler, HandlerResult, Reply};
use crate::state::Session;
use lircd_proto::{Command, Message, Response, irc_eq, parse_user_modes};
use async_trait::async_trait;
use tracing::debug;

/// What applying a mode string did.
#[derive(Debug)]
pub(crate) struct ModeOutcome {
    /// Some requested flag is not usable.
    pub unknown: bool,
    /// Confirmation to send, present only when something changed.
    pub notice: Option<Message>,
}

/// Apply `modestr` to the session's modes in one step.
pub(crate) fn apply_user_modes(session: &Session, modestr: &str) -> ModeOutcome {
    let changes = parse_user_modes(modestr);
    let mut state = session.state_mut();
    let diff = state.modes.apply(&changes);
    let notice = (!diff.is_empty()).then(|| {
        let source = state.display_host.as_deref().unwrap_or(&state.nick);
        mode_notice(source, &state.nick, &diff.to_mode_string())
    });
    ModeOutcome {
        unknown: diff.unknown,
        notice,
    }
}

/// Handler for MODE command (user targets only).
pub struct ModeHandler;

#[async_trait]
impl Handler for ModeHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        if !ctx.session.is_registered() {
            return Err(HandlerError::NotRegistered);
        }

        let target = cmd.arg(0).unwrap_or("");
        if !irc_eq(target, &ctx.nick()) {
            return Err(HandlerError::UsersDontMatch);
        }

        let Some(modestr) = cmd.arg(1) else {
            let current = ctx.session.state().modes.as_mode_string();
            return Ok(Some(Reply::new(Response::RPL_UMODEIS, vec![current])));
        };

        let outcome = apply_user_modes(ctx.session, modestr);
        debug!(uid = %ctx.session.id(), modes = %modestr, changed = outcome.notice.is_some(), "User mode");

        if outcome.unknown {
            let reply = ctx.server_reply(
                Response::ERR_UMODEUNKNOWNFLAG,
                vec!["Unknown MODE flag".to_string()],
            );
            ctx.send(reply).await?;
        }
        if let Some(notice) = outcome.notice {
            ctx.send(notice).await?;
        }
        Ok(None)
    }
}
