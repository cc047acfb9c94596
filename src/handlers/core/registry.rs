//! Command handler registry and dispatch.
//!
//! The `Registry` is a fixed table built once at startup: command name to
//! handler plus the minimum argument count checked before the handler runs.

use super::context::{Context, Handler, HandlerResult};
use crate::error::HandlerError;
use crate::handlers::{
    connection::{CapHandler, NickHandler, PingHandler, QuitHandler, UserHandler},
    mode::ModeHandler,
    user_query::{IsonHandler, UserhostHandler},
};
use crate::telemetry::{CommandTimer, spans};
use lircd_proto::Command;
use std::collections::HashMap;
use tracing::{Instrument, debug};

/// Metric label used for names that are not in the table.
const UNKNOWN_LABEL: &str = "UNKNOWN";

struct Entry {
    handler: Box<dyn Handler>,
    min_args: usize,
}

/// Registry of command handlers.
pub struct Registry {
    handlers: HashMap<&'static str, Entry>,
}

impl Registry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
        };

        // Connection/registration handlers
        registry.insert("NICK", 1, NickHandler);
        registry.insert("USER", 4, UserHandler);
        registry.insert("CAP", 0, CapHandler);
        registry.insert("PING", 0, PingHandler);
        registry.insert("QUIT", 0, QuitHandler);

        // User handlers
        registry.insert("MODE", 1, ModeHandler);
        registry.insert("USERHOST", 1, UserhostHandler);
        registry.insert("ISON", 1, IsonHandler);

        registry
    }

    fn insert(&mut self, name: &'static str, min_args: usize, handler: impl Handler + 'static) {
        self.handlers.insert(
            name,
            Entry {
                handler: Box::new(handler),
                min_args,
            },
        );
    }

    /// Dispatch one command for the session in `ctx`.
    ///
    /// Pending deferred work is awaited first, so its output precedes
    /// anything this command produces. Protocol errors are answered with
    /// one reply line and swallowed; fatal errors are returned and end the
    /// connection.
    pub async fn dispatch(&self, ctx: &mut Context<'_>, cmd: &Command) -> Result<(), HandlerError> {
        ctx.deferred.settle().await;

        let name = cmd.name.as_str();
        let (label, result) = match self.handlers.get(name) {
            None => (UNKNOWN_LABEL, Err(HandlerError::UnknownCommand(name.to_string()))),
            Some(entry) if cmd.args.len() < entry.min_args => {
                (name, Err(HandlerError::NeedMoreParams))
            }
            Some(entry) => (name, self.run(entry, ctx, cmd).await),
        };

        match result {
            Ok(None) => Ok(()),
            Ok(Some(reply)) => {
                let msg = ctx.server_reply(reply.response, reply.params);
                ctx.send(msg).await
            }
            Err(e) => {
                crate::metrics::record_command_error(label, e.error_code());
                if e.is_fatal() {
                    return Err(e);
                }
                debug!(command = %name, error = %e, "Command error");
                let reply = e.to_irc_reply(ctx.server_name(), &ctx.nick(), name);
                if let Some(reply) = reply {
                    ctx.send(reply).await?;
                }
                Ok(())
            }
        }
    }

    async fn run(&self, entry: &Entry, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        let span = spans::command(&cmd.name, ctx.session.id(), &ctx.nick());
        let _timer = CommandTimer::new(cmd.name.as_str());
        entry.handler.handle(ctx, cmd).instrument(span).await
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::core::harness::Harness;
    use lircd_proto::Message;

    #[tokio::test]
    async fn unknown_command_gets_421() {
        let mut h = Harness::new();
        h.line("FROB x").await.unwrap();
        assert_eq!(h.drain(), vec![":irc.test 421 AUTH FROB :Unknown command"]);
    }

    #[tokio::test]
    async fn colon_led_command_name_stays_one_word() {
        let mut h = Harness::new();
        h.line(":src :X").await.unwrap();
        let replies = h.drain();
        assert_eq!(replies, vec![":irc.test 421 AUTH X :Unknown command"]);
        let reply: Message = replies[0].parse().unwrap();
        assert_eq!(reply.params, vec!["AUTH", "X", "Unknown command"]);
    }

    #[tokio::test]
    async fn short_user_never_reaches_the_handler() {
        let mut h = Harness::new();
        h.line("NICK Test").await.unwrap();
        h.line("USER only three args").await.unwrap();
        assert_eq!(
            h.drain(),
            vec![":irc.test 461 Test USER :Not enough parameters"]
        );
        let state = h.session.state();
        assert!(state.user.is_empty());
        assert!(state.realname.is_empty());
        assert!(!state.is_registered());
    }

    #[tokio::test]
    async fn replies_follow_command_order() {
        let mut h = Harness::new();
        h.line("PING :one").await.unwrap();
        h.line("FROB").await.unwrap();
        h.line("PING :two").await.unwrap();
        assert_eq!(
            h.drain(),
            vec![
                ":irc.test PONG irc.test :one",
                ":irc.test 421 AUTH FROB :Unknown command",
                ":irc.test PONG irc.test :two",
            ]
        );
    }

    #[tokio::test]
    async fn fatal_errors_are_returned_not_replied() {
        let mut h = Harness::new();
        let err = h.line("QUIT :bye").await.unwrap_err();
        assert!(matches!(err, crate::error::HandlerError::Quit(Some(ref r)) if r == "bye"));
        assert!(h.drain().is_empty());
    }
}
