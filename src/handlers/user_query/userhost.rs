//! USERHOST handler.

use crate::handlers::helpers::batch_targets;
use crate::handlers::{Context, Handler, HandlerResult, Reply};
use async_trait::async_trait;
use lircd_proto::{Command, Response};

/// Handler for USERHOST command.
///
/// `USERHOST <nick> [<nick> ...]`, up to five names. Only registered
/// sessions are listed, as `nick=+~user@host`.
pub struct UserhostHandler;

#[async_trait]
impl Handler for UserhostHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        let entries: Vec<String> = batch_targets(&cmd.args)
            .into_iter()
            .filter_map(|name| ctx.matrix.directory.lookup(name))
            .filter(|found| found.registered)
            .map(|found| {
                let state = found.session.state();
                format!("{}=+~{}@{}", state.nick, state.user, found.session.host())
            })
            .collect();

        Ok(Some(Reply::new(Response::RPL_USERHOST, vec![entries.join(" ")])))
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::core::harness::Harness;

    #[tokio::test]
    async fn lists_registered_sessions_only() {
        let mut asker = Harness::new();
        let mut alice = asker.peer();
        let mut pending = asker.peer();
        alice.register("Alice").await;
        pending.line("NICK Pending").await.unwrap();

        asker.line("USERHOST alice Pending nobody").await.unwrap();
        assert_eq!(
            asker.drain(),
            vec![":irc.test 302 AUTH :Alice=+~user@203.0.113.9"]
        );
    }

    #[tokio::test]
    async fn unknown_names_give_empty_reply() {
        let mut h = Harness::new();
        h.line("USERHOST :ghost spook").await.unwrap();
        assert_eq!(h.drain(), vec![":irc.test 302 AUTH :"]);
    }
}
