//! PING handler.

use crate::handlers::{Context, Handler, HandlerResult};
use async_trait::async_trait;
use lircd_proto::{Command, Message};

/// Handler for PING command.
///
/// Answers in any registration state.
pub struct PingHandler;

#[async_trait]
impl Handler for PingHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        // PING <token>
        let token = cmd.arg(0).unwrap_or("");

        let pong = Message::pong(ctx.server_name(), token);
        ctx.send(pong).await?;

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::core::harness::Harness;

    #[tokio::test]
    async fn echoes_token_before_and_after_registration() {
        let mut h = Harness::new();
        h.line("PING :abc123").await.unwrap();
        assert_eq!(h.drain(), vec![":irc.test PONG irc.test :abc123"]);

        h.register("Pinger").await;
        h.line("PING tok").await.unwrap();
        assert_eq!(h.drain(), vec![":irc.test PONG irc.test :tok"]);
    }
}
