//! ISON handler.

use crate::handlers::helpers::batch_targets;
use crate::handlers::{Context, Handler, HandlerResult, Reply};
use async_trait::async_trait;
use lircd_proto::{Command, Response};

/// Handler for ISON command.
///
/// Replies with the stored spelling of every requested name that some
/// session currently holds, registered or not.
pub struct IsonHandler;

#[async_trait]
impl Handler for IsonHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        let online: Vec<String> = batch_targets(&cmd.args)
            .into_iter()
            .filter_map(|name| ctx.matrix.directory.lookup(name))
            .map(|found| found.session.nick())
            .collect();

        Ok(Some(Reply::new(Response::RPL_ISON, vec![online.join(" ")])))
    }
}
