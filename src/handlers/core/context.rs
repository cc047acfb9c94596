//! Command handler context and core types.
//!
//! Defines the `Context<'a>` passed to every handler, the [`Handler`] trait
//! itself and [`Deferred`], the slot holding a connection's pending
//! background work.

use crate::error::HandlerError;
use crate::state::{Matrix, Session};
use async_trait::async_trait;
use lircd_proto::{Command, Message, Response};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::warn;

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// The session the command arrived on.
    pub session: &'a Arc<Session>,
    /// Shared server state.
    pub matrix: &'a Arc<Matrix>,
    /// Background work that must finish before this connection's next command.
    pub deferred: &'a mut Deferred,
}

impl<'a> Context<'a> {
    pub fn new(session: &'a Arc<Session>, matrix: &'a Arc<Matrix>, deferred: &'a mut Deferred) -> Self {
        Self {
            session,
            matrix,
            deferred,
        }
    }

    #[inline]
    pub fn server_name(&self) -> &str {
        &self.matrix.server_info.name
    }

    /// Current nickname of the session (the placeholder before one is set).
    pub fn nick(&self) -> String {
        self.session.nick()
    }

    /// Build a numeric reply addressed to this session's current nickname.
    pub fn server_reply(&self, response: Response, params: Vec<String>) -> Message {
        let mut full = Vec::with_capacity(params.len() + 1);
        full.push(self.nick());
        full.extend(params);
        Message::response(self.server_name(), response, full)
    }

    /// Queue a line for this session.
    pub async fn send(&self, msg: Message) -> Result<(), HandlerError> {
        self.session.send(msg).await?;
        Ok(())
    }
}

/// A numeric reply returned by a handler. The dispatcher prepends the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub response: Response,
    pub params: Vec<String>,
}

impl Reply {
    pub fn new(response: Response, params: Vec<String>) -> Self {
        Self { response, params }
    }
}

/// Result type for command handlers.
///
/// `Ok(Some(reply))` asks the dispatcher to send one numeric; handlers with
/// richer output queue it themselves through [`Context::send`].
pub type HandlerResult = Result<Option<Reply>, HandlerError>;

/// Handler trait implemented by every command.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult;
}

/// Background task whose output must reach the client before the reply to
/// any later command on the same connection.
///
/// The dispatcher calls [`settle`](Self::settle) before every command, so a
/// handler can return quickly while the task keeps writing. Dropping the slot
/// aborts whatever is still running.
#[derive(Debug, Default)]
pub struct Deferred {
    task: Option<JoinHandle<()>>,
}

impl Deferred {
    /// Record `task`. Any previous task is waited for by the caller first;
    /// one left running here is aborted.
    pub fn set(&mut self, task: JoinHandle<()>) {
        if let Some(old) = self.task.replace(task) {
            old.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Wait for the pending task, if any.
    pub async fn settle(&mut self) {
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
            && e.is_panic()
        {
            warn!(error = %e, "deferred task panicked");
        }
    }

    /// Stop the pending task without waiting for it.
    pub fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Deferred {
    fn drop(&mut self) {
        self.abort();
    }
}
