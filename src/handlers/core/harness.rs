//! In-memory dispatcher harness for handler tests.

use super::context::{Context, Deferred};
use super::registry::Registry;
use crate::config::Config;
use crate::error::HandlerError;
use crate::state::{Matrix, Session};
use lircd_proto::{Command, Message};
use std::sync::Arc;
use tokio::sync::mpsc;

pub(crate) struct Harness {
    pub matrix: Arc<Matrix>,
    pub session: Arc<Session>,
    pub registry: Registry,
    pub deferred: Deferred,
    rx: mpsc::Receiver<Message>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let matrix = Arc::new(Matrix::new(&config));
        let (session, rx) = Self::connect(&matrix);
        Self {
            matrix,
            session,
            registry: Registry::new(),
            deferred: Deferred::default(),
            rx,
        }
    }

    /// A second session attached to the same matrix.
    pub fn peer(&self) -> Harness {
        let (session, rx) = Self::connect(&self.matrix);
        Harness {
            matrix: Arc::clone(&self.matrix),
            session,
            registry: Registry::new(),
            deferred: Deferred::default(),
            rx,
        }
    }

    fn connect(matrix: &Arc<Matrix>) -> (Arc<Session>, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(256);
        let addr = "203.0.113.9:51000".parse().unwrap();
        let session = Arc::new(Session::new(matrix.id_gen.next(), addr, tx));
        matrix.directory.insert_unregistered(Arc::clone(&session));
        (session, rx)
    }

    /// Dispatch one raw line.
    pub async fn line(&mut self, line: &str) -> Result<(), HandlerError> {
        let cmd: Command = line.parse().unwrap();
        let mut ctx = Context::new(&self.session, &self.matrix, &mut self.deferred);
        self.registry.dispatch(&mut ctx, &cmd).await
    }

    /// Register with `NICK nick` / `USER`, wait for the burst and discard it.
    pub async fn register(&mut self, nick: &str) {
        self.line(&format!("NICK {nick}")).await.unwrap();
        self.line("USER user 0 * :Real Name").await.unwrap();
        self.deferred.settle().await;
        self.drain();
    }

    /// Everything queued so far, rendered.
    pub fn drain(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            out.push(msg.to_string());
        }
        out
    }
}

pub(crate) fn test_config() -> Config {
    let mut config = Config::default();
    config.server.name = "irc.test".into();
    config.server.network = "TestNet".into();
    config.motd.lines = vec!["Hello".into()];
    config
}
