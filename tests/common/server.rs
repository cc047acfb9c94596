//! Test server management.
//!
//! Runs a gateway inside the test's runtime on an ephemeral port.

use lircd::config::Config;
use lircd::network::Gateway;
use lircd::state::Matrix;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A test server instance. Shuts down when dropped.
pub struct TestServer {
    addr: SocketAddr,
    matrix: Arc<Matrix>,
    shutdown: CancellationToken,
}

impl TestServer {
    /// Spawn a server with the test defaults.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn a server after letting the caller adjust the configuration.
    pub async fn spawn_with(configure: impl FnOnce(&mut Config)) -> anyhow::Result<Self> {
        let mut config = Config::parse(
            r#"
[server]
name = "test.server"
network = "TestNet"
description = "Test IRC Server"

[listen]
address = "127.0.0.1:0"

[motd]
lines = ["Test Server"]
"#,
        )?;
        configure(&mut config);

        let matrix = Arc::new(Matrix::new(&config));
        let gateway = Gateway::bind(config.listen.address, Arc::clone(&matrix)).await?;
        let addr = gateway.local_addr()?;
        let shutdown = gateway.shutdown_token();
        tokio::spawn(gateway.run());

        Ok(Self {
            addr,
            matrix,
            shutdown,
        })
    }

    /// Address clients should connect to.
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    /// Shared state of the running server.
    pub fn matrix(&self) -> &Arc<Matrix> {
        &self.matrix
    }

    /// Poll until `nick` is no longer held by any session.
    #[allow(dead_code)]
    pub async fn wait_nick_free(&self, nick: &str) -> anyhow::Result<()> {
        for _ in 0..100 {
            if self.matrix.directory.lookup(nick).is_none() {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        anyhow::bail!("{nick} still held after 2s")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
