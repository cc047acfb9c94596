//! Test IRC client.
//!
//! Speaks raw lines over TCP and parses what comes back into
//! [`lircd_proto::Message`] values.

use lircd_proto::Message;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test IRC client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;

        // Split stream for reading and writing
        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        })
    }

    /// Send a raw line (CRLF appended when missing).
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with('\n') {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive one line, without its terminator.
    pub async fn recv_line(&mut self) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(Duration::from_secs(5), self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("connection closed");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Receive a single message from the server.
    pub async fn recv(&mut self) -> anyhow::Result<Message> {
        let line = self.recv_line().await?;
        line.parse::<Message>()
            .map_err(|e| anyhow::anyhow!("Parse error on {line:?}: {e}"))
    }

    /// Receive messages until the given predicate returns true.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<Message>>
    where
        F: FnMut(&Message) -> bool,
    {
        let mut messages = Vec::new();
        loop {
            let msg = self.recv().await?;
            let done = predicate(&msg);
            messages.push(msg);
            if done {
                return Ok(messages);
            }
        }
    }

    /// Send `PING :<token>` and collect everything up to the matching PONG.
    ///
    /// Replies arrive in command order, so this returns all output caused
    /// by earlier commands (the PONG included, last).
    pub async fn sync(&mut self, token: &str) -> anyhow::Result<Vec<Message>> {
        self.send_raw(&format!("PING :{token}")).await?;
        self.recv_until(|m| m.command == "PONG" && m.param(1) == Some(token))
            .await
    }

    /// Register with NICK + USER and wait for the whole welcome burst.
    pub async fn register(&mut self, nick: &str, user: &str, realname: &str) -> anyhow::Result<Vec<Message>> {
        self.send_raw(&format!("NICK {nick}")).await?;
        self.send_raw(&format!("USER {user} 0 * :{realname}")).await?;
        let burst = self.sync("registered").await?;
        if !burst.iter().any(|m| m.command == "001") {
            anyhow::bail!("Registration failed: no RPL_WELCOME in {burst:?}");
        }
        Ok(burst)
    }

    /// Wait for the server to close the connection, skipping any lines.
    pub async fn expect_eof(&mut self) -> anyhow::Result<Vec<String>> {
        let mut seen = Vec::new();
        loop {
            let mut line = String::new();
            match timeout(Duration::from_secs(5), self.reader.read_line(&mut line)).await? {
                Ok(0) | Err(_) => return Ok(seen),
                Ok(_) => seen.push(line.trim_end().to_string()),
            }
        }
    }
}
