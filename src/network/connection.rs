//! Connection - Handles an individual client connection.
//!
//! Each connection runs two pumps:
//!
//! ```text
//!   socket ──FramedRead<IrcCodec>──▶ reader pump ──▶ Registry::dispatch
//!                                                         │
//!                                                 Session::send (mpsc)
//!                                                         ▼
//!   socket ◀──FramedWrite<IrcCodec>── writer pump ◀── outbound queue
//! ```
//!
//! The reader handles one command at a time, so replies leave in command
//! order. Either pump can end the connection; both cancel a shared token and
//! call [`teardown`], which only acts once.

use crate::error::HandlerError;
use crate::handlers::{Context, Deferred, Registry};
use crate::state::{Matrix, Session};
use crate::telemetry::spans;
use futures_util::{SinkExt, StreamExt};
use lircd_proto::{IrcCodec, Message, ProtocolError};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, warn};

/// How long the writer may keep flushing after the connection is cancelled.
const WRITER_GRACE: Duration = Duration::from_secs(5);

/// Build a QUIT closing link message.
fn closing_link_error(addr: &SocketAddr, quit_msg: Option<&str>) -> Message {
    let text = match quit_msg {
        Some(msg) => format!("Closing Link: {} (Quit: {})", addr.ip(), msg),
        None => format!("Closing Link: {} (Client Quit)", addr.ip()),
    };
    Message::error(text)
}

/// Remove `session` from the directory and settle the gauges.
///
/// Safe to call from both pumps; only the first call does anything and
/// returns `true`.
pub(crate) fn teardown(session: &Session, matrix: &Matrix) -> bool {
    if !session.close() {
        return false;
    }
    let was_registered = session.is_registered();
    matrix.directory.remove(session);
    crate::metrics::connection_closed(was_registered);
    debug!(uid = %session.id(), "Session removed from directory");
    true
}

/// A client connection handler.
pub struct Connection {
    session: Arc<Session>,
    stream: TcpStream,
    matrix: Arc<Matrix>,
    registry: Arc<Registry>,
    outbound: mpsc::Receiver<Message>,
    cancel: CancellationToken,
}

impl Connection {
    /// Create the session for a freshly accepted stream and enter it in the
    /// directory as unregistered.
    ///
    /// `cancel` ends the connection when cancelled (server shutdown).
    pub fn new(
        stream: TcpStream,
        addr: SocketAddr,
        matrix: Arc<Matrix>,
        registry: Arc<Registry>,
        cancel: CancellationToken,
    ) -> Self {
        let (tx, outbound) = mpsc::channel(matrix.config.sendq);
        let session = Arc::new(Session::new(matrix.id_gen.next(), addr, tx));
        matrix.directory.insert_unregistered(Arc::clone(&session));
        crate::metrics::connection_opened();

        Self {
            session,
            stream,
            matrix,
            registry,
            outbound,
            cancel,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Run both pumps until the connection ends.
    pub async fn run(self) -> anyhow::Result<()> {
        let span = spans::connection(self.session.id(), self.session.addr());
        self.run_inner().instrument(span).await
    }

    async fn run_inner(self) -> anyhow::Result<()> {
        let Self {
            session,
            stream,
            matrix,
            registry,
            outbound,
            cancel,
        } = self;
        info!(server = %matrix.server_info.name, "Client connected");

        let max_len = matrix.config.max_line_length;
        let (read_half, write_half) = stream.into_split();
        let reader = FramedRead::new(read_half, IrcCodec::with_max_len(max_len));
        let writer = FramedWrite::new(write_half, IrcCodec::with_max_len(max_len));

        let writer_task = tokio::spawn(
            write_loop(
                writer,
                outbound,
                cancel.clone(),
                Arc::clone(&session),
                Arc::clone(&matrix),
            )
            .in_current_span(),
        );

        let mut deferred = Deferred::default();
        let result = read_loop(reader, &session, &matrix, &registry, &mut deferred, &cancel).await;
        deferred.abort();

        match result {
            Ok(()) => {}
            Err(HandlerError::Quit(reason)) => {
                session.try_send(closing_link_error(&session.addr(), reason.as_deref()));
            }
            Err(HandlerError::RegistrationFailed(reason)) => {
                info!(%reason, "Registration failed, dropping client");
            }
            Err(HandlerError::Send(_)) => {
                debug!("Outbound queue closed");
            }
            Err(e) => {
                warn!(error = %e, "Connection ended by handler error");
            }
        }

        teardown(&session, &matrix);
        cancel.cancel();
        let writer_abort = writer_task.abort_handle();
        match tokio::time::timeout(WRITER_GRACE, writer_task).await {
            Ok(joined) => joined?,
            Err(_) => {
                debug!("Writer did not flush in time");
                writer_abort.abort();
            }
        }

        info!(nick = %session.nick(), "Client disconnected");
        Ok(())
    }
}

/// Reader pump: decode, dispatch, repeat.
///
/// Returns `Ok` on end of stream, read errors and cancellation; a fatal
/// handler error is passed back for the caller to act on.
async fn read_loop(
    mut reader: FramedRead<OwnedReadHalf, IrcCodec>,
    session: &Arc<Session>,
    matrix: &Arc<Matrix>,
    registry: &Registry,
    deferred: &mut Deferred,
    cancel: &CancellationToken,
) -> Result<(), HandlerError> {
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            next = reader.next() => next,
        };

        let cmd = match next {
            Some(Ok(cmd)) => cmd,
            Some(Err(ProtocolError::Io(e))) => {
                warn!(error = %e, "Read error");
                return Ok(());
            }
            Some(Err(e)) => {
                debug!(error = %e, "Malformed input, dropping client");
                return Ok(());
            }
            None => {
                debug!("Client closed the stream");
                return Ok(());
            }
        };

        let mut ctx = Context::new(session, matrix, deferred);
        tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            dispatched = registry.dispatch(&mut ctx, &cmd) => dispatched?,
        }
    }
}

/// Writer pump: drain the outbound queue in order.
///
/// On cancellation, lines already queued are still flushed before the write
/// half is closed.
async fn write_loop(
    mut writer: FramedWrite<OwnedWriteHalf, IrcCodec>,
    mut outbound: mpsc::Receiver<Message>,
    cancel: CancellationToken,
    session: Arc<Session>,
    matrix: Arc<Matrix>,
) {
    loop {
        tokio::select! {
            biased;
            msg = outbound.recv() => {
                let Some(msg) = msg else { break };
                if let Err(e) = writer.send(msg).await {
                    debug!(error = %e, "Write error");
                    teardown(&session, &matrix);
                    cancel.cancel();
                    return;
                }
            }
            _ = cancel.cancelled() => {
                outbound.close();
                while let Some(msg) = outbound.recv().await {
                    if writer.send(msg).await.is_err() {
                        break;
                    }
                }
                break;
            }
        }
    }
    let _ = writer.close().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn registered_session(matrix: &Matrix, nick: &str) -> Arc<Session> {
        let (tx, _rx) = mpsc::channel(4);
        let addr: SocketAddr = "192.0.2.1:4000".parse().unwrap();
        let session = Arc::new(Session::new(matrix.id_gen.next(), addr, tx));
        matrix.directory.insert_unregistered(Arc::clone(&session));
        matrix.directory.rename(&session, nick).unwrap();
        {
            let mut state = session.state_mut();
            state.user = "user".into();
            state.realname = "Real Name".into();
        }
        matrix.directory.promote(&session).unwrap();
        session
    }

    #[test]
    fn teardown_twice_acts_once() {
        let matrix = Matrix::new(&Config::default());
        let session = registered_session(&matrix, "Gone");

        assert!(teardown(&session, &matrix));
        assert!(!teardown(&session, &matrix));
        assert!(session.is_closed());
        assert!(matrix.directory.lookup("gone").is_none());
        assert_eq!(matrix.directory.registered_count(), 0);
        assert_eq!(matrix.directory.unregistered_count(), 0);
    }

    #[test]
    fn racing_pumps_tear_down_once() {
        let matrix = Matrix::new(&Config::default());
        let session = registered_session(&matrix, "Racer");

        let acted = std::thread::scope(|s| {
            let reader = s.spawn(|| teardown(&session, &matrix));
            let writer = s.spawn(|| teardown(&session, &matrix));
            [reader.join().unwrap(), writer.join().unwrap()]
        });
        assert_eq!(acted.iter().filter(|&&a| a).count(), 1);
        assert!(matrix.directory.lookup("racer").is_none());

        // The name is free for someone else.
        let next = registered_session(&matrix, "RACER");
        assert_eq!(
            matrix.directory.lookup("racer").unwrap().session.id(),
            next.id()
        );
    }

    #[test]
    fn closing_link_text() {
        let addr: SocketAddr = "192.0.2.1:4000".parse().unwrap();
        assert_eq!(
            closing_link_error(&addr, Some("bye")).to_string(),
            "ERROR :Closing Link: 192.0.2.1 (Quit: bye)"
        );
        assert_eq!(
            closing_link_error(&addr, None).to_string(),
            "ERROR :Closing Link: 192.0.2.1 (Client Quit)"
        );
    }
}
