//! Per-client session state.
//!
//! ## Lifecycle
//!
//! ```text
//! accept ──▶ Unregistered (nick = "AUTH") ──NICK+USER──▶ Registered
//!                  │                                        │
//!                  └──────── QUIT / I/O error / EOF ────────┴──▶ closed
//! ```
//!
//! A [`Session`] is shared (`Arc`) between its connection's two pumps, the
//! [`Directory`](super::Directory) and any deferred task acting for it. The
//! mutable fields live behind a `parking_lot::RwLock`; the guard is never
//! held across an `.await`. When the directory also needs the session lock,
//! the directory lock is taken first.

use crate::state::{SessionId, UserModes};
use lircd_proto::{Message, PLACEHOLDER_NICK};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

/// How many previous nicknames a session remembers.
pub const NICK_HISTORY_LEN: usize = 5;

/// Registration status. Only ever moves forward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Registration {
    #[default]
    Unregistered,
    Registered,
}

/// Mutable identity of a session.
#[derive(Debug)]
pub struct SessionState {
    /// Current nickname; [`PLACEHOLDER_NICK`] until one is chosen.
    pub nick: String,
    /// Username from USER. Empty until then.
    pub user: String,
    /// Real name from USER. Empty until then.
    pub realname: String,
    pub registration: Registration,
    /// `nick!~user@host`, maintained by the directory while registered.
    pub display_host: Option<String>,
    pub modes: UserModes,
    /// Earlier nicknames, most recent first.
    pub previous_nicks: VecDeque<String>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            nick: PLACEHOLDER_NICK.to_string(),
            user: String::new(),
            realname: String::new(),
            registration: Registration::Unregistered,
            display_host: None,
            modes: UserModes::default(),
            previous_nicks: VecDeque::with_capacity(NICK_HISTORY_LEN),
        }
    }

    pub fn is_registered(&self) -> bool {
        self.registration == Registration::Registered
    }

    /// Build `nick!~user@host` from the current fields.
    pub fn format_display_host(&self, host: &str) -> String {
        format!("{}!~{}@{}", self.nick, self.user, host)
    }

    /// Record `old` as the most recent previous nickname.
    pub(crate) fn remember_nick(&mut self, old: String) {
        if old == PLACEHOLDER_NICK {
            return;
        }
        if self.previous_nicks.len() == NICK_HISTORY_LEN {
            self.previous_nicks.pop_back();
        }
        self.previous_nicks.push_front(old);
    }
}

/// One connected client.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    addr: SocketAddr,
    host: String,
    outbound: mpsc::Sender<Message>,
    closed: AtomicBool,
    state: RwLock<SessionState>,
}

impl Session {
    /// Create a fresh, unregistered session.
    ///
    /// `outbound` is the sending side of the queue drained by this
    /// connection's writer pump.
    pub fn new(id: SessionId, addr: SocketAddr, outbound: mpsc::Sender<Message>) -> Self {
        Self {
            id,
            addr,
            host: addr.ip().to_string(),
            outbound,
            closed: AtomicBool::new(false),
            state: RwLock::new(SessionState::new()),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Host part of the display host (the peer IP).
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Shared access to the mutable fields. Do not hold across `.await`.
    pub fn state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read()
    }

    /// Exclusive access to the mutable fields. Do not hold across `.await`.
    pub fn state_mut(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write()
    }

    /// Current nickname (placeholder included).
    pub fn nick(&self) -> String {
        self.state.read().nick.clone()
    }

    pub fn is_registered(&self) -> bool {
        self.state.read().is_registered()
    }

    /// Display host, once registered.
    pub fn display_host(&self) -> Option<String> {
        self.state.read().display_host.clone()
    }

    /// Queue a line for this client, waiting if the queue is full.
    pub async fn send(&self, msg: Message) -> Result<(), mpsc::error::SendError<Message>> {
        self.outbound.send(msg).await
    }

    /// Queue a line without waiting. Used on teardown paths where delivery
    /// is best effort.
    pub fn try_send(&self, msg: Message) -> bool {
        self.outbound.try_send(msg).is_ok()
    }

    /// Mark the session closed. Returns `true` only for the first caller.
    pub fn close(&self) -> bool {
        !self.closed.swap(true, Ordering::AcqRel)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
