//! Process-wide session directory.
//!
//! Two maps behind one `parking_lot::Mutex`:
//!
//! - `unregistered`: keyed by [`SessionId`], sessions still in the handshake.
//! - `registered`: keyed by the RFC 1459 folded nickname, the authoritative
//!   namespace.
//!
//! Every mutating operation runs its whole check-then-act sequence inside
//! one critical section, so two sessions racing for the same name always
//! produce exactly one winner. A session lives in at most one map, and every
//! session in `registered` is marked registered. When a session's own lock
//! is needed it is taken after the directory lock.

use crate::state::session::{Registration, Session};
use crate::state::SessionId;
use lircd_proto::{irc_eq, irc_to_lower, NickExt};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Directory operation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("nickname {0} is already in use")]
    NicknameInUse(String),
    #[error("session has not supplied a nickname and user details")]
    NotReady,
    #[error("session is already registered")]
    AlreadyRegistered,
    #[error("session is not in the directory")]
    Detached,
}

/// Result of [`Directory::lookup`].
#[derive(Debug, Clone)]
pub struct Lookup {
    pub session: Arc<Session>,
    /// Found through the registered namespace.
    pub registered: bool,
}

/// What a successful [`Directory::rename`] replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renamed {
    pub old_nick: String,
    /// Display host before the rename; `None` while unregistered.
    pub old_display_host: Option<String>,
    pub was_registered: bool,
}

#[derive(Debug, Default)]
struct Maps {
    unregistered: HashMap<SessionId, Arc<Session>>,
    registered: HashMap<String, Arc<Session>>,
}

impl Maps {
    fn lookup(&self, nick: &str) -> Option<Lookup> {
        if nick.is_placeholder_nick() {
            return None;
        }
        if let Some(session) = self.registered.get(&irc_to_lower(nick)) {
            return Some(Lookup {
                session: Arc::clone(session),
                registered: true,
            });
        }
        self.unregistered
            .values()
            .find(|s| irc_eq(&s.state().nick, nick))
            .map(|session| Lookup {
                session: Arc::clone(session),
                registered: false,
            })
    }

    fn registered_key_of(&self, session: &Session) -> Option<String> {
        let key = irc_to_lower(&session.state().nick);
        match self.registered.get(&key) {
            Some(held) if held.id() == session.id() => Some(key),
            _ => None,
        }
    }
}

/// Concurrency-safe registry of live sessions.
#[derive(Debug, Default)]
pub struct Directory {
    inner: Mutex<Maps>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the session holding `nick` (case-insensitive).
    ///
    /// The registered namespace is consulted first; unregistered sessions
    /// that already chose a name are scanned after. The placeholder never
    /// matches.
    pub fn lookup(&self, nick: &str) -> Option<Lookup> {
        self.inner.lock().lookup(nick)
    }

    /// Track a freshly accepted session.
    pub fn insert_unregistered(&self, session: Arc<Session>) {
        let mut maps = self.inner.lock();
        maps.unregistered.insert(session.id(), session);
    }

    /// Give `session` the nickname `new_nick`.
    ///
    /// Fails with [`DirectoryError::NicknameInUse`] when any other session
    /// holds the name. A session changing only the case of its own name is
    /// not a collision. For registered sessions the namespace key and the
    /// display host move together.
    pub fn rename(&self, session: &Arc<Session>, new_nick: &str) -> Result<Renamed, DirectoryError> {
        let mut maps = self.inner.lock();

        if let Some(holder) = maps.lookup(new_nick)
            && holder.session.id() != session.id()
        {
            return Err(DirectoryError::NicknameInUse(new_nick.to_string()));
        }

        let registered_key = maps.registered_key_of(session);
        if registered_key.is_none() && !maps.unregistered.contains_key(&session.id()) {
            return Err(DirectoryError::Detached);
        }

        let mut state = session.state_mut();
        let old_nick = std::mem::replace(&mut state.nick, new_nick.to_string());
        let old_display_host = state.display_host.clone();
        if let Some(old_key) = registered_key {
            maps.registered.remove(&old_key);
            maps.registered
                .insert(irc_to_lower(new_nick), Arc::clone(session));
            let display_host = state.format_display_host(session.host());
            state.display_host = Some(display_host);
        }
        if old_nick != new_nick {
            state.remember_nick(old_nick.clone());
        }

        debug!(uid = %session.id(), old = %old_nick, new = %new_nick, "nickname changed");
        Ok(Renamed {
            old_nick,
            old_display_host,
            was_registered: state.is_registered(),
        })
    }

    /// Move `session` into the registered namespace.
    ///
    /// Requires a real nickname plus non-empty user and real name. On
    /// success the session is marked registered and its display host is set.
    pub fn promote(&self, session: &Arc<Session>) -> Result<(), DirectoryError> {
        let mut maps = self.inner.lock();
        let mut state = session.state_mut();

        if state.is_registered() {
            return Err(DirectoryError::AlreadyRegistered);
        }
        if state.nick.is_empty()
            || state.nick.is_placeholder_nick()
            || state.user.is_empty()
            || state.realname.is_empty()
        {
            return Err(DirectoryError::NotReady);
        }
        if !maps.unregistered.contains_key(&session.id()) {
            return Err(DirectoryError::Detached);
        }
        let key = irc_to_lower(&state.nick);
        if maps.registered.contains_key(&key) {
            return Err(DirectoryError::NicknameInUse(state.nick.clone()));
        }

        maps.unregistered.remove(&session.id());
        maps.registered.insert(key, Arc::clone(session));
        state.registration = Registration::Registered;
        let display_host = state.format_display_host(session.host());
        state.display_host = Some(display_host);
        Ok(())
    }

    /// Drop `session` from both maps. Safe to call any number of times.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&self, session: &Session) -> bool {
        let mut maps = self.inner.lock();
        let mut removed = maps.unregistered.remove(&session.id()).is_some();
        if let Some(key) = maps.registered_key_of(session) {
            maps.registered.remove(&key);
            removed = true;
        }
        removed
    }

    pub fn registered_count(&self) -> usize {
        self.inner.lock().registered.len()
    }

    pub fn unregistered_count(&self) -> usize {
        self.inner.lock().unregistered.len()
    }

    /// Panics if the two maps disagree with each other or with session state.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let maps = self.inner.lock();
        for (key, session) in &maps.registered {
            let state = session.state();
            assert!(state.is_registered(), "{} in registered map but unregistered", key);
            assert_eq!(key, &irc_to_lower(&state.nick), "stale key");
            assert!(
                !maps.unregistered.contains_key(&session.id()),
                "{} present in both maps",
                session.id()
            );
        }
        for session in maps.unregistered.values() {
            assert!(!session.state().is_registered());
        }
    }
}
