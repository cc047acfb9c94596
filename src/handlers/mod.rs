//! IRC command handlers.
//!
//! This module contains the Handler trait and command registry for
//! dispatching parsed client commands to their handlers.
//!
//! Handlers never touch the socket. They mutate session and directory
//! state, then either return a [`Reply`] for the dispatcher to format or
//! queue lines on the session themselves.

mod connection;
pub mod core;
mod helpers;
mod mode;
mod user_query;

pub use self::core::{Context, Deferred, Handler, HandlerResult, Registry, Reply};
pub use connection::{CapHandler, NickHandler, PingHandler, QuitHandler, UserHandler};
pub use helpers::{MAX_BATCH_TARGETS, batch_targets, mode_notice};
pub use mode::ModeHandler;
pub use user_query::{IsonHandler, UserhostHandler};
