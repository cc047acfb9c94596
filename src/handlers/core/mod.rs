//! Core handler infrastructure.
//!
//! The [`Handler`] trait, the [`Context`] handed to it, the [`Registry`]
//! that dispatches parsed commands and the [`Deferred`] slot that keeps
//! background output ahead of later replies.

pub mod context;
pub mod registry;

#[cfg(test)]
pub(crate) mod harness;

pub use context::{Context, Deferred, Handler, HandlerResult, Reply};
pub use registry::Registry;
