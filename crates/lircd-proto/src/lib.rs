//! # lircd-proto
//!
//! Wire-level building blocks for the lircd daemon.
//!
//! - [`line::LineCodec`] / [`irc::IrcCodec`]: bounded newline framing for
//!   `tokio_util::codec`, decoding into [`Command`] and encoding [`Message`].
//! - [`command`]: `COMMAND arg1 arg2 :free text tail` parsing.
//! - [`message`]: outbound lines (`:prefix COMMAND params :final`).
//! - [`response`]: the numeric reply catalogue.
//! - [`casemap`], [`nick`], [`mode`]: identifier folding, identifier grammar
//!   and user mode change strings.
//!
//! ```rust
//! use lircd_proto::{Command, Message, Response};
//!
//! let cmd: Command = "user alice 0 * :Alice Liddell".parse().unwrap();
//! assert_eq!(cmd.name, "USER");
//! assert_eq!(cmd.args.last().map(String::as_str), Some("Alice Liddell"));
//!
//! let reply = Message::response("irc.example", Response::RPL_WELCOME, vec!["alice".into(), "Hi".into()]);
//! assert_eq!(reply.to_string(), ":irc.example 001 alice :Hi");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod casemap;
pub mod command;
pub mod error;
pub mod irc;
pub mod line;
pub mod message;
pub mod mode;
pub mod nick;
pub mod response;

pub use self::casemap::{irc_eq, irc_lower_char, irc_to_lower};
pub use self::command::Command;
pub use self::error::{MessageParseError, ProtocolError};
pub use self::irc::IrcCodec;
pub use self::line::LineCodec;
pub use self::message::{middle_token, Message};
pub use self::mode::{parse_user_modes, ModeChange};
pub use self::nick::{NickExt, NICK_MAX_LEN, PLACEHOLDER_NICK};
pub use self::response::Response;
