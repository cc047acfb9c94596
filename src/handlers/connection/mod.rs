//! Connection and registration handlers.
//!
//! Handles NICK, USER, CAP, PING and QUIT, plus the welcome burst that
//! follows a successful registration.

mod caps;
mod nick;
mod ping;
mod quit;
mod user;
mod welcome;

pub use caps::CapHandler;
pub use nick::NickHandler;
pub use ping::PingHandler;
pub use quit::QuitHandler;
pub use user::UserHandler;
