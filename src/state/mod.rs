//! State management module.
//!
//! Contains the Matrix (shared server state), the session directory and
//! per-session state.

mod directory;
mod matrix;
mod modes;
pub mod session;
mod uid;

pub use directory::{Directory, DirectoryError, Lookup, Renamed};
pub use matrix::{Matrix, MatrixConfig, ServerInfo, VERSION};
pub use modes::{ModeDiff, USABLE_USER_MODES, UserModes};
pub use session::{Registration, Session, SessionState};
pub use uid::{SessionId, SessionIdGenerator};
