//! User query handlers: USERHOST and ISON.
//!
//! Both are read-only batch lookups over the directory. Unknown names are
//! skipped, never reported as errors.

mod ison;
mod userhost;

pub use ison::IsonHandler;
pub use userhost::UserhostHandler;
