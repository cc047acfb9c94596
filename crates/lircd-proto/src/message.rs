//! Outbound protocol lines.
//!
//! Every line the server emits has the shape
//! `:<prefix> <command> <param> ... :<final param>`. The final parameter is
//! always written with a leading colon so free text survives intact.

use std::fmt;
use std::str::FromStr;

use crate::command::split_line;
use crate::error::MessageParseError;
use crate::response::Response;

/// A single line queued for a client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Source of the line: the server name or a user's display host.
    pub prefix: Option<String>,
    /// Command word or zero-padded numeric.
    pub command: String,
    /// Parameters; the last one is rendered as free text.
    pub params: Vec<String>,
}

impl Message {
    /// Create a message without a prefix.
    pub fn new<C: Into<String>>(command: C, params: Vec<String>) -> Self {
        Self {
            prefix: None,
            command: command.into(),
            params,
        }
    }

    /// Attach a prefix.
    #[must_use]
    pub fn with_prefix<P: Into<String>>(mut self, prefix: P) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Numeric reply from the server. `params[0]` is conventionally the target.
    pub fn response(server: &str, response: Response, params: Vec<String>) -> Self {
        Self::new(response.to_string(), params).with_prefix(server)
    }

    /// Heartbeat echo: `:<server> PONG <server> :<token>`.
    pub fn pong(server: &str, token: &str) -> Self {
        Self::new("PONG", vec![server.to_string(), token.to_string()]).with_prefix(server)
    }

    /// Server notice to `target`.
    pub fn notice<T: Into<String>>(server: &str, target: &str, text: T) -> Self {
        Self::new("NOTICE", vec![target.to_string(), text.into()]).with_prefix(server)
    }

    /// `ERROR :<text>`, sent just before the server closes a link.
    pub fn error<T: Into<String>>(text: T) -> Self {
        Self::new("ERROR", vec![text.into()])
    }

    /// The numeric carried by this line, if its command is one.
    pub fn response_code(&self) -> Option<Response> {
        self.command.parse::<u16>().ok().and_then(Response::from_code)
    }

    /// Parameter `n`, if present.
    pub fn param(&self, n: usize) -> Option<&str> {
        self.params.get(n).map(String::as_str)
    }
}

/// Characters that would end or split a line on the wire.
const LINE_BREAKS: [char; 3] = ['\r', '\n', '\0'];

/// The part of `param` that can be sent as a middle parameter.
///
/// A middle parameter is one non-empty word that does not start with `:`.
/// Leading colons are dropped, everything after the first space or line
/// break is cut, and `*` stands in for an empty result.
///
/// ```rust
/// use lircd_proto::message::middle_token;
///
/// assert_eq!(middle_token("bad nick"), "bad");
/// assert_eq!(middle_token("::evil"), "evil");
/// assert_eq!(middle_token(""), "*");
/// ```
pub fn middle_token(param: &str) -> &str {
    param
        .split(|c: char| c == ' ' || LINE_BREAKS.contains(&c))
        .map(|word| word.trim_start_matches(':'))
        .find(|word| !word.is_empty())
        .unwrap_or("*")
}

/// Write ` p1 p2 :last` (nothing when `params` is empty).
///
/// Middle parameters go through [`middle_token`]; line breaks in the final
/// parameter become spaces.
pub(crate) fn write_params<S: AsRef<str>>(f: &mut fmt::Formatter<'_>, params: &[S]) -> fmt::Result {
    let Some((last, middle)) = params.split_last() else {
        return Ok(());
    };
    for param in middle {
        write!(f, " {}", middle_token(param.as_ref()))?;
    }
    let last = last.as_ref();
    if last.contains(LINE_BREAKS) {
        write!(f, " :{}", last.replace(LINE_BREAKS, " "))
    } else {
        write!(f, " :{last}")
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, ":{prefix} ")?;
        }
        f.write_str(&self.command)?;
        write_params(f, &self.params)
    }
}

impl FromStr for Message {
    type Err = MessageParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts = split_line(line)?;
        if !parts.command.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(MessageParseError::InvalidCommand);
        }
        Ok(Self {
            prefix: parts.source.map(str::to_owned),
            command: parts.command.to_ascii_uppercase(),
            params: parts.params.into_iter().map(str::to_owned).collect(),
        })
    }
}
