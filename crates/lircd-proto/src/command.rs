//! Inbound command lines.
//!
//! A line is `[:source] NAME field field ... [:free text tail]`. Fields are
//! separated by one or more spaces; the first field that starts with `:`
//! swallows the remainder of the line (spaces included) as the final
//! argument.

use std::fmt;
use std::str::FromStr;

use crate::error::MessageParseError;

/// A parsed client command. Ephemeral: built per line, dropped after dispatch.
///
/// The name is not checked against any table here; an unrecognised name is
/// the dispatcher's business.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    /// Command name, uppercased.
    pub name: String,
    /// Arguments in order; a free-text tail arrives as the last entry.
    pub args: Vec<String>,
}

impl Command {
    /// Build a command from already split parts. The name is uppercased.
    pub fn new<N: AsRef<str>>(name: N, args: Vec<String>) -> Self {
        Self {
            name: name.as_ref().to_ascii_uppercase(),
            args,
        }
    }

    /// Argument `n`, if present.
    #[inline]
    pub fn arg(&self, n: usize) -> Option<&str> {
        self.args.get(n).map(String::as_str)
    }
}

impl FromStr for Command {
    type Err = MessageParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts = split_line(line)?;
        Ok(Self {
            name: parts.command.to_ascii_uppercase(),
            args: parts.params.into_iter().map(str::to_owned).collect(),
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        crate::message::write_params(f, &self.args)
    }
}

/// Borrowed pieces of one protocol line.
pub(crate) struct LineParts<'a> {
    pub source: Option<&'a str>,
    pub command: &'a str,
    pub params: Vec<&'a str>,
}

/// Tokenize a line shared by [`Command`] and [`crate::Message`] parsing.
pub(crate) fn split_line(line: &str) -> Result<LineParts<'_>, MessageParseError> {
    let mut rest = line.trim_end_matches(&['\r', '\n'][..]).trim_start_matches(' ');

    let source = match rest.strip_prefix(':') {
        Some(stripped) => {
            let (source, tail) = stripped.split_once(' ').unwrap_or((stripped, ""));
            rest = tail.trim_start_matches(' ');
            Some(source)
        }
        None => None,
    };

    if rest.is_empty() {
        return Err(MessageParseError::EmptyMessage);
    }

    let (command, mut rest) = rest.split_once(' ').unwrap_or((rest, ""));

    let mut params = Vec::new();
    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }
        if let Some(tail) = rest.strip_prefix(':') {
            params.push(tail);
            break;
        }
        match rest.split_once(' ') {
            Some((field, tail)) => {
                params.push(field);
                rest = tail;
            }
            None => {
                params.push(rest);
                break;
            }
        }
    }

    Ok(LineParts {
        source,
        command,
        params,
    })
}
