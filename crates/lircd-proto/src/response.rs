//! Numeric replies sent by the server.
//!
//! Only the numerics the daemon actually emits are catalogued. Each renders
//! as a zero-padded three digit code.

#![allow(non_camel_case_types)]

use std::fmt;

/// Server numeric reply code.
///
/// - 001-099: connection registration
/// - 200-399: command replies
/// - 400-599: error replies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    /// 001 - Welcome to the network
    RPL_WELCOME = 1,
    /// 002 - Your host is running version
    RPL_YOURHOST = 2,
    /// 003 - Server creation date
    RPL_CREATED = 3,
    /// 004 - Server name, version and supported modes
    RPL_MYINFO = 4,
    /// 005 - Supported features
    RPL_ISUPPORT = 5,

    /// 221 - Current user modes
    RPL_UMODEIS = 221,
    /// 302 - USERHOST reply
    RPL_USERHOST = 302,
    /// 303 - ISON reply
    RPL_ISON = 303,
    /// 372 - MOTD body line
    RPL_MOTD = 372,
    /// 375 - MOTD start
    RPL_MOTDSTART = 375,
    /// 376 - MOTD end
    RPL_ENDOFMOTD = 376,

    /// 421 - Unknown command
    ERR_UNKNOWNCOMMAND = 421,
    /// 422 - No MOTD configured
    ERR_NOMOTD = 422,
    /// 432 - Erroneous nickname
    ERR_ERRONEUSNICKNAME = 432,
    /// 433 - Nickname in use
    ERR_NICKNAMEINUSE = 433,
    /// 451 - Not registered
    ERR_NOTREGISTERED = 451,
    /// 461 - Not enough parameters
    ERR_NEEDMOREPARAMS = 461,
    /// 462 - Already registered
    ERR_ALREADYREGISTERED = 462,
    /// 501 - Unknown user mode flag
    ERR_UMODEUNKNOWNFLAG = 501,
    /// 502 - Cannot change mode for other users
    ERR_USERSDONTMATCH = 502,
}

impl Response {
    /// Every catalogued numeric, in ascending order.
    pub const ALL: [Response; 20] = [
        Response::RPL_WELCOME,
        Response::RPL_YOURHOST,
        Response::RPL_CREATED,
        Response::RPL_MYINFO,
        Response::RPL_ISUPPORT,
        Response::RPL_UMODEIS,
        Response::RPL_USERHOST,
        Response::RPL_ISON,
        Response::RPL_MOTD,
        Response::RPL_MOTDSTART,
        Response::RPL_ENDOFMOTD,
        Response::ERR_UNKNOWNCOMMAND,
        Response::ERR_NOMOTD,
        Response::ERR_ERRONEUSNICKNAME,
        Response::ERR_NICKNAMEINUSE,
        Response::ERR_NOTREGISTERED,
        Response::ERR_NEEDMOREPARAMS,
        Response::ERR_ALREADYREGISTERED,
        Response::ERR_UMODEUNKNOWNFLAG,
        Response::ERR_USERSDONTMATCH,
    ];

    /// Returns the numeric code as u16
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Look a numeric up by code.
    pub fn from_code(code: u16) -> Option<Response> {
        Self::ALL.into_iter().find(|r| r.code() == code)
    }

    /// Check if this is an error response (4xx, 5xx)
    #[inline]
    pub fn is_error(&self) -> bool {
        (400..600).contains(&self.code())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_zero_padded() {
        assert_eq!(Response::RPL_WELCOME.to_string(), "001");
        assert_eq!(Response::RPL_ISUPPORT.to_string(), "005");
        assert_eq!(Response::ERR_USERSDONTMATCH.to_string(), "502");
    }

    #[test]
    fn code_lookup_matches_catalogue() {
        for response in Response::ALL {
            assert_eq!(Response::from_code(response.code()), Some(response));
        }
        assert_eq!(Response::from_code(0), None);
        assert_eq!(Response::from_code(999), None);
    }

    #[test]
    fn classifies_errors() {
        assert!(Response::ERR_NEEDMOREPARAMS.is_error());
        assert!(!Response::RPL_ISON.is_error());
    }
}
