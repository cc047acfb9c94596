//! Welcome burst sent after registration.
//!
//! Runs as the connection's deferred task: lookup notices, an optional
//! lookup pause, 001-005, the MOTD block and finally the default user
//! modes. The dispatcher waits for it before handling the next command.

use crate::error::HandlerError;
use crate::handlers::mode::apply_user_modes;
use crate::state::{Matrix, Session, USABLE_USER_MODES};
use lircd_proto::{Message, NICK_MAX_LEN, Response};
use std::sync::Arc;

pub(super) async fn send(session: Arc<Session>, matrix: Arc<Matrix>) -> Result<(), HandlerError> {
    let info = &matrix.server_info;
    let server = info.name.as_str();
    let nick = session.nick();

    let notice = |text: &str| Message::notice(server, &nick, text);
    let reply = |response: Response, params: Vec<String>| {
        let mut full = Vec::with_capacity(params.len() + 1);
        full.push(nick.clone());
        full.extend(params);
        Message::response(server, response, full)
    };

    session.send(notice("*** Looking up your hostname...")).await?;
    session.send(notice("*** Checking Ident")).await?;
    session.send(notice("*** Found your hostname")).await?;
    if !matrix.config.lookup_delay.is_zero() {
        tokio::time::sleep(matrix.config.lookup_delay).await;
    }
    session.send(notice("*** No Ident response")).await?;

    let burst = [
        reply(
            Response::RPL_WELCOME,
            vec![format!(
                "Welcome to the {} Internet Relay Chat Network {}",
                info.network, nick
            )],
        ),
        reply(
            Response::RPL_YOURHOST,
            vec![format!("Your host is {}, running version {}", server, info.version)],
        ),
        reply(
            Response::RPL_CREATED,
            vec![format!(
                "This server was created {}",
                info.created.format("%a %b %e %Y at %H:%M:%S UTC")
            )],
        ),
        reply(
            Response::RPL_MYINFO,
            vec![server.to_string(), info.version.to_string(), USABLE_USER_MODES.to_string()],
        ),
        reply(
            Response::RPL_ISUPPORT,
            vec![
                format!("NETWORK={}", info.network),
                "CASEMAPPING=rfc1459".to_string(),
                format!("NICKLEN={NICK_MAX_LEN}"),
                "are supported by this server".to_string(),
            ],
        ),
    ];
    for msg in burst {
        session.send(msg).await?;
    }

    let motd = &matrix.config.motd;
    if motd.is_empty() {
        session
            .send(reply(Response::ERR_NOMOTD, vec!["MOTD File is missing".into()]))
            .await?;
    } else {
        session
            .send(reply(
                Response::RPL_MOTDSTART,
                vec![format!("- {} Message of the day - ", server)],
            ))
            .await?;
        for line in motd {
            session
                .send(reply(Response::RPL_MOTD, vec![format!("- {line}")]))
                .await?;
        }
        session
            .send(reply(Response::RPL_ENDOFMOTD, vec!["End of /MOTD command.".into()]))
            .await?;
    }

    if let Some(confirmation) = apply_user_modes(&session, &matrix.config.default_user_modes).notice {
        session.send(confirmation).await?;
    }
    Ok(())
}
