//! SMTP transport implementation using lettre.

use async_trait::async_trait;
use lettre::{
    address::AddressError,
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use crate::{ContentKind, MailTransport, OutgoingMail, SmtpRoute, TransportError};

/// Posts mail through `lettre`'s async SMTP client.
///
/// Stateless: a client is built per send from the route, so one instance can
/// serve nodes configured against different servers.
#[derive(Debug, Clone, Default)]
pub struct LettreTransport;

impl LettreTransport {
    /// Assemble the lettre message for `mail`.
    pub fn build_message(mail: &OutgoingMail) -> Result<Message, TransportError> {
        let mut builder = Message::builder()
            .from(parse_mailbox(&mail.from)?)
            .subject(mail.subject.as_str());

        for to in &mail.to {
            builder = builder.to(parse_mailbox(to)?);
        }

        // lettre's TEXT_* constants already carry charset=utf-8.
        let content_type = match mail.content {
            ContentKind::Plain => ContentType::TEXT_PLAIN,
            ContentKind::Html => ContentType::TEXT_HTML,
        };

        Ok(builder.header(content_type).body(mail.body.clone())?)
    }

    /// Build an SMTP client for `route`.
    pub fn build_client(
        route: &SmtpRoute,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, TransportError> {
        let server = match route {
            SmtpRoute::HostDefault => {
                return Ok(AsyncSmtpTransport::<Tokio1Executor>::unencrypted_localhost())
            }
            SmtpRoute::Server(server) => server,
        };

        let mut builder = if server.ssl {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&server.host)?
        } else if server.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&server.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&server.host)
        };

        builder = builder.port(server.port);

        if let Some(username) = &server.username {
            let credentials = Credentials::new(username.clone(), server.password.expose().to_owned());
            builder = builder.credentials(credentials);
        }

        Ok(builder.build())
    }
}

#[async_trait]
impl MailTransport for LettreTransport {
    async fn post_mail(
        &self,
        mail: &OutgoingMail,
        route: &SmtpRoute,
    ) -> Result<(), TransportError> {
        let message = Self::build_message(mail)?;
        let client = Self::build_client(route)?;

        let response = client.send(message).await?;
        debug!(code = %response.code(), "smtp server accepted message");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, TransportError> {
    address
        .parse()
        .map_err(|e: AddressError| TransportError::InvalidAddress {
            address: address.to_owned(),
            reason: e.to_string(),
        })
}
