//! Mail dispatch.
//!
//! Wraps a [`MailTransport`] with the node's route, content type and send
//! timeout. The route (and its password) is never logged.

use std::sync::Arc;
use std::time::Duration;

use mailer::{ContentKind, MailError, MailTransport, OutgoingMail, SmtpRoute, TransportError};
use tracing::{error, info, Span};

use super::NodeConfig;

pub struct MailDispatcher {
    transport: Arc<dyn MailTransport>,
    route: SmtpRoute,
    content: ContentKind,
    timeout: Duration,
    span: Span,
}

impl MailDispatcher {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        route: SmtpRoute,
        content: ContentKind,
        timeout: Duration,
        span: Span,
    ) -> Self {
        Self {
            transport,
            route,
            content,
            timeout,
            span,
        }
    }

    pub fn from_config(transport: Arc<dyn MailTransport>, config: &NodeConfig, span: Span) -> Self {
        Self::new(
            transport,
            config.smtp_route(),
            config.content_kind(),
            config.send_timeout(),
            span,
        )
    }

    /// Send one message to `to`. No retry.
    pub async fn send_mail(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), MailError> {
        let mail = OutgoingMail::single(from, to, subject, body, self.content);
        let host_default = matches!(self.route, SmtpRoute::HostDefault);

        info!(
            parent: &self.span,
            recipient = %to,
            content_type = self.content.mime_type(),
            host_default,
            "sending email"
        );

        let sent = match tokio::time::timeout(self.timeout, self.transport.post_mail(&mail, &self.route)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.timeout)),
        };

        match sent {
            Ok(()) => {
                info!(parent: &self.span, recipient = %to, "sent email");
                Ok(())
            }
            Err(cause) => {
                error!(parent: &self.span, recipient = %to, error = %cause, "email send failed");
                Err(MailError::new(to, cause))
            }
        }
    }
}
