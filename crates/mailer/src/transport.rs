//! The `MailTransport` trait, the contract every mail backend must fulfil.

use async_trait::async_trait;

use crate::{OutgoingMail, SmtpRoute, TransportError};

/// Posts one message over the given route.
///
/// Implementations must not retry and must not log the route's password.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn post_mail(&self, mail: &OutgoingMail, route: &SmtpRoute)
        -> Result<(), TransportError>;
}
