//! `mailer` crate: the SMTP transport seam and its `lettre` implementation.
//!
//! Nodes never talk to `lettre` directly. They hand an [`OutgoingMail`] and an
//! [`SmtpRoute`] to a [`MailTransport`], which lets tests swap in
//! [`mock::MockTransport`].

pub mod error;
pub mod message;
pub mod route;
pub mod transport;
pub mod smtp;
pub mod mock;

pub use error::{MailError, TransportError};
pub use message::{ContentKind, OutgoingMail, UTF_8};
pub use route::{Secret, SmtpRoute, SmtpServer};
pub use transport::MailTransport;
pub use smtp::LettreTransport;
