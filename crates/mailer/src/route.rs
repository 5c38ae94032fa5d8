//! Where a message is sent, and with which credentials.

use std::fmt;

use serde::Deserialize;

/// A string that must never show up in logs or error messages.
///
/// `Debug` and `Display` both print a placeholder. The value is only
/// reachable through [`Secret::expose`].
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// An explicitly configured SMTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpServer {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Secret,
    /// Implicit TLS from the first byte.
    pub ssl: bool,
    /// Upgrade a plain connection with STARTTLS.
    pub starttls: bool,
}

/// Routing for a single send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmtpRoute {
    /// No host/port configured: use the host's default relay.
    HostDefault,
    Server(SmtpServer),
}

impl SmtpRoute {
    /// `HostDefault` unless both host and port are set.
    pub fn from_parts(
        host: Option<&str>,
        port: Option<u16>,
        username: Option<&str>,
        password: &Secret,
        ssl: bool,
        starttls: bool,
    ) -> Self {
        match (host.filter(|h| !h.trim().is_empty()), port) {
            (Some(host), Some(port)) => SmtpRoute::Server(SmtpServer {
                host: host.trim().to_owned(),
                port,
                username: username.filter(|u| !u.is_empty()).map(str::to_owned),
                password: password.clone(),
                ssl,
                starttls,
            }),
            _ => SmtpRoute::HostDefault,
        }
    }
}
