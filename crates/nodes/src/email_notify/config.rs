//! Node configuration.
//!
//! Deserialised once from the JSON `config` attached to the node definition,
//! then never mutated.

use std::time::Duration;

use mailer::{ContentKind, Secret, SmtpRoute};
use serde::Deserialize;
use serde_json::Value;

use crate::NodeError;

/// What a failed send does to the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailurePolicy {
    /// Log and continue through the single `outcome`.
    #[default]
    Continue,
    /// Take the `failure` outcome and put the error under `errorMessage`.
    /// Successful sends take `success`. When the node suspends, a failed
    /// send still suspends and the `failure` outcome is taken on resume.
    FailureOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeConfig {
    /// Identity attribute holding the recipient address.
    pub attribute: String,
    /// Subject template; `{{var}}` is replaced from shared state.
    pub subject: String,
    /// Body template; `{{var}}` is replaced from shared state.
    pub message: String,
    /// Send the body as `text/html` instead of `text/plain`.
    pub html: bool,
    pub from: String,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_username: Option<String>,
    pub smtp_password: Secret,
    #[serde(alias = "smtpSSLEnabled")]
    pub smtp_ssl_enabled: bool,
    #[serde(alias = "smtpStartTLSEnabled")]
    pub smtp_starttls_enabled: bool,
    /// Halt the workflow after sending until the host resumes it.
    pub suspend_enabled: bool,
    pub failure_policy: FailurePolicy,
    /// Render templates before sending in the suspend path too. When off,
    /// the raw subject/message strings are sent.
    pub render_on_suspend: bool,
    /// Upper bound on a single SMTP send.
    pub send_timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            attribute: "mail".into(),
            subject: "Subject".into(),
            message: "Message".into(),
            html: false,
            from: "admin@example.com".into(),
            smtp_host: Some("localhost".into()),
            smtp_port: Some(25),
            smtp_username: None,
            smtp_password: Secret::default(),
            smtp_ssl_enabled: false,
            smtp_starttls_enabled: false,
            suspend_enabled: false,
            failure_policy: FailurePolicy::Continue,
            render_on_suspend: true,
            send_timeout_secs: 30,
        }
    }
}

impl NodeConfig {
    /// Parse and validate a node's JSON config. `null` gives the defaults.
    pub fn from_value(value: Value) -> Result<Self, NodeError> {
        let config: NodeConfig = if value.is_null() {
            NodeConfig::default()
        } else {
            serde_json::from_value(value).map_err(|e| NodeError::InvalidConfig(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), NodeError> {
        if self.attribute.trim().is_empty() {
            return Err(NodeError::InvalidConfig("attribute must not be empty".into()));
        }
        if self.from.trim().is_empty() {
            return Err(NodeError::InvalidConfig("from address must not be empty".into()));
        }
        if self.smtp_port == Some(0) {
            return Err(NodeError::InvalidConfig("smtp port must be non-zero".into()));
        }
        if self.send_timeout_secs == 0 {
            return Err(NodeError::InvalidConfig("send timeout must be non-zero".into()));
        }
        Ok(())
    }

    pub fn smtp_route(&self) -> SmtpRoute {
        SmtpRoute::from_parts(
            self.smtp_host.as_deref(),
            self.smtp_port,
            self.smtp_username.as_deref(),
            &self.smtp_password,
            self.smtp_ssl_enabled,
            self.smtp_starttls_enabled,
        )
    }

    pub fn content_kind(&self) -> ContentKind {
        ContentKind::from_html_flag(self.html)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }
}
