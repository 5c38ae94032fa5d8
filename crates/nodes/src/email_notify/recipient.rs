//! Recipient resolution.
//!
//! An `email` entry in shared state always wins. Otherwise the user's
//! identity is fetched and the configured attribute read. Every failure along
//! that path degrades to an empty recipient rather than failing the step.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn, Instrument, Span};

use crate::state::{EMAIL, REALM, ROOT_REALM, USERNAME};
use crate::{IdentityError, IdentityRepository, SharedState};

/// Why no recipient could be found.
#[derive(Debug, Error)]
pub enum RecipientError {
    #[error("no username in shared state")]
    MissingUsername,

    #[error("identity lookup failed: {0}")]
    Lookup(#[from] IdentityError),

    #[error("identity has no value for attribute '{attribute}'")]
    MissingAttribute { attribute: String },
}

pub struct RecipientResolver {
    identities: Arc<dyn IdentityRepository>,
    attribute: String,
    span: Span,
}

impl RecipientResolver {
    pub fn new(identities: Arc<dyn IdentityRepository>, attribute: impl Into<String>, span: Span) -> Self {
        Self {
            identities,
            attribute: attribute.into(),
            span,
        }
    }

    /// The recipient address, or `""` if none could be found.
    pub async fn resolve_recipient(&self, state: &SharedState) -> String {
        match self.try_resolve(state).instrument(self.span.clone()).await {
            Ok(address) => address,
            Err(err) => {
                warn!(parent: &self.span, error = %err, "no recipient found; continuing with an empty address");
                String::new()
            }
        }
    }

    pub async fn try_resolve(&self, state: &SharedState) -> Result<String, RecipientError> {
        if let Some(address) = state.text(EMAIL) {
            debug!(recipient = %address, "using email address from shared state");
            return Ok(address);
        }

        let username = state.get_str(USERNAME).ok_or(RecipientError::MissingUsername)?;
        let realm = state.get_str(REALM).unwrap_or(ROOT_REALM);

        debug!(attribute = %self.attribute, %username, %realm, "looking up email attribute");

        let identity = self.identities.identity(username, realm).await?;
        identity
            .attribute(&self.attribute)
            .await?
            .and_then(|values| values.into_iter().next())
            .filter(|address| !address.is_empty())
            .ok_or_else(|| RecipientError::MissingAttribute {
                attribute: self.attribute.clone(),
            })
    }
}
