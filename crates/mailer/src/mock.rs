//! `MockTransport`: a test double for `MailTransport`.
//!
//! Records every message it is asked to post and answers with a
//! programmer-specified result. No network access.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::{MailTransport, OutgoingMail, SmtpRoute, TransportError};

/// Behaviour injected into `MockTransport` at construction time.
pub enum MockBehaviour {
    /// Accept every message.
    Accept,
    /// Refuse every message with the given reason.
    Refuse(String),
    /// Never complete; used to exercise send timeouts.
    Hang,
}

/// A transport that records every post it receives.
pub struct MockTransport {
    pub behaviour: MockBehaviour,
    /// All posts seen by this transport (in call order).
    pub calls: Arc<Mutex<Vec<(OutgoingMail, SmtpRoute)>>>,
}

impl MockTransport {
    pub fn accepting() -> Self {
        Self::with(MockBehaviour::Accept)
    }

    pub fn refusing(reason: impl Into<String>) -> Self {
        Self::with(MockBehaviour::Refuse(reason.into()))
    }

    pub fn hanging() -> Self {
        Self::with(MockBehaviour::Hang)
    }

    fn with(behaviour: MockBehaviour) -> Self {
        Self {
            behaviour,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of times `post_mail` has been called.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The most recent message posted, if any.
    pub fn last_mail(&self) -> Option<OutgoingMail> {
        self.calls.lock().unwrap().last().map(|(mail, _)| mail.clone())
    }

    /// The most recent route used, if any.
    pub fn last_route(&self) -> Option<SmtpRoute> {
        self.calls.lock().unwrap().last().map(|(_, route)| route.clone())
    }
}

#[async_trait]
impl MailTransport for MockTransport {
    async fn post_mail(
        &self,
        mail: &OutgoingMail,
        route: &SmtpRoute,
    ) -> Result<(), TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((mail.clone(), route.clone()));

        match &self.behaviour {
            MockBehaviour::Accept => Ok(()),
            MockBehaviour::Refuse(reason) => Err(TransportError::Refused(reason.clone())),
            MockBehaviour::Hang => std::future::pending().await,
        }
    }
}
