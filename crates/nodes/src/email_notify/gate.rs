//! Suspend/resume gate.
//!
//! ```text
//! Initial --Complete--> Done
//! Initial --Suspend---> Suspended ...(host waits)... --Resume--> Resumed --Complete--> Done
//! Initial --Resume----> Resumed                  (an invocation that is itself a resume)
//! ```
//!
//! Suspending is split into explicit phases so each one is observable:
//! [`SuspendGate::prepare`] mints the resume URI and records it in shared
//! state, the caller performs the send, and [`PreparedSuspend::emit`] turns
//! the send result into the directive.

use std::sync::Arc;

use mailer::MailError;
use tracing::{debug, Span};

use crate::state::RESUME_URI;
use crate::{Action, SuspendDirective, SuspensionHost, TreeContext};

/// Status shown while suspended after a successful send.
pub const EMAIL_SENT_STATUS: &str = "An email has been sent to your inbox.";
/// Status shown while suspended after a failed send.
pub const EMAIL_FAILED_STATUS: &str = "Unable to send email.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Initial,
    Suspended,
    Resumed,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEvent {
    Complete,
    Suspend,
    Resume,
}

impl GateState {
    /// The state after `event`, or `None` if the transition is not allowed.
    pub fn on(self, event: GateEvent) -> Option<GateState> {
        use GateEvent::*;
        use GateState::*;

        match (self, event) {
            (Initial, Complete) | (Resumed, Complete) => Some(Done),
            (Initial, Suspend) => Some(Suspended),
            (Initial, Resume) | (Suspended, Resume) => Some(Resumed),
            _ => None,
        }
    }
}

pub struct SuspendGate {
    host: Arc<dyn SuspensionHost>,
    span: Span,
}

impl SuspendGate {
    pub fn new(host: Arc<dyn SuspensionHost>, span: Span) -> Self {
        Self { host, span }
    }

    /// Mint a resume URI and store it under `resumeURI`.
    pub fn prepare(&self, ctx: &mut TreeContext) -> PreparedSuspend {
        let resume_uri = self.host.mint_resume_uri(ctx.execution_id);
        ctx.shared_state.insert(RESUME_URI, resume_uri.clone());
        debug!(parent: &self.span, "resume uri minted and stored in shared state");
        PreparedSuspend { resume_uri }
    }
}

/// A suspend whose resume URI is already in shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSuspend {
    resume_uri: String,
}

impl PreparedSuspend {
    pub fn resume_uri(&self) -> &str {
        &self.resume_uri
    }

    /// The directive for the host, given how the send went.
    pub fn emit(self, sent: &Result<(), MailError>) -> Action {
        let status_message = match sent {
            Ok(()) => EMAIL_SENT_STATUS,
            Err(_) => EMAIL_FAILED_STATUS,
        };

        Action::Suspend(SuspendDirective {
            status_message: status_message.to_owned(),
            resume_uri: self.resume_uri,
        })
    }
}
