//! `EmailNotifyNode`: sends a templated email to the current user.

use std::sync::Arc;

use async_trait::async_trait;
use mailer::{MailError, MailTransport};
use serde_json::Value;
use tracing::{info, info_span, warn, Instrument, Span};

use super::gate::{GateEvent, GateState, SuspendGate};
use super::{render_template, FailurePolicy, MailDispatcher, NodeConfig, RecipientResolver};
use crate::state::ERROR_MESSAGE;
use crate::{
    Action, AuthNode, IdentityRepository, NodeError, Outcome, SharedState, SuspensionHost,
    TreeContext,
};

/// Registered node type name.
pub const NODE_TYPE: &str = "EmailNotifyNode";

/// Set by this node when a send fails before it suspends under
/// [`FailurePolicy::FailureOutcome`]. Read and cleared on resume.
pub const SEND_FAILED_KEY: &str = "emailNotifySendFailed";

pub struct EmailNotifyNode {
    config: NodeConfig,
    resolver: RecipientResolver,
    dispatcher: MailDispatcher,
    gate: SuspendGate,
    span: Span,
}

impl EmailNotifyNode {
    /// Build a node from validated configuration and the host's collaborators.
    pub fn new(
        config: NodeConfig,
        identities: Arc<dyn IdentityRepository>,
        transport: Arc<dyn MailTransport>,
        suspension: Arc<dyn SuspensionHost>,
    ) -> Result<Self, NodeError> {
        config.validate()?;

        // Fields are chosen explicitly; the config itself is never recorded.
        let span = info_span!(
            "email_notify",
            attribute = %config.attribute,
            suspend = config.suspend_enabled,
            policy = ?config.failure_policy
        );

        Ok(Self {
            resolver: RecipientResolver::new(identities, config.attribute.clone(), span.clone()),
            dispatcher: MailDispatcher::from_config(transport, &config, span.clone()),
            gate: SuspendGate::new(suspension, span.clone()),
            config,
            span,
        })
    }

    /// Build a node from the JSON `config` of a node definition.
    pub fn from_value(
        config: Value,
        identities: Arc<dyn IdentityRepository>,
        transport: Arc<dyn MailTransport>,
        suspension: Arc<dyn SuspensionHost>,
    ) -> Result<Self, NodeError> {
        Self::new(NodeConfig::from_value(config)?, identities, transport, suspension)
    }

    fn advance(&self, from: GateState, event: GateEvent) -> Result<GateState, NodeError> {
        from.on(event)
            .ok_or(NodeError::IllegalTransition { from, event })
    }

    fn entry_event(&self, ctx: &TreeContext) -> GateEvent {
        if ctx.resumed {
            GateEvent::Resume
        } else if self.config.suspend_enabled {
            GateEvent::Suspend
        } else {
            GateEvent::Complete
        }
    }

    fn completed(&self) -> Action {
        match self.config.failure_policy {
            FailurePolicy::Continue => Action::Goto(Outcome::Next),
            FailurePolicy::FailureOutcome => Action::Goto(Outcome::Success),
        }
    }

    fn send_failed(&self, state: &mut SharedState, err: &MailError) -> Action {
        match self.config.failure_policy {
            FailurePolicy::Continue => {
                warn!(parent: &self.span, error = %err, "continuing despite failed send");
                Action::Goto(Outcome::Next)
            }
            FailurePolicy::FailureOutcome => {
                state.insert(ERROR_MESSAGE, err.to_string());
                Action::Goto(Outcome::Failure)
            }
        }
    }

    fn rendered(&self, state: &SharedState) -> (String, String) {
        (
            render_template(state, &self.config.subject),
            render_template(state, &self.config.message),
        )
    }

    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), MailError> {
        self.dispatcher
            .send_mail(&self.config.from, recipient, subject, body)
            .await
    }
}

#[async_trait]
impl AuthNode for EmailNotifyNode {
    fn outcomes(&self) -> Vec<Outcome> {
        match self.config.failure_policy {
            FailurePolicy::Continue => vec![Outcome::Next],
            FailurePolicy::FailureOutcome => vec![Outcome::Success, Outcome::Failure],
        }
    }

    async fn process(&self, ctx: &mut TreeContext) -> Result<Action, NodeError> {
        let span = info_span!(
            parent: &self.span,
            "process",
            execution_id = %ctx.execution_id,
            resumed = ctx.resumed
        );
        self.run(ctx).instrument(span).await
    }
}

impl EmailNotifyNode {
    async fn run(&self, ctx: &mut TreeContext) -> Result<Action, NodeError> {
        // A resume is decided first, so it never resolves or sends again.
        match self.advance(GateState::Initial, self.entry_event(ctx))? {
            GateState::Resumed => self.finish_resumed(ctx),
            GateState::Suspended => self.send_and_suspend(ctx).await,
            GateState::Done => self.send_and_complete(ctx).await,
            GateState::Initial => Err(NodeError::IllegalTransition {
                from: GateState::Initial,
                event: self.entry_event(ctx),
            }),
        }
    }

    fn finish_resumed(&self, ctx: &mut TreeContext) -> Result<Action, NodeError> {
        let gate = self.advance(GateState::Resumed, GateEvent::Complete)?;
        let send_failed = ctx.shared_state.remove(SEND_FAILED_KEY).is_some();
        info!(
            ?gate,
            send_failed,
            with_payload = ctx.resume_payload.is_some(),
            "resumed from suspend; completing without sending"
        );

        if send_failed && self.config.failure_policy == FailurePolicy::FailureOutcome {
            return Ok(Action::Goto(Outcome::Failure));
        }
        Ok(self.completed())
    }

    async fn send_and_complete(&self, ctx: &mut TreeContext) -> Result<Action, NodeError> {
        let recipient = self.resolver.resolve_recipient(&ctx.shared_state).await;
        let (subject, body) = self.rendered(&ctx.shared_state);
        let sent = self.send(&recipient, &subject, &body).await;
        info!(sent = sent.is_ok(), "email step finished");

        Ok(match sent {
            Ok(()) => self.completed(),
            Err(err) => self.send_failed(&mut ctx.shared_state, &err),
        })
    }

    async fn send_and_suspend(&self, ctx: &mut TreeContext) -> Result<Action, NodeError> {
        let recipient = self.resolver.resolve_recipient(&ctx.shared_state).await;

        // The URI must be in shared state before rendering so templates can use it.
        let prepared = self.gate.prepare(ctx);

        let (subject, body) = if self.config.render_on_suspend {
            self.rendered(&ctx.shared_state)
        } else {
            (self.config.subject.clone(), self.config.message.clone())
        };
        let sent = self.send(&recipient, &subject, &body).await;

        if let Err(err) = &sent {
            if self.config.failure_policy == FailurePolicy::FailureOutcome {
                ctx.shared_state.insert(ERROR_MESSAGE, err.to_string());
                ctx.shared_state.insert(SEND_FAILED_KEY, true);
            }
        }

        info!(sent = sent.is_ok(), "suspending workflow");
        Ok(prepared.emit(&sent))
    }
}
