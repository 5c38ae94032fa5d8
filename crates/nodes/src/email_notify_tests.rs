//! End-to-end tests for `EmailNotifyNode`.
//!
//! Every collaborator is a mock, so no SMTP server or identity store is
//! required. Each test drives `AuthNode::process` the way a host would.

use std::sync::Arc;

use mailer::mock::MockTransport;
use mailer::{ContentKind, SmtpRoute};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::email_notify::gate::{EMAIL_FAILED_STATUS, EMAIL_SENT_STATUS};
use crate::email_notify::SEND_FAILED_KEY;
use crate::mock::{FixedResumeMinter, MockIdentityRepository};
use crate::state::{ERROR_MESSAGE, RESUME_URI};
use crate::{Action, AuthNode, EmailNotifyNode, NodeError, Outcome, SharedState, TreeContext};

const RESUME_BASE: &str = "https://am.example.com/json/resume";

struct Harness {
    node: EmailNotifyNode,
    transport: Arc<MockTransport>,
    identities: Arc<MockIdentityRepository>,
    minter: Arc<FixedResumeMinter>,
}

fn harness(config: Value, transport: MockTransport) -> Harness {
    let transport = Arc::new(transport);
    let identities = Arc::new(
        MockIdentityRepository::new().with_user("bo", "/", "mail", &["bo@identity.com"]),
    );
    let minter = Arc::new(FixedResumeMinter::new(RESUME_BASE));
    let node = EmailNotifyNode::from_value(
        config,
        identities.clone(),
        transport.clone(),
        minter.clone(),
    )
    .expect("valid config");

    Harness { node, transport, identities, minter }
}

fn login_state() -> SharedState {
    SharedState::from_json(json!({
        "username": "bo",
        "realm": "/",
        "otp": "123456"
    }))
}

// ============================================================
// Non-suspending path
// ============================================================

#[tokio::test]
async fn sends_rendered_mail_and_continues() {
    let h = harness(
        json!({
            "subject": "Code for {{username}}",
            "message": "Your code is {{otp}}.",
            "html": true
        }),
        MockTransport::accepting(),
    );
    let mut ctx = TreeContext::new(Uuid::new_v4(), login_state());

    let action = h.node.process(&mut ctx).await.expect("process never errors");

    assert_eq!(action, Action::Goto(Outcome::Next));
    let mail = h.transport.last_mail().expect("one mail sent");
    assert_eq!(mail.to, vec!["bo@identity.com"]);
    assert_eq!(mail.from, "admin@example.com");
    assert_eq!(mail.subject, "Code for bo");
    assert_eq!(mail.body, "Your code is 123456.");
    assert_eq!(mail.content, ContentKind::Html);
    assert!(!ctx.shared_state.contains_key(RESUME_URI));
}

#[tokio::test]
async fn state_email_overrides_identity_and_still_sends() {
    let h = harness(Value::Null, MockTransport::accepting());
    let mut state = login_state();
    state.insert("email", "a@x.com");
    let mut ctx = TreeContext::new(Uuid::new_v4(), state);

    h.node.process(&mut ctx).await.unwrap();

    assert_eq!(h.transport.last_mail().unwrap().to, vec!["a@x.com"]);
    assert_eq!(h.identities.lookup_count(), 0);
}

#[tokio::test]
async fn configured_server_is_used_as_route() {
    let h = harness(
        json!({ "smtpHost": "smtp.example.com", "smtpPort": 587, "smtpStarttlsEnabled": true }),
        MockTransport::accepting(),
    );
    let mut ctx = TreeContext::new(Uuid::new_v4(), login_state());
    h.node.process(&mut ctx).await.unwrap();

    match h.transport.last_route().unwrap() {
        SmtpRoute::Server(server) => {
            assert_eq!(server.host, "smtp.example.com");
            assert_eq!(server.port, 587);
            assert!(server.starttls);
        }
        SmtpRoute::HostDefault => panic!("expected configured server"),
    }
}

#[tokio::test]
async fn failed_send_still_continues_under_continue_policy() {
    let h = harness(Value::Null, MockTransport::refusing("connection refused"));
    let mut ctx = TreeContext::new(Uuid::new_v4(), login_state());

    let action = h.node.process(&mut ctx).await.expect("send failure is not a node error");

    assert_eq!(action, Action::Goto(Outcome::Next));
    assert!(!ctx.shared_state.contains_key(ERROR_MESSAGE));
    assert_eq!(h.transport.call_count(), 1);
}

#[tokio::test]
async fn failed_send_takes_failure_outcome_under_failure_policy() {
    let h = harness(
        json!({ "failurePolicy": "failureOutcome" }),
        MockTransport::refusing("535 authentication failed"),
    );
    let mut ctx = TreeContext::new(Uuid::new_v4(), login_state());

    let action = h.node.process(&mut ctx).await.unwrap();

    assert_eq!(action, Action::Goto(Outcome::Failure));
    let message = ctx.shared_state.get_str(ERROR_MESSAGE).expect("error message stored");
    assert!(message.contains("bo@identity.com"));
}

#[tokio::test]
async fn successful_send_takes_success_outcome_under_failure_policy() {
    let h = harness(json!({ "failurePolicy": "failureOutcome" }), MockTransport::accepting());
    let mut ctx = TreeContext::new(Uuid::new_v4(), login_state());

    assert_eq!(h.node.process(&mut ctx).await.unwrap(), Action::Goto(Outcome::Success));
}

#[tokio::test]
async fn unresolvable_recipient_still_attempts_send_with_empty_address() {
    let h = harness(Value::Null, MockTransport::accepting());
    let state = SharedState::from_json(json!({ "username": "ghost", "realm": "/" }));
    let mut ctx = TreeContext::new(Uuid::new_v4(), state);

    let action = h.node.process(&mut ctx).await.unwrap();

    assert_eq!(action, Action::Goto(Outcome::Next));
    assert_eq!(h.transport.last_mail().unwrap().to, vec![""]);
}

// ============================================================
// Suspend / resume
// ============================================================

#[tokio::test]
async fn suspend_stores_resume_uri_and_sends_once() {
    let h = harness(
        json!({ "suspendEnabled": true, "subject": "Hi {{username}}" }),
        MockTransport::accepting(),
    );
    let execution_id = Uuid::new_v4();
    let mut ctx = TreeContext::new(execution_id, login_state());

    let action = h.node.process(&mut ctx).await.unwrap();

    let directive = action.as_suspend().expect("suspend directive");
    let expected_uri = format!("{RESUME_BASE}?suspendedId={execution_id}");
    assert_eq!(directive.resume_uri, expected_uri);
    assert_eq!(directive.status_message, EMAIL_SENT_STATUS);
    assert_eq!(ctx.shared_state.get_str(RESUME_URI), Some(expected_uri.as_str()));
    assert_eq!(h.transport.call_count(), 1);
    assert_eq!(h.transport.last_mail().unwrap().subject, "Hi bo");
    assert_eq!(h.minter.mint_count(), 1);
}

#[tokio::test]
async fn resumed_invocation_completes_without_resending() {
    let h = harness(json!({ "suspendEnabled": true }), MockTransport::accepting());
    let execution_id = Uuid::new_v4();

    let mut first = TreeContext::new(execution_id, login_state());
    assert!(h.node.process(&mut first).await.unwrap().as_suspend().is_some());

    let mut resumed = TreeContext::resuming(execution_id, first.shared_state, Some(json!({ "ok": true })));
    let action = h.node.process(&mut resumed).await.unwrap();

    assert_eq!(action, Action::Goto(Outcome::Next));
    assert_eq!(h.transport.call_count(), 1, "mail must not be resent on resume");
    assert_eq!(h.identities.lookup_count(), 1, "recipient must not be re-resolved");
    assert_eq!(h.minter.mint_count(), 1);
}

#[tokio::test]
async fn resume_short_circuits_even_when_suspend_is_disabled() {
    let h = harness(Value::Null, MockTransport::accepting());
    let mut ctx = TreeContext::resuming(Uuid::new_v4(), login_state(), None);

    assert_eq!(h.node.process(&mut ctx).await.unwrap(), Action::Goto(Outcome::Next));
    assert_eq!(h.transport.call_count(), 0);
    assert_eq!(h.identities.lookup_count(), 0);
}

#[tokio::test]
async fn failed_send_while_suspending_reports_error_status() {
    let h = harness(
        json!({ "suspendEnabled": true, "failurePolicy": "failureOutcome" }),
        MockTransport::refusing("421 service not available"),
    );
    let mut ctx = TreeContext::new(Uuid::new_v4(), login_state());

    let action = h.node.process(&mut ctx).await.unwrap();

    let directive = action.as_suspend().expect("still suspends");
    assert_eq!(directive.status_message, EMAIL_FAILED_STATUS);
    assert!(ctx.shared_state.contains_key(RESUME_URI));
    assert!(ctx.shared_state.contains_key(ERROR_MESSAGE));
}

#[tokio::test]
async fn failed_send_before_suspend_takes_failure_outcome_on_resume() {
    let h = harness(
        json!({ "suspendEnabled": true, "failurePolicy": "failureOutcome" }),
        MockTransport::refusing("421 service not available"),
    );
    let execution_id = Uuid::new_v4();
    let mut first = TreeContext::new(execution_id, login_state());
    assert!(h.node.process(&mut first).await.unwrap().as_suspend().is_some());
    assert!(first.shared_state.contains_key(SEND_FAILED_KEY));

    let mut resumed = TreeContext::resuming(execution_id, first.shared_state, None);
    let action = h.node.process(&mut resumed).await.unwrap();

    assert_eq!(action, Action::Goto(Outcome::Failure));
    assert!(!resumed.shared_state.contains_key(SEND_FAILED_KEY), "marker is cleared");
    assert_eq!(h.transport.call_count(), 1);
}

#[tokio::test]
async fn successful_send_before_suspend_takes_success_outcome_on_resume() {
    let h = harness(
        json!({ "suspendEnabled": true, "failurePolicy": "failureOutcome" }),
        MockTransport::accepting(),
    );
    let execution_id = Uuid::new_v4();
    let mut first = TreeContext::new(execution_id, login_state());
    h.node.process(&mut first).await.unwrap();
    assert!(!first.shared_state.contains_key(SEND_FAILED_KEY));

    // An errorMessage written by another node must not flip the outcome.
    first.shared_state.insert(ERROR_MESSAGE, "from an earlier step");
    let mut resumed = TreeContext::resuming(execution_id, first.shared_state, None);

    assert_eq!(h.node.process(&mut resumed).await.unwrap(), Action::Goto(Outcome::Success));
}

#[tokio::test]
async fn resume_uri_is_minted_before_the_mail_is_rendered() {
    let h = harness(
        json!({ "suspendEnabled": true, "message": "Go {{resumeURI}}" }),
        MockTransport::accepting(),
    );
    let execution_id = Uuid::new_v4();
    let mut ctx = TreeContext::new(execution_id, login_state());

    let action = h.node.process(&mut ctx).await.unwrap();

    let uri = &action.as_suspend().expect("suspend directive").resume_uri;
    assert_eq!(h.transport.last_mail().unwrap().body, format!("Go {uri}"));
    assert_eq!(uri, &format!("{RESUME_BASE}?suspendedId={execution_id}"));
}

#[tokio::test]
async fn raw_templates_are_sent_when_suspend_rendering_is_off() {
    let h = harness(
        json!({
            "suspendEnabled": true,
            "renderOnSuspend": false,
            "subject": "Hi {{username}}",
            "message": "Code {{otp}}"
        }),
        MockTransport::accepting(),
    );
    let mut ctx = TreeContext::new(Uuid::new_v4(), login_state());
    h.node.process(&mut ctx).await.unwrap();

    let mail = h.transport.last_mail().unwrap();
    assert_eq!(mail.subject, "Hi {{username}}");
    assert_eq!(mail.body, "Code {{otp}}");
}

// ============================================================
// Construction
// ============================================================

#[test]
fn outcomes_follow_failure_policy() {
    let soft = harness(Value::Null, MockTransport::accepting());
    assert_eq!(soft.node.outcomes(), vec![Outcome::Next]);

    let strict = harness(json!({ "failurePolicy": "failureOutcome" }), MockTransport::accepting());
    assert_eq!(strict.node.outcomes(), vec![Outcome::Success, Outcome::Failure]);
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let result = EmailNotifyNode::from_value(
        json!({ "attribute": "" }),
        Arc::new(MockIdentityRepository::new()),
        Arc::new(MockTransport::accepting()),
        Arc::new(FixedResumeMinter::new(RESUME_BASE)),
    );
    assert!(matches!(result, Err(NodeError::InvalidConfig(_))));
}
