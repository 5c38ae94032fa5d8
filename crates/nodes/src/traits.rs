//! The `AuthNode` trait, the contract every node must fulfil, and the
//! types that cross the node/host boundary.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::{NodeError, SharedState};

/// Everything the host hands a node for one invocation.
#[derive(Debug, Clone)]
pub struct TreeContext {
    /// ID of the current workflow run; stable across suspend/resume.
    pub execution_id: Uuid,
    pub shared_state: SharedState,
    /// `true` when this invocation continues a previously suspended step.
    pub resumed: bool,
    /// Whatever the host received alongside the resume signal.
    pub resume_payload: Option<Value>,
}

impl TreeContext {
    /// A fresh (non-resumed) invocation.
    pub fn new(execution_id: Uuid, shared_state: SharedState) -> Self {
        Self {
            execution_id,
            shared_state,
            resumed: false,
            resume_payload: None,
        }
    }

    /// An invocation continuing a suspended step.
    pub fn resuming(
        execution_id: Uuid,
        shared_state: SharedState,
        resume_payload: Option<Value>,
    ) -> Self {
        Self {
            execution_id,
            shared_state,
            resumed: true,
            resume_payload,
        }
    }
}

/// Named branch the host should take after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The single outcome of a node that always continues.
    Next,
    Success,
    Failure,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Next => "outcome",
            Outcome::Success => "success",
            Outcome::Failure => "failure",
        }
    }
}

/// Halts the workflow until the host receives `resume_uri` back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuspendDirective {
    /// Shown to the user while the workflow waits.
    pub status_message: String,
    pub resume_uri: String,
}

/// What a node tells the host to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Goto(Outcome),
    Suspend(SuspendDirective),
}

impl Action {
    pub fn as_suspend(&self) -> Option<&SuspendDirective> {
        match self {
            Action::Suspend(directive) => Some(directive),
            Action::Goto(_) => None,
        }
    }
}

/// Host-side minting of resume URIs.
pub trait SuspensionHost: Send + Sync {
    /// A fresh, opaque URI that will route a later resume back to
    /// `execution_id`.
    fn mint_resume_uri(&self, execution_id: Uuid) -> String;
}

/// The core node trait.
///
/// Implementations handle their own collaborator failures and turn them into
/// an [`Action`]; an `Err` is reserved for problems the host must see.
#[async_trait]
pub trait AuthNode: Send + Sync {
    /// Every outcome [`AuthNode::process`] can return, for the host to wire.
    fn outcomes(&self) -> Vec<Outcome>;

    /// Run one step. May read and write `ctx.shared_state`.
    async fn process(&self, ctx: &mut TreeContext) -> Result<Action, NodeError>;
}
