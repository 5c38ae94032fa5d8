//! Node-level error types.

use thiserror::Error;

use crate::email_notify::gate::{GateEvent, GateState};

/// Errors returned to the host by a node.
///
/// Mail and identity failures never surface here; they are handled inside
/// the node and mapped onto an outcome.
#[derive(Debug, Error, Clone)]
pub enum NodeError {
    /// The node's configuration could not be parsed or is out of range.
    #[error("invalid node configuration: {0}")]
    InvalidConfig(String),

    /// The node asked its suspend gate for a transition the lifecycle forbids.
    #[error("illegal gate transition: {event:?} from {from:?}")]
    IllegalTransition { from: GateState, event: GateEvent },
}

/// Failure reported by the host's identity repository.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("no identity '{username}' in realm '{realm}'")]
    NotFound { username: String, realm: String },

    #[error("identity repository error: {0}")]
    Repository(String),

    #[error("session error: {0}")]
    Session(String),
}
