//! `nodes` crate: the `AuthNode` contract and the email notify node.
//!
//! The host (tree engine, shared state store, identity repository,
//! suspension manager) lives outside this crate. It is reached only through
//! the traits in [`traits`] and [`identity`].

pub mod error;
pub mod state;
pub mod traits;
pub mod identity;
pub mod email_notify;
pub mod mock;

pub use error::{IdentityError, NodeError};
pub use state::SharedState;
pub use traits::{Action, AuthNode, Outcome, SuspendDirective, SuspensionHost, TreeContext};
pub use identity::{Identity, IdentityRepository};
pub use email_notify::{EmailNotifyNode, FailurePolicy, NodeConfig};

#[cfg(test)]
mod email_notify_tests;
