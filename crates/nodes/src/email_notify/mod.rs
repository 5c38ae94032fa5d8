//! The email notify node.
//!
//! One invocation runs, in order:
//! 1. the resume check ([`gate`]); a resumed step completes immediately;
//! 2. recipient resolution ([`recipient`]);
//! 3. subject/message rendering ([`template`]);
//! 4. the send ([`dispatch`]), followed either by an outcome or by a
//!    suspend directive.

pub mod config;
pub mod template;
pub mod recipient;
pub mod dispatch;
pub mod gate;
pub mod node;

pub use config::{FailurePolicy, NodeConfig};
pub use template::{render_template, segments, Segment};
pub use recipient::{RecipientError, RecipientResolver};
pub use dispatch::MailDispatcher;
pub use gate::{GateEvent, GateState, PreparedSuspend, SuspendGate};
pub use node::{EmailNotifyNode, NODE_TYPE, SEND_FAILED_KEY};
