//! Plugin-level error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors produced while registering, building, or running nodes.
#[derive(Debug, Error)]
pub enum PluginError {
    // ------ Registration errors ------

    /// No factory is registered for the node type.
    #[error("no implementation registered for node_type '{0}'")]
    UnknownNodeType(String),

    /// Asked to upgrade from a version newer than this plugin.
    #[error("cannot upgrade from version {from} to older version {current}")]
    Downgrade { from: String, current: String },

    /// A version string could not be parsed.
    #[error("invalid plugin version '{0}'")]
    InvalidVersion(String),

    // ------ Execution errors ------

    /// Building or running a node failed.
    #[error("node '{node_id}' failed: {source}")]
    Node {
        node_id: String,
        #[source]
        source: nodes::NodeError,
    },

    /// A resume arrived for a URI that no suspended step is waiting on.
    /// The URI is kept out of the message since it grants the resume.
    #[error("no suspended step for the given resume uri")]
    UnknownResumeToken(String),

    /// The step waited longer than the runner's resume TTL.
    #[error("suspended step expired (suspended at {suspended_at})")]
    ResumeExpired { suspended_at: DateTime<Utc> },
}
