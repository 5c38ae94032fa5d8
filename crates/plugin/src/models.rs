//! Node definitions as the host stores them.

use serde::{Deserialize, Serialize};

/// A single configured node in an authentication tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDefinition {
    /// Unique identifier within the tree.
    pub id: String,
    /// Maps to a factory in the [`crate::NodeRegistry`].
    pub node_type: String,
    /// Node configuration, parsed by the node itself.
    #[serde(default)]
    pub config: serde_json::Value,
}

impl NodeDefinition {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>, config: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            config,
        }
    }
}
