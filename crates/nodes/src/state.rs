//! Shared workflow state.
//!
//! The host owns the map for the lifetime of a workflow run and hands it to
//! each step. Nodes read well-known keys plus any user-defined template
//! variables, and write back only a handful of entries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const USERNAME: &str = "username";
pub const REALM: &str = "realm";
pub const EMAIL: &str = "email";
pub const ERROR_MESSAGE: &str = "errorMessage";
pub const RESUME_URI: &str = "resumeURI";

/// Realm used when the state carries none.
pub const ROOT_REALM: &str = "/";

/// String-keyed JSON values shared by every step of one workflow run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharedState(Map<String, Value>);

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from a JSON object. Anything else yields an empty state.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The value under `key` if it is a JSON string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// The value under `key` as text, or `None` if absent or null.
    ///
    /// Strings come back verbatim; any other value as its JSON text.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
