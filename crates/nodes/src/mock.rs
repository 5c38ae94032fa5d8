//! Test doubles for the host-side collaborators.
//!
//! - [`MockIdentityRepository`] stands in for the identity store.
//! - [`FixedResumeMinter`] stands in for the host's suspension manager.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::{Identity, IdentityError, IdentityRepository, SuspensionHost};

type Attributes = HashMap<String, Vec<String>>;

/// In-memory identity store that records every lookup it receives.
#[derive(Default)]
pub struct MockIdentityRepository {
    users: HashMap<(String, String), Attributes>,
    lookup_failure: Option<IdentityError>,
    attribute_failure: Option<IdentityError>,
    /// All `(username, realm)` pairs looked up (in call order).
    pub lookups: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user with one attribute.
    pub fn with_user(
        mut self,
        username: &str,
        realm: &str,
        attribute: &str,
        values: &[&str],
    ) -> Self {
        self.users
            .entry((username.to_owned(), realm.to_owned()))
            .or_default()
            .insert(
                attribute.to_owned(),
                values.iter().map(|v| v.to_string()).collect(),
            );
        self
    }

    /// Make every `identity` call fail.
    pub fn failing_lookup(mut self, err: IdentityError) -> Self {
        self.lookup_failure = Some(err);
        self
    }

    /// Make every `attribute` call on a found identity fail.
    pub fn failing_attribute(mut self, err: IdentityError) -> Self {
        self.attribute_failure = Some(err);
        self
    }

    /// Number of times `identity` has been called.
    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }
}

struct MockIdentity {
    attributes: Attributes,
    failure: Option<IdentityError>,
}

#[async_trait]
impl Identity for MockIdentity {
    async fn attribute(&self, name: &str) -> Result<Option<Vec<String>>, IdentityError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(self.attributes.get(name).cloned())
    }
}

#[async_trait]
impl IdentityRepository for MockIdentityRepository {
    async fn identity(
        &self,
        username: &str,
        realm: &str,
    ) -> Result<Box<dyn Identity>, IdentityError> {
        self.lookups
            .lock()
            .unwrap()
            .push((username.to_owned(), realm.to_owned()));

        if let Some(err) = &self.lookup_failure {
            return Err(err.clone());
        }

        let attributes = self
            .users
            .get(&(username.to_owned(), realm.to_owned()))
            .cloned()
            .ok_or_else(|| IdentityError::NotFound {
                username: username.to_owned(),
                realm: realm.to_owned(),
            })?;

        Ok(Box::new(MockIdentity {
            attributes,
            failure: self.attribute_failure.clone(),
        }))
    }
}

/// Mints `{base}?suspendedId={execution_id}` and counts how often it did.
pub struct FixedResumeMinter {
    pub base: String,
    pub minted: Arc<Mutex<Vec<String>>>,
}

impl FixedResumeMinter {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            minted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn mint_count(&self) -> usize {
        self.minted.lock().unwrap().len()
    }
}

impl SuspensionHost for FixedResumeMinter {
    fn mint_resume_uri(&self, execution_id: Uuid) -> String {
        let uri = format!("{}?suspendedId={}", self.base, execution_id);
        self.minted.lock().unwrap().push(uri.clone());
        uri
    }
}
