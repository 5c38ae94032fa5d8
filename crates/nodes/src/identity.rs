//! Identity repository seam.

use async_trait::async_trait;

use crate::IdentityError;

/// A user record owned by the host.
#[async_trait]
pub trait Identity: Send + Sync {
    /// All values of attribute `name`, or `None` if the identity has none.
    async fn attribute(&self, name: &str) -> Result<Option<Vec<String>>, IdentityError>;
}

/// Looks up users by name and realm.
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    async fn identity(
        &self,
        username: &str,
        realm: &str,
    ) -> Result<Box<dyn Identity>, IdentityError>;
}
