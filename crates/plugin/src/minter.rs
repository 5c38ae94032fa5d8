//! Host-side resume URI minting.

use nodes::SuspensionHost;
use uuid::Uuid;

/// Mints `{base_url}?suspendedId={id}` with a fresh random id per suspend.
///
/// The id is independent of the execution id, so a leaked URI reveals
/// nothing about the run it resumes.
#[derive(Debug, Clone)]
pub struct UrlResumeMinter {
    base_url: String,
}

impl UrlResumeMinter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl SuspensionHost for UrlResumeMinter {
    fn mint_resume_uri(&self, _execution_id: Uuid) -> String {
        format!("{}?suspendedId={}", self.base_url, Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mints_distinct_uris_under_base() {
        let minter = UrlResumeMinter::new("https://am.example.com/json/resume");
        let id = Uuid::new_v4();
        let a = minter.mint_resume_uri(id);
        let b = minter.mint_resume_uri(id);

        assert!(a.starts_with("https://am.example.com/json/resume?suspendedId="));
        assert_ne!(a, b);
        assert!(!a.contains(&id.to_string()));
    }
}
