use crate::domain::newsletter::Newsletter;
use crate::utils::error_chain_fmt;
use async_trait::async_trait;

#[derive(thiserror::Error)]
pub enum NewsletterStoreError {
    #[error("Failed to retrieve the newsletter collection")]
    Unreachable(#[source] anyhow::Error),
    #[error("The newsletter collection is not a valid document")]
    MalformedPayload(#[from] serde_json::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for NewsletterStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Where the newsletter collection comes from.
///
/// Implementations return the validated collection sorted newest first.
#[async_trait]
pub trait NewsletterStore: Send + Sync {
    async fn load_newsletters(&self) -> Result<Vec<Newsletter>, NewsletterStoreError>;
}
