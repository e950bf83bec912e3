use crate::domain::{parse_feed, Newsletter, NewsletterStore, NewsletterStoreError};
use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;

/// Reads the static document from the local filesystem.
#[derive(Clone)]
pub struct FileNewsletterStore {
    path: PathBuf,
}

impl FileNewsletterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl NewsletterStore for FileNewsletterStore {
    #[tracing::instrument(name = "read_newsletters_from_file", skip(self), fields(path = %self.path.display()))]
    async fn load_newsletters(&self) -> Result<Vec<Newsletter>, NewsletterStoreError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))
            .map_err(NewsletterStoreError::Unreachable)?;

        Ok(parse_feed(&bytes)?)
    }
}
