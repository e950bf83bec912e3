use crate::domain::{parse_feed, Newsletter, NewsletterStore, NewsletterStoreError};
use anyhow::Context;
use async_trait::async_trait;
use std::time::Duration;

/// Fetches the static document with a single `GET`.
#[derive(Clone)]
pub struct HttpNewsletterStore {
    http_client: reqwest::Client,
    url: String,
}

impl HttpNewsletterStore {
    pub fn new(url: String, timeout: Duration) -> Result<Self, anyhow::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build the HTTP client")?;

        Ok(Self { http_client, url })
    }
}

#[async_trait]
impl NewsletterStore for HttpNewsletterStore {
    #[tracing::instrument(name = "fetch_newsletters_over_http", skip(self), fields(url = %self.url))]
    async fn load_newsletters(&self) -> Result<Vec<Newsletter>, NewsletterStoreError> {
        let bytes = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| NewsletterStoreError::Unreachable(e.into()))?
            .bytes()
            .await
            .map_err(|e| NewsletterStoreError::Unreachable(e.into()))?;

        let newsletters = parse_feed(&bytes)?;

        tracing::info!(count = newsletters.len(), "Loaded newsletter collection");

        Ok(newsletters)
    }
}
