mod health_check;
mod index;
mod newsletter;

pub use health_check::health_check;
pub use index::{index, IndexQuery};
pub use newsletter::{newsletter, ArticleQuery};

use crate::domain::NewsletterStoreError;
use crate::utils::error_chain_fmt;
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

/// Settings every page handler needs.
#[derive(Clone, Debug)]
pub struct SiteContext {
    pub title: String,
    pub base_url: String,
    pub page_size: usize,
    pub greeting: Option<String>,
}

#[derive(thiserror::Error)]
pub enum PageError {
    #[error("The newsletter collection could not be loaded")]
    CollectionUnavailable(#[from] NewsletterStoreError),
}

impl std::fmt::Debug for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for PageError {
    fn status_code(&self) -> StatusCode {
        match self {
            PageError::CollectionUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::plaintext())
            .body(self.to_string())
    }
}
