use crate::domain::NewsletterStore;
use crate::presentation::{load_article, ArticleOutcome, ArticleView};
use crate::routes::{PageError, SiteContext};
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};

#[derive(serde::Deserialize, Debug)]
pub struct ArticleQuery {
    id: Option<String>,
}

#[tracing::instrument(
    name = "Rendering a newsletter article",
    skip(query, store, site),
    fields(newsletter_id = ?query.id)
)]
pub async fn newsletter(
    query: web::Query<ArticleQuery>,
    store: web::Data<dyn NewsletterStore>,
    site: web::Data<SiteContext>,
) -> Result<HttpResponse, PageError> {
    let mut view = ArticleView::new();

    let outcome = load_article(store.get_ref(), query.id.as_deref(), &mut view).await?;

    let status = match outcome {
        ArticleOutcome::NotFound => StatusCode::NOT_FOUND,
        ArticleOutcome::Rendered | ArticleOutcome::NoRequest => StatusCode::OK,
    };

    Ok(HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(view.to_html(&site.title, &site.base_url)))
}
