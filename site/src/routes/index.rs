use crate::domain::NewsletterStore;
use crate::presentation::{IndexView, PresentationController};
use crate::routes::{PageError, SiteContext};
use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};

#[derive(serde::Deserialize, Debug)]
pub struct IndexQuery {
    page: Option<usize>,
    q: Option<String>,
}

#[tracing::instrument(
    name = "Rendering the newsletter index",
    skip(query, store, site),
    fields(page = ?query.page, search = ?query.q)
)]
pub async fn index(
    query: web::Query<IndexQuery>,
    store: web::Data<dyn NewsletterStore>,
    site: web::Data<SiteContext>,
) -> Result<HttpResponse, PageError> {
    let mut controller =
        PresentationController::load(store.get_ref(), site.page_size, &site.base_url).await?;
    let mut view = IndexView::new(site.greeting.as_deref());

    controller.init_index(&mut view);

    if let Some(q) = &query.q {
        controller.filter(q, &mut view);
    }

    // Requests carrying a page come from the pagination controls.
    if let Some(page) = query.page {
        controller.render_page(page, true, &mut view);
    }

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(view.to_html(&site.title, &site.base_url)))
}
