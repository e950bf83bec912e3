use crate::domain::{Newsletter, NewsletterStore, NewsletterStoreError};
use crate::presentation::container::Container;
use crate::presentation::html::escape;
use crate::presentation::toc::{anchor_headings, render_toc};
use crate::presentation::view::{ArticleView, IndexView};

pub const DEFAULT_PAGE_SIZE: usize = 9;

pub const NOT_FOUND_HTML: &str = "<p>Newsletter not found.</p>";

/// Which part of the filtered sequence is on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    current_page: usize,
    filtered: Vec<Newsletter>,
    page_size: usize,
}

impl PageState {
    fn new(filtered: Vec<Newsletter>, page_size: usize) -> Self {
        Self {
            current_page: 1,
            filtered,
            page_size: page_size.max(1),
        }
    }

    pub fn total_pages(&self) -> usize {
        self.filtered.len().div_ceil(self.page_size)
    }

    /// Items `[(page - 1) * page_size, page * page_size)`, empty when out of range.
    pub fn slice(&self, page: usize) -> &[Newsletter] {
        let start = page.saturating_sub(1).saturating_mul(self.page_size);
        let end = start.saturating_add(self.page_size).min(self.filtered.len());
        self.filtered.get(start..end).unwrap_or_default()
    }
}

/// Owns the loaded collection and the index page state for one page view.
pub struct PresentationController {
    collection: Vec<Newsletter>,
    state: PageState,
    query: String,
    base_url: String,
}

impl PresentationController {
    pub fn new(mut collection: Vec<Newsletter>, page_size: usize, base_url: &str) -> Self {
        collection.sort_by(|a, b| b.date.cmp(&a.date));
        let state = PageState::new(collection.clone(), page_size);

        Self {
            collection,
            state,
            query: String::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[tracing::instrument(name = "load_newsletter_collection", skip(store, base_url))]
    pub async fn load(
        store: &dyn NewsletterStore,
        page_size: usize,
        base_url: &str,
    ) -> Result<Self, NewsletterStoreError> {
        let collection = store.load_newsletters().await?;
        Ok(Self::new(collection, page_size, base_url))
    }

    pub fn collection(&self) -> &[Newsletter] {
        &self.collection
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn current_page(&self) -> usize {
        self.state.current_page
    }

    pub fn filtered(&self) -> &[Newsletter] {
        &self.state.filtered
    }

    pub fn total_pages(&self) -> usize {
        self.state.total_pages()
    }

    /// First render of the index: an empty search box and page one.
    pub fn init_index(&mut self, view: &mut IndexView) {
        self.render_search(view.search.as_mut());
        self.render_page(1, false, view);
    }

    /// One card per item, in the order given.
    pub fn render_list(&self, items: &[Newsletter], list: Option<&mut Container>) {
        let Some(list) = list else {
            return;
        };

        let cards: String = items.iter().map(|item| self.render_card(item)).collect();
        list.set_inner_html(cards);
    }

    pub fn render_page(&mut self, page: usize, scroll: bool, view: &mut IndexView) {
        self.state.current_page = page.max(1);

        let items = self.state.slice(self.state.current_page);
        self.render_list(items, view.list.as_mut());
        self.render_controls(view.pagination.as_mut());

        if scroll {
            view.scroll_to_top = true;
        }
    }

    pub fn render_controls(&self, pagination: Option<&mut Container>) {
        let Some(pagination) = pagination else {
            return;
        };

        let total_pages = self.total_pages();
        if total_pages <= 1 {
            pagination.set_inner_html("");
            return;
        }

        let current = self.state.current_page;
        let mut html = String::new();

        html.push_str(&self.render_control("Prev", current.saturating_sub(1), current == 1, false));
        for page in 1..=total_pages {
            html.push_str(&self.render_control(&page.to_string(), page, false, page == current));
        }
        html.push_str(&self.render_control("Next", current + 1, current >= total_pages, false));

        pagination.set_inner_html(html);
    }

    /// Narrow the collection to items whose title or summary contains `query`.
    #[tracing::instrument(name = "filter_newsletters", skip(self, view))]
    pub fn filter(&mut self, query: &str, view: &mut IndexView) {
        let needle = query.to_lowercase();
        let matches: Vec<Newsletter> = self
            .collection
            .iter()
            .filter(|item| {
                item.title.to_lowercase().contains(&needle)
                    || item.summary.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        tracing::debug!(matches = matches.len(), "Filtered newsletter collection");

        self.query = query.to_string();
        self.state.filtered = matches;
        self.render_search(view.search.as_mut());
        self.render_page(1, false, view);
    }

    fn render_search(&self, search: Option<&mut Container>) {
        let Some(search) = search else {
            return;
        };

        search.set_inner_html(format!(
            r#"<form method="get" action="{}/"><input type="search" id="searchBar" name="q" placeholder="Search newsletters..." value="{}"></form>"#,
            self.base_url,
            escape(&self.query)
        ));
    }

    fn render_card(&self, item: &Newsletter) -> String {
        let tags: String = item
            .tags
            .iter()
            .map(|tag| format!("<span>{}</span>", escape(tag)))
            .collect();
        let href = format!(
            "{}/newsletter.html?{}",
            self.base_url,
            query_string(&[("id", item.id.as_ref())])
        );

        format!(
            r#"<div class="card"><div class="meta">{date}</div><h2><a href="{href}">{title}</a></h2><p>{summary}</p><div class="tags">{tags}</div></div>"#,
            date = escape(&item.formatted_date()),
            href = escape(&href),
            title = escape(&item.title),
            summary = escape(&item.summary),
        )
    }

    fn render_control(&self, label: &str, page: usize, disabled: bool, active: bool) -> String {
        if disabled {
            return format!(
                r#"<span class="page-btn" aria-disabled="true">{}</span>"#,
                label
            );
        }

        let page = page.to_string();
        let mut pairs = vec![("page", page.as_str())];
        if !self.query.is_empty() {
            pairs.push(("q", self.query.as_str()));
        }
        let href = format!("{}/?{}", self.base_url, query_string(&pairs));
        let (class, current) = if active {
            ("page-btn active", r#" aria-current="page""#)
        } else {
            ("page-btn", "")
        };

        format!(
            r#"<a class="{}"{} href="{}">{}</a>"#,
            class,
            current,
            escape(&href),
            label
        )
    }
}

fn query_string(pairs: &[(&str, &str)]) -> String {
    // String pairs always serialize.
    serde_urlencoded::to_string(pairs).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleOutcome {
    /// The page was opened without an `id`.
    NoRequest,
    Rendered,
    NotFound,
}

/// Fetch the collection and render the article named by `id`.
///
/// An empty `id` counts as no request. Runs independently of any index state.
#[tracing::instrument(name = "load_article", skip(store, view))]
pub async fn load_article(
    store: &dyn NewsletterStore,
    id: Option<&str>,
    view: &mut ArticleView,
) -> Result<ArticleOutcome, NewsletterStoreError> {
    let Some(id) = id.filter(|id| !id.is_empty()) else {
        return Ok(ArticleOutcome::NoRequest);
    };

    let collection = store.load_newsletters().await?;
    Ok(render_article(&collection, id, view))
}

/// Render the first item whose id equals `id` exactly.
pub fn render_article(collection: &[Newsletter], id: &str, view: &mut ArticleView) -> ArticleOutcome {
    let Some(article) = collection.iter().find(|n| n.id.as_ref() == id) else {
        tracing::info!(id, "Requested newsletter does not exist");
        if let Some(content) = view.content.as_mut() {
            content.set_inner_html(NOT_FOUND_HTML);
        }
        return ArticleOutcome::NotFound;
    };

    view.title = Some(article.title.clone());

    if let Some(header) = view.header.as_mut() {
        header.set_inner_html(format!(
            r#"<h1>{}</h1><p class="meta">Published on {}</p>"#,
            escape(&article.title),
            escape(&article.formatted_date())
        ));
    }

    if let Some(content) = view.content.as_mut() {
        content.set_inner_html(article.content_html.clone());
    }

    generate_toc(view.content.as_mut(), view.toc.as_mut());

    ArticleOutcome::Rendered
}

/// Anchor the headings of the rendered article and list them.
///
/// Hides the table of contents when there is nothing to list.
pub fn generate_toc(content: Option<&mut Container>, toc: Option<&mut Container>) {
    let entries = match content {
        Some(content) => {
            let (anchored, entries) = anchor_headings(content.inner_html());
            content.set_inner_html(anchored);
            entries
        }
        None => Vec::new(),
    };

    let Some(toc) = toc else {
        return;
    };

    if entries.is_empty() {
        toc.hide();
    } else {
        toc.set_inner_html(render_toc(&entries));
    }
}
