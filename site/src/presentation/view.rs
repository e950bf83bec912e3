use crate::presentation::container::Container;
use crate::presentation::html::escape;

const SCROLL_TO_TOP: &str =
    r#"<script>window.scrollTo({ top: 0, behavior: "smooth" });</script>"#;

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem; color: #222; }
#newsletter-list { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 1rem; }
.card { border: 1px solid #ddd; border-radius: 8px; padding: 1rem; }
.meta { color: #777; font-size: 0.9rem; }
.tags span { display: inline-block; background: #eef; border-radius: 4px; padding: 0 0.4rem; margin-right: 0.3rem; font-size: 0.8rem; }
#pagination { display: flex; gap: 0.4rem; justify-content: center; margin: 1.5rem 0; }
.page-btn { padding: 0.3rem 0.7rem; border: 1px solid #ccc; border-radius: 4px; text-decoration: none; }
.page-btn.active { background: #333; color: #fff; }
.page-btn[aria-disabled="true"] { opacity: 0.4; }
#searchBar { width: 100%; padding: 0.5rem; margin-bottom: 1rem; }
#table-of-contents { border-left: 3px solid #ccc; padding-left: 1rem; margin-bottom: 1.5rem; }
"#;

/// The regions of the index page.
pub struct IndexView {
    pub greeting: Option<Container>,
    pub search: Option<Container>,
    pub list: Option<Container>,
    pub pagination: Option<Container>,
    pub scroll_to_top: bool,
}

impl IndexView {
    pub fn new(greeting: Option<&str>) -> Self {
        let greeting = greeting.map(|text| {
            let mut container = Container::new("greeting");
            container.set_inner_html(format!("<p>{}</p>", escape(text)));
            container
        });

        Self {
            greeting,
            search: Some(Container::new("search")),
            list: Some(Container::new("newsletter-list")),
            pagination: Some(Container::new("pagination")),
            scroll_to_top: false,
        }
    }

    /// A page with none of the index regions, such as an article page.
    pub fn empty() -> Self {
        Self {
            greeting: None,
            search: None,
            list: None,
            pagination: None,
            scroll_to_top: false,
        }
    }

    pub fn to_html(&self, site_title: &str, base_url: &str) -> String {
        let body = [&self.greeting, &self.search, &self.list, &self.pagination]
            .into_iter()
            .flatten()
            .map(Container::to_html)
            .collect::<String>();

        document(site_title, site_title, base_url, &body, self.scroll_to_top)
    }
}

/// The regions of an article page.
pub struct ArticleView {
    /// Display title, set once an article is found.
    pub title: Option<String>,
    pub header: Option<Container>,
    pub toc: Option<Container>,
    pub content: Option<Container>,
}

impl ArticleView {
    pub fn new() -> Self {
        Self {
            title: None,
            header: Some(Container::new("article-header")),
            toc: Some(Container::new("table-of-contents")),
            content: Some(Container::new("article-content")),
        }
    }

    pub fn empty() -> Self {
        Self {
            title: None,
            header: None,
            toc: None,
            content: None,
        }
    }

    pub fn to_html(&self, site_title: &str, base_url: &str) -> String {
        let body = [&self.header, &self.toc, &self.content]
            .into_iter()
            .flatten()
            .map(Container::to_html)
            .collect::<String>();
        let title = self.title.as_deref().unwrap_or(site_title);

        document(title, site_title, base_url, &body, false)
    }
}

impl Default for ArticleView {
    fn default() -> Self {
        Self::new()
    }
}

fn document(title: &str, site_title: &str, base_url: &str, body: &str, scroll: bool) -> String {
    let scroll = if scroll { SCROLL_TO_TOP } else { "" };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
<nav><a href="{home}/">{site_title}</a></nav>
<main>
{body}
</main>
{scroll}
</body>
</html>"#,
        title = escape(title),
        home = escape(base_url.trim_end_matches('/')),
        site_title = escape(site_title),
    )
}
