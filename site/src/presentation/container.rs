/// A named region of a page that renderers write markup into.
///
/// Renderers take `Option<&mut Container>` and skip their work when the page
/// has no such region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    dom_id: &'static str,
    inner_html: String,
    hidden: bool,
}

impl Container {
    pub fn new(dom_id: &'static str) -> Self {
        Self {
            dom_id,
            inner_html: String::new(),
            hidden: false,
        }
    }

    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Replace everything in the container. A replaced container is visible.
    pub fn set_inner_html(&mut self, html: impl Into<String>) {
        self.inner_html = html.into();
        self.hidden = false;
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    pub fn to_html(&self) -> String {
        let hidden = if self.hidden { " hidden" } else { "" };
        format!(
            r#"<div id="{}"{}>{}</div>"#,
            self.dom_id, hidden, self.inner_html
        )
    }
}
