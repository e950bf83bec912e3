use crate::presentation::html::{escape, inner_text, set_attribute, Fragment};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub anchor: String,
    pub label: String,
}

/// Give every section and sub-section heading a positional anchor.
///
/// Returns the rewritten markup and one entry per heading in document order.
/// Any id a heading already carried is replaced.
pub fn anchor_headings(markup: &str) -> (String, Vec<TocEntry>) {
    let fragment = Fragment::parse(markup);

    let entries: Vec<TocEntry> = fragment
        .elements(&["h2", "h3"])
        .iter()
        .enumerate()
        .map(|(index, heading)| {
            let anchor = format!("section-{}", index);
            set_attribute(heading, "id", &anchor);
            TocEntry {
                anchor,
                label: inner_text(heading),
            }
        })
        .collect();

    (fragment.to_html(), entries)
}

/// A flat list of links, one per entry. Heading depth is not shown.
pub fn render_toc(entries: &[TocEntry]) -> String {
    let items: String = entries
        .iter()
        .map(|entry| {
            format!(
                r##"<li><a href="#{}">{}</a></li>"##,
                entry.anchor,
                escape(&entry.label)
            )
        })
        .collect();

    format!("<strong>Table of Contents</strong><ul>{items}</ul>")
}
