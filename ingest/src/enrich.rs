use chrono::{DateTime, NaiveDate};
use newsletter_site::presentation::html::{visible_text, Fragment};
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

pub const SUMMARY_LENGTH: usize = 200;

/// Title keywords and the tag each one earns, in the order tags are listed.
const KEYWORD_TAGS: &[(&str, &str)] = &[
    ("agent", "Agents"),
    ("context", "Context Engineering"),
    ("ocr", "OCR"),
    ("deepseek", "DeepSeek"),
    ("gemini", "Gemini"),
    ("google", "Google"),
    ("llm", "LLM"),
    ("diffusion", "Diffusion Models"),
    ("sql", "SQL"),
    ("memory", "Memory"),
    ("harvard", "Harvard"),
    ("book", "Education"),
    ("systems", "Systems"),
    ("open source", "Open Source"),
    ("fine-tune", "Fine-tuning"),
    ("training", "Training"),
];

const FALLBACK_TAG: &str = "AI";

static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static SLUG_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_-]+").unwrap());
static DATE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\([^)]*\)\s*$").unwrap());

pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept = NON_SLUG.replace_all(&lowered, "");
    let dashed = SLUG_SEPARATORS.replace_all(&kept, "-");
    dashed.trim_matches('-').to_string()
}

/// Calendar date of an RFC 2822 `Date` header, in the sender's own offset.
pub fn parse_email_date(raw: &str) -> Option<NaiveDate> {
    let without_comment = DATE_COMMENT.replace(raw.trim(), "");
    DateTime::parse_from_rfc2822(&without_comment)
        .ok()
        .map(|date| date.date_naive())
}

/// Keep only what sits inside `<body>`. Markup without one is kept whole.
pub fn body_markup(html: &str) -> String {
    Fragment::parse_body(html).to_html()
}

/// The first `SUMMARY_LENGTH` graphemes of the visible text.
pub fn summarize(html: &str) -> String {
    let text = visible_text(html);

    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() > SUMMARY_LENGTH {
        format!("{}...", graphemes[..SUMMARY_LENGTH].concat())
    } else {
        text
    }
}

pub fn tags_for(title: &str) -> Vec<String> {
    let title = title.to_lowercase();

    let mut tags: Vec<String> = Vec::new();
    for (keyword, tag) in KEYWORD_TAGS {
        if title.contains(keyword) && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }

    if tags.is_empty() {
        tags.push(FALLBACK_TAG.to_string());
    }

    tags
}
