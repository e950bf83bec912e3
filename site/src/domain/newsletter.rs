use crate::domain::newsletter_id::NewsletterId;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One entry of the static document, exactly as it appears on the wire.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct NewsletterRecord {
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub content_html: String,
}

/// The top level of the static document.
///
/// Entries are kept as raw JSON so that one malformed entry does not sink the
/// whole collection.
#[derive(Deserialize)]
pub struct NewsletterFeed {
    pub newsletters: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Newsletter {
    pub id: NewsletterId,
    pub title: String,
    pub date: NaiveDate,
    pub summary: String,
    pub tags: Vec<String>,
    pub content_html: String,
}

impl Newsletter {
    pub fn formatted_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RecordError {
    #[error("{0}")]
    InvalidId(String),
    #[error("newsletter {0} has a blank title")]
    BlankTitle(String),
    #[error("newsletter {id} has an unparseable date {date:?}")]
    InvalidDate { id: String, date: String },
}

impl TryFrom<NewsletterRecord> for Newsletter {
    type Error = RecordError;

    fn try_from(value: NewsletterRecord) -> Result<Self, Self::Error> {
        let id = NewsletterId::parse(value.id).map_err(RecordError::InvalidId)?;

        if value.title.trim().is_empty() {
            return Err(RecordError::BlankTitle(id.to_string()));
        }

        let date = parse_date(&value.date).ok_or_else(|| RecordError::InvalidDate {
            id: id.to_string(),
            date: value.date.clone(),
        })?;

        Ok(Self {
            id,
            title: value.title,
            date,
            summary: value.summary,
            tags: value.tags,
            content_html: value.content_html,
        })
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()))
}

/// Parse the static document into validated newsletters, newest first.
///
/// Entries that fail validation are logged and skipped.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<Newsletter>, serde_json::Error> {
    let feed: NewsletterFeed = serde_json::from_slice(bytes)?;

    let mut newsletters: Vec<Newsletter> = feed
        .newsletters
        .into_iter()
        .enumerate()
        .filter_map(|(position, raw)| {
            let parsed = serde_json::from_value::<NewsletterRecord>(raw)
                .map_err(|e| e.to_string())
                .and_then(|record| Newsletter::try_from(record).map_err(|e| e.to_string()));

            match parsed {
                Ok(newsletter) => Some(newsletter),
                Err(reason) => {
                    tracing::warn!(position, %reason, "Skipping a malformed newsletter entry");
                    None
                }
            }
        })
        .collect();

    newsletters.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(newsletters)
}
