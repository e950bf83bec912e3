pub mod document;
pub mod eml;
pub mod enrich;

use crate::document::NewsletterDocument;
use crate::eml::Message;
use crate::enrich::{body_markup, parse_email_date, slugify, summarize, tags_for};
use anyhow::Context;
use newsletter_site::domain::{Newsletter, NewsletterRecord, RecordError};
use newsletter_site::presentation::html::escape;
use newsletter_site::utils::error_chain_fmt;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error)]
pub enum IngestError {
    #[error("The email has no {0} header")]
    MissingHeader(&'static str),
    #[error("The email has neither an HTML nor a plain text body")]
    MissingBody,
    #[error("The newsletter document is invalid: {0}")]
    InvalidDocument(String),
    #[error("The email does not produce a valid newsletter")]
    InvalidRecord(#[from] RecordError),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// What an `add` run did.
#[derive(Debug, Default)]
pub struct AddReport {
    pub added: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Build a newsletter entry from a raw RFC 5322 message.
#[tracing::instrument(name = "newsletter_from_email", skip(raw))]
pub fn newsletter_from_email(raw: &[u8]) -> Result<NewsletterRecord, IngestError> {
    let message = Message::parse(raw);

    let subject = message
        .header("Subject")
        .filter(|s| !s.trim().is_empty())
        .ok_or(IngestError::MissingHeader("Subject"))?;

    let date = match message.header("Date").as_deref().and_then(parse_email_date) {
        Some(date) => date,
        None => {
            tracing::warn!(date = ?message.header("Date"), "Unparseable email date, using today");
            chrono::Local::now().date_naive()
        }
    };
    let date = date.format("%Y-%m-%d").to_string();

    let html = message
        .find_text("text/html")
        .or_else(|| {
            message
                .find_text("text/plain")
                .map(|text| format!("<p>{}</p>", escape(&text)))
        })
        .ok_or(IngestError::MissingBody)?;
    let content_html = body_markup(&html);

    let record = NewsletterRecord {
        id: format!("{}-{}", date, slugify(&subject)),
        summary: summarize(&content_html),
        tags: tags_for(&subject),
        title: subject,
        date,
        content_html,
    };

    // Only write entries the site will accept.
    Newsletter::try_from(record.clone())?;

    Ok(record)
}

/// Expand directories into the `.eml` files directly inside them.
pub fn collect_eml_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, IngestError> {
    let mut paths = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            paths.push(input.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = std::fs::read_dir(input)
            .with_context(|| format!("Failed to list {}", input.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("eml"))
            })
            .collect();
        found.sort();
        paths.extend(found);
    }

    Ok(paths)
}

/// Add every message in `inputs` to the document at `data`.
///
/// Messages whose id is already present are skipped. A message that cannot be
/// turned into a newsletter is reported and does not stop the run.
#[tracing::instrument(name = "add_newsletters", skip(data, inputs), fields(data = %data.display()))]
pub fn add(data: &Path, inputs: &[PathBuf]) -> Result<AddReport, IngestError> {
    let mut document = NewsletterDocument::load(data)?;
    let mut existing_ids = document.ids();
    let mut report = AddReport::default();

    for path in collect_eml_paths(inputs)? {
        tracing::info!(path = %path.display(), "Processing email");

        let record = std::fs::read(&path)
            .with_context(|| format!("Failed to read {}", path.display()))
            .map_err(IngestError::from)
            .and_then(|raw| newsletter_from_email(&raw));

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error.cause_chain = ?e, path = %path.display(), "Skipping email");
                report.failed.push((path, e.to_string()));
                continue;
            }
        };

        if !existing_ids.insert(record.id.clone()) {
            tracing::info!(id = %record.id, "Skipping newsletter, it already exists");
            report.skipped.push(record.id);
            continue;
        }

        document.push(&record)?;
        tracing::info!(id = %record.id, "Added newsletter");
        report.added.push(record.id);
    }

    document.save(data)?;

    Ok(report)
}

/// Remove the listed ids from the document at `data`.
///
/// The document is only written when something was removed.
#[tracing::instrument(name = "remove_newsletters", skip(data), fields(data = %data.display()))]
pub fn remove(data: &Path, ids: &[String]) -> Result<usize, IngestError> {
    if !data.exists() {
        tracing::info!("No document to remove newsletters from");
        return Ok(0);
    }
    let mut document = NewsletterDocument::load(data)?;

    let removed = document.remove(ids);
    if removed > 0 {
        document.save(data)?;
    }

    tracing::info!(removed, "Removed newsletters");
    Ok(removed)
}
