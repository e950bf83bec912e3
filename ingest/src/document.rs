use crate::IngestError;
use anyhow::Context;
use newsletter_site::domain::NewsletterRecord;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

const NEWSLETTERS: &str = "newsletters";

/// The static newsletter document, edited in place.
///
/// Top-level fields other than `newsletters` are carried through untouched and
/// written ahead of it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewsletterDocument {
    extra: Map<String, Value>,
    newsletters: Vec<Value>,
}

impl NewsletterDocument {
    /// Read the document, or start an empty one if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, IngestError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No existing document, starting a new one");
            return Ok(Self::default());
        }

        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let root: Map<String, Value> = serde_json::from_slice(&bytes)
            .map_err(|e| IngestError::InvalidDocument(e.to_string()))?;

        let mut document = Self::default();
        for (key, value) in root {
            if key != NEWSLETTERS {
                document.extra.insert(key, value);
                continue;
            }
            match value {
                Value::Array(entries) => document.newsletters = entries,
                _ => {
                    return Err(IngestError::InvalidDocument(format!(
                        "`{}` is not an array",
                        NEWSLETTERS
                    )))
                }
            }
        }

        Ok(document)
    }

    pub fn save(&self, path: &Path) -> Result<(), IngestError> {
        let mut root = self.extra.clone();
        root.insert(
            NEWSLETTERS.to_string(),
            Value::Array(self.newsletters.clone()),
        );

        let mut bytes = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut bytes, PrettyFormatter::with_indent(b"    "));
        root.serialize(&mut serializer)
            .context("Failed to serialize the newsletter document")?;

        std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.newsletters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.newsletters.is_empty()
    }

    pub fn ids(&self) -> HashSet<String> {
        self.newsletters
            .iter()
            .filter_map(|entry| entry.get("id").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }

    pub fn push(&mut self, record: &NewsletterRecord) -> Result<(), IngestError> {
        let value = serde_json::to_value(record).context("Failed to serialize a newsletter")?;
        self.newsletters.push(value);
        Ok(())
    }

    /// Drop every entry whose id is listed. Returns how many were dropped.
    pub fn remove(&mut self, ids: &[String]) -> usize {
        let before = self.newsletters.len();
        self.newsletters.retain(|entry| {
            entry
                .get("id")
                .and_then(Value::as_str)
                .map_or(true, |id| !ids.iter().any(|removed| removed == id))
        });
        before - self.newsletters.len()
    }
}
