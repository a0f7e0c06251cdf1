//! Bulk loading of outcome records into the store

use serde::Serialize;
use serde_json::Value;
use shelter_core::{Document, Error, Result};
use shelter_store::AnimalShelter;
use std::path::Path;
use tracing::{debug, info, warn};

/// Counts from one import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub acknowledged: usize,
    pub unacknowledged: usize,

    /// Empty objects the adapter refused
    pub rejected: usize,
}

/// Parse a file holding either a JSON array of objects or one object per line
pub fn read_documents(path: impl AsRef<Path>) -> Result<Vec<Document>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_documents(&content)
}

/// Parse records from text; see [`read_documents`]
pub fn parse_documents(content: &str) -> Result<Vec<Document>> {
    if content.trim_start().starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(content)?;
        return values
            .into_iter()
            .enumerate()
            .map(|(i, value)| into_document(value, i + 1))
            .collect();
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| into_document(serde_json::from_str(line)?, i + 1))
        .collect()
}

/// Insert every document through the adapter
pub async fn import_documents(
    shelter: &AnimalShelter,
    documents: Vec<Document>,
) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    for document in documents {
        match shelter.create(document).await {
            Ok(true) => summary.acknowledged += 1,
            Ok(false) => summary.unacknowledged += 1,
            Err(Error::EmptyInput(e)) => {
                debug!("Skipping record: {}", e);
                summary.rejected += 1;
            }
            Err(e) => return Err(e),
        }
    }

    if summary.unacknowledged > 0 {
        warn!("{} inserts were not acknowledged", summary.unacknowledged);
    }
    info!(
        "Imported {} records ({} rejected)",
        summary.acknowledged, summary.rejected
    );
    Ok(summary)
}

fn into_document(value: Value, position: usize) -> Result<Document> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::config(format!(
            "record {} is not a JSON object: {}",
            position, other
        ))),
    }
}
