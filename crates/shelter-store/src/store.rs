//! Document store trait and the in-memory backend

use crate::filter::Filter;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use shelter_core::{Document, Result, ID_FIELD};

/// Trait for collections of schemaless documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert one document, assigning an identity if it has none
    async fn insert_one(&self, document: Document) -> Result<InsertOutcome>;

    /// Return every document matching the filter, identity included
    async fn find(&self, filter: &Filter) -> Result<Vec<Document>>;

    /// Get the backend name
    fn name(&self) -> &str;
}

/// Result of a single insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Whether the backend confirmed the write
    pub acknowledged: bool,

    /// Identity of the inserted document
    pub inserted_id: String,
}

impl InsertOutcome {
    /// Outcome for a confirmed write
    pub fn acknowledged(inserted_id: impl Into<String>) -> Self {
        Self {
            acknowledged: true,
            inserted_id: inserted_id.into(),
        }
    }
}

/// Ensure the document carries an identity and return it
pub(crate) fn assign_id(document: &mut Document) -> String {
    match document.get(ID_FIELD) {
        Some(Value::String(id)) => id.clone(),
        Some(other) => other.to_string(),
        None => {
            let id = uuid::Uuid::new_v4().to_string();
            document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            id
        }
    }
}

/// Collection held in process memory
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<Document>>,
}

impl MemoryStore {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// True when nothing has been stored
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, mut document: Document) -> Result<InsertOutcome> {
        let id = assign_id(&mut document);
        self.documents.write().push(document);
        Ok(InsertOutcome::acknowledged(id))
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<Document>> {
        let documents = self.documents.read();
        Ok(documents
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_assigns_identity() {
        let store = MemoryStore::new();
        let doc = json!({"name": "Rex"}).as_object().cloned().unwrap();

        let outcome = store.insert_one(doc).await.unwrap();
        assert!(outcome.acknowledged);
        assert_eq!(store.len(), 1);

        let stored = store.find(&Filter::all()).await.unwrap();
        assert_eq!(stored[0][ID_FIELD], json!(outcome.inserted_id));
    }

    #[tokio::test]
    async fn test_existing_identity_is_kept() {
        let store = MemoryStore::new();
        let doc = json!({"_id": "A123", "name": "Rex"}).as_object().cloned().unwrap();

        let outcome = store.insert_one(doc).await.unwrap();
        assert_eq!(outcome.inserted_id, "A123");
    }
}
