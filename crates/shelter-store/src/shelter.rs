//! Create/read adapter over the animal outcome collection

use crate::config::StoreConfig;
use crate::filter::Filter;
use crate::rescue::{breed_counts, BreedCount, BreedPieMode, RescueType};
use crate::store::DocumentStore;
use shelter_core::{fields, Document, Error, Result, ID_FIELD};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// CRUD access (create and read only) to the animals collection
#[derive(Clone)]
pub struct AnimalShelter {
    store: Arc<dyn DocumentStore>,
}

impl AnimalShelter {
    /// Wrap an already opened store
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Open the store described by `config`
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let store = config.open()?;
        info!(
            "Record store ready: backend={} database={} collection={}",
            store.name(),
            config.database,
            config.collection
        );
        Ok(Self::new(store))
    }

    /// Insert a document.
    ///
    /// Fails with [`Error::EmptyInput`] when there is nothing to save. An
    /// unacknowledged write is reported as `Ok(false)`, not as an error.
    pub async fn create(&self, document: impl Into<Option<Document>>) -> Result<bool> {
        let document = match document.into() {
            Some(doc) if !doc.is_empty() => doc,
            _ => return Err(Error::empty_input("document parameter is empty")),
        };

        let outcome = self.store.insert_one(document).await?;
        if outcome.acknowledged {
            debug!("Inserted document {}", outcome.inserted_id);
        } else {
            warn!("Insert of {} was not acknowledged", outcome.inserted_id);
        }

        Ok(outcome.acknowledged)
    }

    /// Read documents matching `query`, or every document when the query is
    /// absent or empty. The identity field is stripped from the results.
    pub async fn read(&self, query: Option<&Document>) -> Result<Vec<Document>> {
        let filter = match query {
            Some(q) if !q.is_empty() => Filter::parse(q)?,
            _ => Filter::all(),
        };
        self.read_filter(&filter).await
    }

    /// Read documents matching an already parsed filter
    pub async fn read_filter(&self, filter: &Filter) -> Result<Vec<Document>> {
        let mut documents = self.store.find(filter).await?;
        for doc in &mut documents {
            doc.remove(ID_FIELD);
        }
        Ok(documents)
    }

    /// Records eligible for training: all six outcome fields present
    pub async fn read_training_records(&self) -> Result<Vec<Document>> {
        self.read_filter(&Filter::not_null(fields::TRAINING_REQUIRED)).await
    }

    /// Animals matching a rescue profile
    pub async fn read_rescue(&self, rescue: RescueType) -> Result<Vec<Document>> {
        self.read(Some(&rescue.query())).await
    }

    /// Breed frequencies across the collection
    pub async fn breed_counts(&self, mode: BreedPieMode) -> Result<Vec<BreedCount>> {
        let documents = self.read_filter(&Filter::not_null([fields::BREED])).await?;
        Ok(breed_counts(&documents, mode))
    }
}
