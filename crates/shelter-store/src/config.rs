//! Store configuration

use crate::jsonl::JsonlStore;
use crate::store::{DocumentStore, MemoryStore};
use serde::{Deserialize, Serialize};
use shelter_core::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Connection settings for the record store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Storage backend
    #[serde(default)]
    pub backend: StoreBackend,

    /// Root directory for file-backed collections
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Database name
    #[serde(default = "default_database")]
    pub database: String,

    /// Collection name
    #[serde(default = "default_collection")]
    pub collection: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local collection, lost on exit
    Memory,
    /// One JSON document per line on disk
    #[default]
    Jsonl,
}

impl StoreConfig {
    /// Path of the collection file for file-backed stores
    pub fn collection_path(&self) -> PathBuf {
        self.data_dir
            .join(&self.database)
            .join(format!("{}.jsonl", self.collection))
    }

    /// Open the configured backend
    pub fn open(&self) -> Result<Arc<dyn DocumentStore>> {
        Ok(match self.backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::Jsonl => Arc::new(JsonlStore::open(self.collection_path())?),
        })
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            data_dir: default_data_dir(),
            database: default_database(),
            collection: default_collection(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_database() -> String {
    "AAC".to_string()
}

fn default_collection() -> String {
    "animals".to_string()
}
