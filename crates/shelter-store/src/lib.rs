//! Shelter Store
//!
//! Create/read access to the animal outcome collection.
//!
//! This crate provides:
//! - The `DocumentStore` trait with in-memory and JSON-lines backends
//! - Mongo-style query documents (`Filter`)
//! - The `AnimalShelter` adapter used by training and the dashboard API
//! - Rescue-profile queries and breed statistics

pub mod config;
pub mod filter;
pub mod jsonl;
pub mod rescue;
pub mod shelter;
pub mod store;

pub use config::{StoreBackend, StoreConfig};
pub use filter::Filter;
pub use jsonl::JsonlStore;
pub use rescue::{breed_counts, BreedCount, BreedPieMode, RescueType};
pub use shelter::AnimalShelter;
pub use store::{DocumentStore, InsertOutcome, MemoryStore};
