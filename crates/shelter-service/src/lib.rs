//! Shelter Service
//!
//! HTTP front end for the trained adoption pipeline. Serves probabilities
//! from a loaded artifact, degrades to a fixed 0.5 when none is available,
//! and optionally exposes the dashboard queries over the record store.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use routes::{create_router, HealthResponse, PredictionResponse, DEFAULT_PROBABILITY};
pub use state::{load_model, AppState, LoadedModel};
