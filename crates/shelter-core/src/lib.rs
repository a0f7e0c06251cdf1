//! Shelter Core
//!
//! Types and error handling shared by the store adapter, the feature
//! pipeline, the training job and the prediction service.

pub mod error;
pub mod types;

pub use error::{Error, ParseError, Result};
pub use types::{fields, is_missing, Document, ADOPTION_OUTCOME, ID_FIELD};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, ParseError, Result};
    pub use crate::types::{fields, Document, ID_FIELD};
}
