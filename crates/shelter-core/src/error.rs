//! Error types for the shelter outcome pipeline

/// Result type alias using the pipeline's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for store, feature, training and inference operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A write was requested without any data to write
    #[error("nothing to save: {0}")]
    EmptyInput(String),

    /// A query that must return records returned none
    #[error("no data: {0}")]
    NoData(String),

    /// A single record could not be turned into features
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The loaded model rejected the constructed input
    #[error("inference failed: {0}")]
    Inference(String),

    /// Document store failures
    #[error("store error: {0}")]
    Store(String),

    /// Malformed query documents
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Model fitting failures
    #[error("training error: {0}")]
    Training(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new empty-input error
    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    /// Create a new no-data error
    pub fn no_data(msg: impl Into<String>) -> Self {
        Self::NoData(msg.into())
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a new filter error
    pub fn invalid_filter(msg: impl Into<String>) -> Self {
        Self::InvalidFilter(msg.into())
    }

    /// Create a new training error
    pub fn training(msg: impl Into<String>) -> Self {
        Self::Training(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Why a record could not be turned into a feature vector
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// Required field absent or null
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// Field present with the wrong JSON type
    #[error("field `{field}` must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    /// Timestamp in none of the accepted formats
    #[error("unparsable timestamp in `{field}`: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },

    /// Value that does not coerce to a finite number
    #[error("non-numeric value in `{field}`: {value}")]
    InvalidNumber { field: &'static str, value: String },

    /// Month outside 1..=12
    #[error("month out of range: {0}")]
    InvalidMonth(i64),
}
