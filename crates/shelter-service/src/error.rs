//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shelter_core::{Error, ParseError};
use tracing::{error, warn};

/// Errors a handler can return
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] Error),

    /// Dashboard endpoint called without a configured store
    #[error("record store is not configured")]
    StoreUnavailable,
}

impl From<ParseError> for ServiceError {
    fn from(err: ParseError) -> Self {
        Self::Core(Error::Parse(err))
    }
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Core(Error::Parse(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServiceError::from(ParseError::InvalidMonth(13)).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServiceError::from(Error::inference("bad row")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::from(Error::store("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::StoreUnavailable.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
