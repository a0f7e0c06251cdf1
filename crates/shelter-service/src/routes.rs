//! HTTP routes and handlers

use axum::{
    extract::{Query, State},
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use shelter_core::Document;
use shelter_features::{extract_features, AdoptionRequest, FeatureVector};
use shelter_store::{BreedCount, BreedPieMode, RescueType};
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{debug, warn};

use crate::error::ServiceError;
use crate::state::AppState;

/// Probability returned when no model is loaded
pub const DEFAULT_PROBABILITY: f64 = 0.5;

const MODEL_NOT_LOADED: &str = "Model not loaded; returning default probability.";

pub fn create_router(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(RequestBodyLimitLayer::new(state.config.max_body_bytes))
        .layer(cors_layer(&state.config.cors_origins));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/predict/adoption", post(predict_adoption))
        .route("/predict/adoption/raw", post(predict_adoption_raw))
        .route("/api/animals", get(animals))
        .route("/api/breeds/pie", get(breed_pie))
        .fallback(fallback)
        .layer(middleware)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| warn!("Ignoring invalid CORS origin {:?}", origin))
                .ok()
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_fingerprint: Option<String>,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model_loaded: state.model_loaded(),
        model_fingerprint: state.model.as_ref().map(|m| m.fingerprint.clone()),
    })
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics_handle {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::NOT_FOUND,
            "metrics recorder not installed".to_string(),
        ),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub adoption_probability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PredictionResponse {
    fn default_probability() -> Self {
        Self {
            adoption_probability: DEFAULT_PROBABILITY,
            note: Some(MODEL_NOT_LOADED.to_string()),
        }
    }
}

/// Score a request built from already-derived features
async fn predict_adoption(
    State(state): State<AppState>,
    Json(req): Json<AdoptionRequest>,
) -> Result<Json<PredictionResponse>, ServiceError> {
    if !state.model_loaded() {
        return Ok(Json(PredictionResponse::default_probability()));
    }

    let row = FeatureVector::from_request(&req).map_err(|e| record_error("adoption", e))?;
    score(&state, &row, "adoption").map(Json)
}

/// Score a raw shelter record, deriving features server-side
async fn predict_adoption_raw(
    State(state): State<AppState>,
    Json(record): Json<Document>,
) -> Result<Json<PredictionResponse>, ServiceError> {
    if !state.model_loaded() {
        return Ok(Json(PredictionResponse::default_probability()));
    }

    let row = extract_features(&record).map_err(|e| record_error("raw", e))?;
    score(&state, &row, "raw").map(Json)
}

fn score(
    state: &AppState,
    row: &FeatureVector,
    endpoint: &'static str,
) -> Result<PredictionResponse, ServiceError> {
    let Some(model) = &state.model else {
        return Ok(PredictionResponse::default_probability());
    };

    let start = Instant::now();
    let proba = model
        .pipeline
        .predict_proba(row)
        .map_err(|e| record_error(endpoint, e))?;
    let latency_us = start.elapsed().as_micros() as f64;

    metrics::counter!("shelter_predictions_total", "endpoint" => endpoint).increment(1);
    metrics::histogram!("shelter_inference_latency_us").record(latency_us);
    debug!("Scored {:?}: {:.4} in {}us", row, proba, latency_us);

    Ok(PredictionResponse {
        adoption_probability: proba,
        note: None,
    })
}

fn record_error(endpoint: &'static str, err: impl Into<ServiceError>) -> ServiceError {
    let err = err.into();
    let kind = if err.status().is_client_error() {
        "invalid_input"
    } else {
        "inference"
    };
    metrics::counter!("shelter_prediction_errors_total", "endpoint" => endpoint, "kind" => kind)
        .increment(1);
    err
}

#[derive(Debug, Deserialize)]
struct AnimalsQuery {
    #[serde(rename = "rescueType")]
    rescue_type: Option<String>,
}

/// Animals matching a rescue profile
async fn animals(
    State(state): State<AppState>,
    Query(query): Query<AnimalsQuery>,
) -> Result<Json<Vec<Document>>, ServiceError> {
    let shelter = state.shelter.as_ref().ok_or(ServiceError::StoreUnavailable)?;

    let rescue = query
        .rescue_type
        .as_deref()
        .map(|name| name.parse().unwrap_or(RescueType::All))
        .unwrap_or(RescueType::All);

    Ok(Json(shelter.read_rescue(rescue).await?))
}

#[derive(Debug, Deserialize)]
struct BreedPieQuery {
    mode: Option<String>,
    #[serde(rename = "topN")]
    top_n: Option<usize>,
}

/// Breed frequencies, either all of them or the top N plus "Other"
async fn breed_pie(
    State(state): State<AppState>,
    Query(query): Query<BreedPieQuery>,
) -> Result<Json<Vec<BreedCount>>, ServiceError> {
    let shelter = state.shelter.as_ref().ok_or(ServiceError::StoreUnavailable)?;

    let mode = match query.mode.as_deref() {
        Some(mode) if mode.eq_ignore_ascii_case("all") => BreedPieMode::All,
        _ => query.top_n.map(BreedPieMode::Top).unwrap_or_default(),
    };

    Ok(Json(shelter.breed_counts(mode).await?))
}

async fn fallback() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" })))
}
