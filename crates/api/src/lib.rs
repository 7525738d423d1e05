//! Machine Failure Prediction Server
//!
//! HTML form and JSON API in front of the reading validator and the
//! two-stage failure predictor.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use data_validator::Validator;
use inference_engine::{FailurePredictor, ModelBackend};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
pub mod error;
pub mod rate_limit;
mod routes;
pub mod service;

pub use config::AppConfig;
pub use error::ServerError;
pub use service::{PredictionService, Submission};

use config::LoggingConfig;
use rate_limit::{create_governor_config, DefaultGovernorConfig};

/// Application state shared across handlers. Read-only after startup.
pub struct AppState {
    /// Validation and inference pipeline
    pub service: PredictionService,
    /// Backend the models were loaded with
    pub backend: ModelBackend,
    /// Prometheus exporter, when installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(service: PredictionService, backend: ModelBackend) -> Self {
        Self {
            service,
            backend,
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Load the models and validator described by the config
    pub fn from_config(config: &AppConfig) -> Result<Self, ServerError> {
        let predictor = FailurePredictor::from_config(&config.models)?;
        let validator = Validator::new(config.validation.clone());
        Ok(Self::new(
            PredictionService::new(validator, predictor),
            config.models.backend,
        ))
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub models: ModelStatus,
}

/// Loaded model details
#[derive(Debug, Serialize)]
pub struct ModelStatus {
    pub backend: String,
    pub failure_model: String,
    pub failure_type_model: String,
}

/// Create the application router.
///
/// When a governor config is given, the two prediction endpoints are rate
/// limited per client IP.
pub fn create_router(
    state: Arc<AppState>,
    rate_limit: Option<Arc<DefaultGovernorConfig>>,
) -> Router {
    let mut predict = Router::new()
        .route("/predict", post(routes::form::submit))
        .route("/api/v1/predict", post(routes::predictions::predict));
    if let Some(config) = rate_limit {
        predict = predict.layer(GovernorLayer { config });
    }

    Router::new()
        .route("/", get(routes::form::index))
        .route("/api/v1/reference", get(routes::reference::get_reference))
        .route("/api/v1/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .merge(predict)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let (failure_model, failure_type_model) = state.service.predictor().model_names();

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        models: ModelStatus {
            backend: state.backend.as_str().to_string(),
            failure_model: failure_model.to_string(),
            failure_type_model: failure_type_model.to_string(),
        },
    })
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> Result<(), ServerError> {
    let level: Level = config
        .level
        .parse()
        .map_err(|_| ServerError::Logging(format!("unknown level {:?}", config.level)))?;
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let result = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.map_err(|e| ServerError::Logging(e.to_string()))
}

/// Run the server until it stops
pub async fn run_server(config: &AppConfig) -> Result<(), ServerError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Metrics(e.to_string()))?;
    let state = Arc::new(AppState::from_config(config)?.with_metrics(handle));

    let rate_limit = if config.rate_limit.enabled {
        Some(create_governor_config(&config.rate_limit)?)
    } else {
        None
    };
    let app = create_router(state, rate_limit);

    info!("Starting API server on {}", config.server.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr.as_str()).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
