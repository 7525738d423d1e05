//! Prediction Routes

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use data_validator::InputRecord;
use std::sync::Arc;
use tracing::debug;

use crate::service::Submission;
use crate::AppState;

/// Validate a JSON submission and run both models.
///
/// Each field may be a number, a string or null; any other value is reported
/// as an invalid number for that field.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Result<Json<InputRecord>, JsonRejection>,
) -> Submission {
    match body {
        Ok(Json(record)) => state.service.submit(&record),
        Err(rejection) => {
            debug!("Rejected request body: {}", rejection.body_text());
            Submission::rejected(rejection.status(), rejection.body_text())
        }
    }
}
