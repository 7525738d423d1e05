//! Reference Table Routes

use axum::Json;
use inference_engine::{reference_tables, ReferenceTables};

/// Failure type abbreviations and machine type descriptions
pub async fn get_reference() -> Json<ReferenceTables> {
    Json(reference_tables())
}
