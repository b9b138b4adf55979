//! Batch prediction handlers
//!
//! Body is a CSV table with at least `Plastic_Waste_Input_kg`,
//! `Temperature_C`, `Pressure_kPa`. Row failures are reported inline.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use gas_inference_core::{BatchOutput, BatchTable, PipelineResult};

use crate::{AppState, AppResult, AppError};
use crate::models::BatchResponse;

async fn run_batch(state: &AppState, body: String) -> AppResult<(Uuid, BatchOutput)> {
    let batch_id = Uuid::new_v4();
    let processor = state.batch.clone();

    let output = tokio::task::spawn_blocking(move || -> PipelineResult<BatchOutput> {
        let table = BatchTable::from_csv_str(&body)?;
        processor.process_table(table)
    })
    .await??;

    tracing::info!(
        %batch_id,
        rows = output.len(),
        failed = output.failed_count(),
        "Batch prediction complete"
    );

    Ok((batch_id, output))
}

/// Batch prediction, JSON summary
pub async fn predict_json(
    State(state): State<AppState>,
    body: String,
) -> AppResult<Json<BatchResponse>> {
    let (batch_id, output) = run_batch(&state, body).await?;
    Ok(Json(BatchResponse::new(batch_id, &output)))
}

/// Batch prediction, annotated CSV
pub async fn predict_csv(
    State(state): State<AppState>,
    body: String,
) -> AppResult<impl IntoResponse> {
    let (batch_id, output) = run_batch(&state, body).await?;

    let csv = output.to_csv_string()
        .map_err(|e| AppError::InternalError(format!("CSV write failed: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"predictions-{}.csv\"", batch_id)),
        ],
        csv,
    ))
}
