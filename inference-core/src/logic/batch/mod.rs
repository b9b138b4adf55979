//! Batch Module - Row-wise prediction over tabular input
//!
//! Best effort per row, reject on structural defects:
//! - missing model or missing required columns fail the whole batch up front
//! - anything wrong with a single row is recorded on that row only

pub mod table;

use std::sync::Arc;

use serde::Serialize;

use super::engine::{PredictionEngine, PredictionResult};
use super::error::{PipelineResult, PredictionError, RowComputationError};
use super::features::{FeatureDeriver, FeatureVector, RawInput, RawRecord};

pub use table::{BatchOutput, BatchTable};

/// Successful row: the engineered features and the prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RowPrediction {
    pub features: FeatureVector,
    pub result: PredictionResult,
}

/// Outcome for input row `index`
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    pub index: usize,
    pub outcome: Result<RowPrediction, RowComputationError>,
}

pub struct BatchProcessor {
    engine: Arc<PredictionEngine>,
}

impl BatchProcessor {
    pub fn new(engine: Arc<PredictionEngine>) -> Self {
        Self { engine }
    }

    /// Process a parsed CSV table; columns are checked once before any row
    pub fn process_table(&self, table: BatchTable) -> PipelineResult<BatchOutput> {
        self.engine.regressor()?;
        log::debug!("Batch table: {} rows", table.len());
        let records = table.raw_records()?;
        let rows = self.process_batch(&records)?;
        Ok(BatchOutput::new(table, rows))
    }

    /// Output has the same length and order as `records`
    pub fn process_batch(&self, records: &[RawRecord]) -> PipelineResult<Vec<BatchRow>> {
        self.engine.regressor()?;

        // Stage 1: per-row validation and feature derivation
        let prepared: Vec<Result<(RawInput, FeatureVector), RowComputationError>> = records.iter()
            .enumerate()
            .map(|(row, record)| {
                let raw = record.validate().map_err(|source| RowComputationError { row, source })?;
                let features = FeatureDeriver::derive(&raw)
                    .map_err(|e| RowComputationError { row, source: e.into() })?;
                Ok((raw, features))
            })
            .collect();

        // Stage 2: one vectorised model pass over every derivable row
        let valid: Vec<(RawInput, FeatureVector)> = prepared.iter()
            .filter_map(|p| p.as_ref().ok().copied())
            .collect();

        let mut predictions = match self.engine.predict_features(&valid) {
            Ok(results) => results.into_iter().map(Ok).collect::<Vec<_>>(),
            Err(e) => {
                log::warn!("Vectorised batch pass failed ({}), retrying row by row", e);
                valid.iter()
                    .map(|(raw, _)| self.engine.predict_input(raw))
                    .collect()
            }
        }
        .into_iter();

        // Stage 3: stitch back into input order
        let rows: Vec<BatchRow> = prepared.into_iter()
            .enumerate()
            .map(|(index, prepared)| {
                let outcome = prepared.and_then(|(_, features)| {
                    let result = predictions.next()
                        .unwrap_or_else(|| Err(PredictionError::Inference("missing batch result".to_string())))
                        .map_err(|source| RowComputationError { row: index, source })?;
                    Ok(RowPrediction { features, result })
                });

                if let Err(e) = &outcome {
                    log::debug!("Batch {}", e);
                }
                BatchRow { index, outcome }
            })
            .collect();

        let failed = rows.iter().filter(|r| r.outcome.is_err()).count();
        log::info!("Batch processed: {} rows, {} failed", rows.len(), failed);

        Ok(rows)
    }
}
