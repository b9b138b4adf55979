//! Prediction request/response shapes
//!
//! Field names follow the original service contract
//! (`Predicted_Gas_Output_Liters`, `Anomaly_Flag` as "Yes"/"No").

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gas_inference_core::{BatchOutput, BatchRow, PredictionResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(rename = "Predicted_Gas_Output_Liters")]
    pub predicted_gas_output_liters: f64,
    #[serde(rename = "Anomaly_Flag")]
    pub anomaly_flag: String,
}

impl From<PredictionResult> for PredictionResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            predicted_gas_output_liters: result.predicted_output,
            anomaly_flag: result.anomaly_flag().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchRowResponse {
    Ok {
        row: usize,
        #[serde(flatten)]
        prediction: PredictionResponse,
    },
    Failed {
        row: usize,
        error: String,
    },
}

impl From<&BatchRow> for BatchRowResponse {
    fn from(row: &BatchRow) -> Self {
        match &row.outcome {
            Ok(prediction) => BatchRowResponse::Ok {
                row: row.index,
                prediction: prediction.result.into(),
            },
            Err(e) => BatchRowResponse::Failed {
                row: row.index,
                error: e.source.to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub batch_id: Uuid,
    pub total_rows: usize,
    pub failed_rows: usize,
    pub rows: Vec<BatchRowResponse>,
}

impl BatchResponse {
    pub fn new(batch_id: Uuid, output: &BatchOutput) -> Self {
        Self {
            batch_id,
            total_rows: output.len(),
            failed_rows: output.failed_count(),
            rows: output.rows().iter().map(BatchRowResponse::from).collect(),
        }
    }
}
