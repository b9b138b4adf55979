//! Pipeline error taxonomy

use thiserror::Error;

use super::features::FeatureError;

pub type PipelineResult<T> = Result<T, PredictionError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    /// One or more raw inputs absent or null
    #[error("Missing input data: {}", .0.join(", "))]
    MissingField(Vec<String>),

    /// Non-numeric input, or input that breaks feature derivation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Batch table lacks required columns
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Regression model was never loaded
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// A loaded model failed while running
    #[error("Inference failed: {0}")]
    Inference(String),
}

impl PredictionError {
    /// Caller's fault (bad request) vs. server fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_) | Self::InvalidInput(_) | Self::MissingColumns(_)
        )
    }
}

impl From<FeatureError> for PredictionError {
    fn from(err: FeatureError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

/// Failure of a single batch row; never aborts the batch
#[derive(Debug, Clone, PartialEq, Error)]
#[error("row {row}: {source}")]
pub struct RowComputationError {
    pub row: usize,
    pub source: PredictionError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(PredictionError::MissingField(vec!["Temperature_C".into()]).is_client_error());
        assert!(PredictionError::InvalidInput("x".into()).is_client_error());
        assert!(PredictionError::MissingColumns(vec![]).is_client_error());
        assert!(!PredictionError::ModelUnavailable("x".into()).is_client_error());
        assert!(!PredictionError::Inference("x".into()).is_client_error());
    }

    #[test]
    fn test_messages() {
        let err = PredictionError::MissingField(vec!["Temperature_C".into(), "Pressure_kPa".into()]);
        assert_eq!(err.to_string(), "Missing input data: Temperature_C, Pressure_kPa");

        let row = RowComputationError {
            row: 3,
            source: FeatureError::DivisionByZero.into(),
        };
        assert_eq!(row.to_string(), "row 3: Invalid input: division by zero: Temperature_C is 0");
    }
}
