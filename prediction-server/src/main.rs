//! Gas Output Prediction Server
//!
//! Thin HTTP adapter over `gas-inference-core`.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                   PREDICTION SERVER                        │
//! ├────────────────────────────────────────────────────────────┤
//! │  POST /predict ─────────┐                                  │
//! │  POST /predict/batch ───┼──▶ spawn_blocking ──▶ Engine     │
//! │  POST /predict/batch/csv┘                      (Arc, r/o)  │
//! │  GET  /health ─────────────────────────────▶ EngineStatus  │
//! │                                                   │        │
//! │                              ┌────────────────────┴──┐     │
//! │                              │ ONNX regressor        │     │
//! │                              │ ONNX outlier detector │     │
//! │                              └───────────────────────┘     │
//! └────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod handlers;
mod error;
mod extract;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gas_inference_core::{BatchProcessor, Capabilities, PredictionEngine};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (core crate logs through `log`, bridged by tracing-log)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "gas_prediction_server=debug,gas_inference_core=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("Gas prediction server starting ({})...", config.environment);
    tracing::info!(
        "Rule bounds: waste {:?}, temperature {:?}, pressure {:?}",
        config.rules.plastic_waste_range,
        config.rules.temperature_range,
        config.rules.pressure_range
    );

    // Load models (missing models degrade, they do not stop the server)
    let capabilities = Capabilities::load(&config.models);
    if capabilities.regressor.is_none() && config.is_production() {
        tracing::warn!("Running in production without a regression model - /predict will return 503");
    }

    let state = AppState::new(capabilities, config.clone());
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<PredictionEngine>,
    pub batch: Arc<BatchProcessor>,
    pub config: config::Config,
}

impl AppState {
    pub fn new(capabilities: Capabilities, config: config::Config) -> Self {
        let engine = Arc::new(PredictionEngine::new(capabilities, config.rules.clone()));
        Self {
            batch: Arc::new(BatchProcessor::new(engine.clone())),
            engine,
            config,
        }
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .route("/predict/batch", post(handlers::batch::predict_json))
        .route("/predict/batch/csv", post(handlers::batch::predict_csv))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use gas_inference_core::{FeatureMatrix, InferenceError, OutlierDetector, Regressor};

    /// waste * 0.5 + pressure/temperature
    struct LinearRegressor;

    impl Regressor for LinearRegressor {
        fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>, InferenceError> {
            Ok(features.as_array().rows().into_iter().map(|r| r[0] * 0.5 + r[4]).collect())
        }
    }

    struct AlwaysInlier;

    impl OutlierDetector for AlwaysInlier {
        fn predict(&self, features: &FeatureMatrix) -> Result<Vec<i64>, InferenceError> {
            Ok(vec![1; features.nrows()])
        }
    }

    fn app() -> Router {
        let capabilities = Capabilities::new(Some(Arc::new(LinearRegressor)), Some(Arc::new(AlwaysInlier)));
        create_router(AppState::new(capabilities, config::Config::default()))
    }

    fn app_without_model() -> Router {
        create_router(AppState::new(Capabilities::default(), config::Config::default()))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn csv_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "text/csv")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_predict_ok() {
        let (status, body) = send(
            app(),
            json_post("/predict", r#"{"Plastic_Waste_Input_kg": 100, "Temperature_C": 300, "Pressure_kPa": 150}"#),
        ).await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["Predicted_Gas_Output_Liters"], 50.5);
        assert_eq!(json["Anomaly_Flag"], "No");
    }

    #[tokio::test]
    async fn test_predict_rule_anomaly() {
        let (status, body) = send(
            app(),
            json_post("/predict", r#"{"Plastic_Waste_Input_kg": 10, "Temperature_C": 300, "Pressure_kPa": 150}"#),
        ).await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["Anomaly_Flag"], "Yes");
    }

    #[tokio::test]
    async fn test_predict_missing_field_is_400() {
        let (status, body) = send(
            app(),
            json_post("/predict", r#"{"Plastic_Waste_Input_kg": 100, "Temperature_C": 300}"#),
        ).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "Missing input data: Pressure_kPa");
        assert_eq!(json["status"], 400);
    }

    #[tokio::test]
    async fn test_predict_zero_temperature_is_400() {
        let (status, _) = send(
            app(),
            json_post("/predict", r#"{"Plastic_Waste_Input_kg": 100, "Temperature_C": 0, "Pressure_kPa": 150}"#),
        ).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_predict_malformed_body_is_json_400() {
        for body in ["null", "[]", "{\"Plastic_Waste_Input_kg\": 100,"] {
            let (status, text) = send(app(), json_post("/predict", body)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
            let json: serde_json::Value = serde_json::from_str(&text).unwrap();
            assert_eq!(json["status"], 400);
            assert!(json["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_predict_without_content_type_is_json_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/predict")
            .body(Body::from(r#"{"Plastic_Waste_Input_kg": 100}"#))
            .unwrap();
        let (status, text) = send(app(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["status"], 400);
    }

    #[tokio::test]
    async fn test_predict_without_model_is_503() {
        let (status, body) = send(
            app_without_model(),
            json_post("/predict", r#"{"Plastic_Waste_Input_kg": 100, "Temperature_C": 300, "Pressure_kPa": 150}"#),
        ).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], 503);
    }

    #[tokio::test]
    async fn test_batch_json_partial_failure() {
        let csv = "Plastic_Waste_Input_kg,Temperature_C,Pressure_kPa\n100,300,150\n100,0,150\n";
        let (status, body) = send(app(), csv_post("/predict/batch", csv)).await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["total_rows"], 2);
        assert_eq!(json["failed_rows"], 1);
        assert_eq!(json["rows"][0]["row"], 0);
        assert_eq!(json["rows"][0]["Predicted_Gas_Output_Liters"], 50.5);
        assert_eq!(json["rows"][1]["row"], 1);
        assert!(json["rows"][1]["error"].as_str().unwrap().contains("division by zero"));
    }

    #[tokio::test]
    async fn test_batch_missing_columns_is_400() {
        let csv = "Plastic_Waste_Input_kg,Temperature_C\n100,300\n";
        let (status, body) = send(app(), csv_post("/predict/batch", csv)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Pressure_kPa"));
    }

    #[tokio::test]
    async fn test_batch_csv_response() {
        let csv = "Plastic_Waste_Input_kg,Temperature_C,Pressure_kPa\n100,300,150\n";
        let response = app().oneshot(csv_post("/predict/batch/csv", csv)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Predicted_Gas_Output_Liters,Anomaly_Flag"));
        assert_eq!(lines[1], "100,300,150,100,0.5,15000,50.5,No");
    }

    #[tokio::test]
    async fn test_health_reports_degraded_without_model() {
        let (status, body) = send(
            app_without_model(),
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        ).await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["engine"]["regressor_loaded"], false);
    }

    #[tokio::test]
    async fn test_health_ok() {
        let (_, body) = send(app(), Request::builder().uri("/health").body(Body::empty()).unwrap()).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["engine"]["outlier_detector_loaded"], true);
    }
}
