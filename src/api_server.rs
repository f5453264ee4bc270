//! Axum API Server Module
//!
//! Two POST endpoints compose the core pipeline: `/predict` (range
//! validation → classifier → response assembly) and `/chat` (normalization
//! → keyword matching → optional climate augmentation). All served state is
//! loaded once at startup and shared read-only behind `Arc`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use std::sync::Arc;

use crate::advice::WeatherReading;
use crate::classifier::{CropClassifier, Recommendation};
use crate::error::OutOfRangeError;
use crate::qa::QaCorpus;
use crate::ranges::FeatureRanges;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub ranges: Arc<FeatureRanges>,
    pub classifier: Arc<CropClassifier>,
    pub corpus: Arc<QaCorpus>,
}

impl AppState {
    /// Load all serving artifacts from `data_dir`.
    ///
    /// Runs synchronously before the listener binds; any failure here is
    /// fatal and the service must not start.
    pub fn new(data_dir: &str) -> anyhow::Result<Self> {
        tracing::info!("Loading ML model and data...");

        let classifier = Arc::new(CropClassifier::load(&format!(
            "{}/crop_model.json",
            data_dir
        ))?);
        tracing::info!(
            "Loaded classifier ({} crop classes)",
            classifier.classes().len()
        );

        let ranges = Arc::new(FeatureRanges::load(&format!(
            "{}/feature_ranges.json",
            data_dir
        ))?);
        tracing::info!("Loaded bounds for {} features", ranges.len());

        let corpus = Arc::new(QaCorpus::load(&format!(
            "{}/agricultural_qa.json",
            data_dir
        ))?);
        tracing::info!(
            "Loaded QA corpus ({} entries, {} fallbacks)",
            corpus.entries().len(),
            corpus.fallbacks().len()
        );

        Ok(Self {
            ranges,
            classifier,
            corpus,
        })
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Core endpoints
        .route("/predict", post(predict_crop))
        .route("/chat", post(chat))
        // Middleware (applied in reverse order)
        .layer(CorsLayer::permissive()) // Frontend is served from another origin
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn predict_crop(
    State(state): State<AppState>,
    Json(request): Json<PredictionInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    tracing::debug!("Prediction request: {:?}", request);

    // Field declaration order doubles as validation order: the first
    // out-of-range feature is the one reported.
    let fields = [
        ("N", request.n),
        ("P", request.p),
        ("K", request.k),
        ("temperature", request.temperature),
        ("humidity", request.humidity),
        ("ph", request.ph),
        ("rainfall", request.rainfall),
    ];
    state.ranges.validate(&fields).map_err(AppError::Validation)?;

    let features = [
        request.n,
        request.p,
        request.k,
        request.temperature,
        request.humidity,
        request.ph,
        request.rainfall,
    ];
    let recommendations = state
        .classifier
        .predict(&features)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let message = summary_message(&recommendations);
    tracing::debug!("Recommending {}", recommendations[0].crop);

    Ok(Json(serde_json::json!({
        "success": true,
        "recommendations": recommendations,
        "message": message,
    })))
}

/// Human-readable summary naming the top recommendation and both
/// runners-up with percentage-formatted confidences.
fn summary_message(recs: &[Recommendation]) -> String {
    format!(
        "Based on the soil and weather conditions, I recommend growing {} (confidence: {:.2}%). \
         Alternative options include {} ({:.2}%) and {} ({:.2}%).",
        recs[0].crop,
        recs[0].confidence * 100.0,
        recs[1].crop,
        recs[1].confidence * 100.0,
        recs[2].crop,
        recs[2].confidence * 100.0,
    )
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    tracing::debug!("Chat request: {:?}", request.message);

    let reply = state.corpus.answer(
        &request.message,
        request.weather.as_ref(),
        &mut rand::thread_rng(),
    );

    Ok(Json(serde_json::json!({ "message": reply })))
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, serde::Deserialize)]
struct PredictionInput {
    #[serde(rename = "N")]
    n: f64,
    #[serde(rename = "P")]
    p: f64,
    #[serde(rename = "K")]
    k: f64,
    temperature: f64,
    humidity: f64,
    ph: f64,
    rainfall: f64,
}

/// Caller's position. Accepted for forward compatibility; not yet used in
/// matching.
#[allow(dead_code)]
#[derive(Debug, serde::Deserialize)]
struct LocationInfo {
    latitude: f64,
    longitude: f64,
    name: String,
}

#[derive(Debug, serde::Deserialize)]
struct ChatRequest {
    message: String,
    #[allow(dead_code)]
    location: Option<LocationInfo>,
    weather: Option<WeatherReading>,
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    Validation(OutOfRangeError),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Validation(err) => {
                tracing::warn!("Rejected input: {}", err);
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    /// Router over the artifacts shipped under `data/`.
    fn test_app() -> Router {
        create_router(AppState::new("data").expect("serving artifacts under data/"))
    }

    async fn post_json(
        app: Router,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    fn paddy_field_input() -> serde_json::Value {
        serde_json::json!({
            "N": 90.0, "P": 42.0, "K": 43.0,
            "temperature": 23.8, "humidity": 85.0,
            "ph": 6.5, "rainfall": 220.0
        })
    }

    #[tokio::test]
    async fn predict_returns_three_sorted_recommendations() {
        let (status, body) = post_json(test_app(), "/predict", paddy_field_input()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let recs = body["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 3);
        let confidences: Vec<f64> = recs
            .iter()
            .map(|r| r["confidence"].as_f64().unwrap())
            .collect();
        assert!(confidences.windows(2).all(|w| w[0] >= w[1]));
        assert!(confidences.iter().all(|c| (0.0..=1.0).contains(c)));

        // High rainfall + high humidity paddy conditions favor rice.
        assert_eq!(recs[0]["crop"], "rice");
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("I recommend growing rice"));
        assert!(message.contains('%'));
    }

    #[tokio::test]
    async fn predict_is_idempotent() {
        let (_, first) = post_json(test_app(), "/predict", paddy_field_input()).await;
        let (_, second) = post_json(test_app(), "/predict", paddy_field_input()).await;
        assert_eq!(first["recommendations"], second["recommendations"]);
    }

    #[tokio::test]
    async fn out_of_range_feature_is_rejected_with_400() {
        let mut input = paddy_field_input();
        input["ph"] = serde_json::json!(12.0);
        let (status, body) = post_json(test_app(), "/predict", input).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error = body["error"].as_str().unwrap();
        assert!(error.contains("ph"));
        assert!(error.contains("12"));
        assert!(error.contains("outside the valid range"));
    }

    #[tokio::test]
    async fn first_out_of_range_feature_wins() {
        let mut input = paddy_field_input();
        input["N"] = serde_json::json!(-5.0);
        input["rainfall"] = serde_json::json!(5000.0);
        let (status, body) = post_json(test_app(), "/predict", input).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("N value"));
    }

    #[tokio::test]
    async fn chat_water_question_with_hot_weather_gains_advisory() {
        let (status, body) = post_json(
            test_app(),
            "/chat",
            serde_json::json!({
                "message": "How should I water my crops?",
                "weather": {
                    "temperature": 35.0, "humidity": 50.0,
                    "description": "sunny", "rainfall": 5.0
                }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("Water"));
        assert!(message.contains("Specific to your current conditions:"));
        assert!(message.contains("Due to high temperatures"));
    }

    #[tokio::test]
    async fn chat_unknown_message_returns_a_fallback() {
        let state = AppState::new("data").unwrap();
        let fallbacks: Vec<String> = state.corpus.fallbacks().to_vec();
        let app = create_router(state);

        let (status, body) =
            post_json(app, "/chat", serde_json::json!({ "message": "xyz123" })).await;

        assert_eq!(status, StatusCode::OK);
        let message = body["message"].as_str().unwrap();
        assert!(!message.is_empty());
        assert!(fallbacks.iter().any(|f| f == message));
    }

    #[tokio::test]
    async fn chat_accepts_location_without_using_it() {
        let (status, body) = post_json(
            test_app(),
            "/chat",
            serde_json::json!({
                "message": "when should I harvest?",
                "location": {
                    "latitude": 18.52, "longitude": 73.86, "name": "Pune"
                }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body["message"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
    }
}
