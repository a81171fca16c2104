use crate::analyzer::{self, PredictionReport};
use crate::config::{AnalyzerConfig, ServerConfig};
use crate::error::{display_name, AnalysisError, OcrError};
use crate::extractor::TextExtractor;
use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Body limit headroom for multipart framing around the image
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<TextExtractor>,
    pub analyzer: Arc<AnalyzerConfig>,
    pub max_file_size: usize,
    /// Serializes handlers that touch the names and report files
    pub workspace: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(extractor: TextExtractor, analyzer: AnalyzerConfig, max_file_size: usize) -> Self {
        Self {
            extractor: Arc::new(extractor),
            analyzer: Arc::new(analyzer),
            max_file_size,
            workspace: Arc::new(Mutex::new(())),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub message: String,
    pub extracted_text: String,
    pub file: String,
    pub engine: String,
    pub confidence: Option<f32>,
    pub processing_time_ms: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub generated_text: String,
    pub reports: Vec<PredictionReport>,
    pub processing_time_ms: u64,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Server info response
#[derive(Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub engine: String,
    pub engine_description: String,
    pub supported_formats: Vec<String>,
    pub supported_languages: Vec<String>,
    pub max_file_size_bytes: usize,
    pub names_file: String,
    pub model_file: String,
    pub output_file: String,
}

/// Build the router for the given state
pub fn router(state: AppState) -> Router {
    let max_file_size = state.max_file_size;

    Router::new()
        .route("/analyze", post(handle_analyze))
        .route("/generate", get(handle_generate))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(max_file_size + MULTIPART_OVERHEAD)),
        )
        .with_state(state)
}

/// Run the HTTP server
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let extractor = TextExtractor::from_config(&config.ocr)?;
    let addr = format!("{}:{}", config.host, config.port);

    let app = router(AppState::new(extractor, config.analyzer, config.max_file_size));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Run OCR on an uploaded image and store the text as the names file
async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, OcrError> {
    let start = Instant::now();

    let mut image_data: Option<Bytes> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Failed to parse multipart", state.max_file_size))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "image" | "file" => {
                content_type = field.content_type().map(|s| s.to_string());
                image_data = Some(field.bytes().await.map_err(|e| {
                    multipart_error(e, "Failed to read image data", state.max_file_size)
                })?);
            }
            _ => {}
        }
    }

    let data = image_data.ok_or(OcrError::MissingFile)?;

    if data.len() > state.max_file_size {
        return Err(OcrError::ImageTooLarge {
            size: data.len(),
            max: state.max_file_size,
        });
    }

    // Extension is only a fallback; the decoder sniffs the content first
    let extension = match content_type.as_deref() {
        Some("image/png") => ".png",
        Some("image/jpeg") => ".jpg",
        Some("image/gif") => ".gif",
        Some("image/bmp") => ".bmp",
        Some("image/webp") => ".webp",
        Some("image/tiff") => ".tiff",
        other => {
            tracing::warn!("Received image with content type: {:?}", other);
            ".img"
        }
    };

    let mut temp_file = tempfile::Builder::new()
        .suffix(extension)
        .tempfile()
        .map_err(|e| OcrError::Internal(format!("Failed to create temp file: {}", e)))?;
    temp_file
        .write_all(&data)
        .map_err(|e| OcrError::Internal(format!("Failed to write temp file: {}", e)))?;

    let extractor = Arc::clone(&state.extractor);
    let extracted = tokio::task::spawn_blocking(move || {
        let result = extractor.extract(temp_file.path());
        drop(temp_file);
        result
    })
    .await
    .map_err(|e| OcrError::Internal(format!("OCR task failed: {}", e)))??;

    let text = extracted.text.trim().to_string();
    let names_path = state.analyzer.names_path.clone();

    {
        let _guard = state.workspace.lock().await;
        tokio::fs::write(&names_path, &text).await.map_err(|e| {
            OcrError::Internal(format!("Failed to write extracted text: {}", e))
        })?;
    }

    let processing_time_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "Extracted {} chars into {:?} in {}ms",
        text.len(),
        names_path,
        processing_time_ms
    );

    Ok(Json(AnalyzeResponse {
        message: "OCR completed successfully.".to_string(),
        extracted_text: text,
        file: display_name(&names_path),
        engine: extracted.engine.to_string(),
        confidence: extracted.confidence,
        processing_time_ms,
    }))
}

/// Run the analyzer over the stored names file
async fn handle_generate(
    State(state): State<AppState>,
) -> Result<Json<GenerateResponse>, AnalysisError> {
    let start = Instant::now();
    let _guard = state.workspace.lock().await;

    let config = Arc::clone(&state.analyzer);
    let summary = tokio::task::spawn_blocking(move || analyzer::run(&config))
        .await
        .map_err(|e| AnalysisError::Internal(format!("Analysis task failed: {}", e)))??;

    Ok(Json(GenerateResponse {
        generated_text: summary.rendered.trim().to_string(),
        reports: summary.reports,
        processing_time_ms: start.elapsed().as_millis() as u64,
    }))
}

async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn handle_info(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.extractor.engine();

    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine: engine.name().to_string(),
        engine_description: engine.description().to_string(),
        supported_formats: engine.supported_formats(),
        supported_languages: engine.supported_languages(),
        max_file_size_bytes: state.max_file_size,
        names_file: state.analyzer.names_path.display().to_string(),
        model_file: state.analyzer.model_path.display().to_string(),
        output_file: state.analyzer.output_path.display().to_string(),
    })
}

/// Body-limit rejections surface as 413 like an oversized image
fn multipart_error(e: MultipartError, context: &str, max_file_size: usize) -> OcrError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("{}: {}", context, e);
        return OcrError::PayloadTooLarge { max: max_file_size };
    }

    OcrError::InvalidRequest(format!("{}: {}", context, e))
}
