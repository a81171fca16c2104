//! OCRS engine implementation
//!
//! Pure Rust OCR engine using the ocrs library. No system dependencies required.
//! Downloads neural network models automatically on first use.

use super::download;
use crate::config::OcrConfig;
use crate::engine::{OcrEngine, OcrResult};
use crate::error::OcrError;
use image::DynamicImage;
use ocrs::{DecodeMethod, ImageSource, OcrEngine as OcrsOcrEngine, OcrEngineParams};
use rten::Model;

/// Default model URLs from the ocrs project
const DETECTION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-detection.rten";
const RECOGNITION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-recognition.rten";

/// OCR Engine wrapping the ocrs library
pub struct OcrsEngine {
    engine: OcrsOcrEngine,
}

impl OcrsEngine {
    /// Load the detection and recognition models, downloading them if needed
    pub fn new(config: &OcrConfig) -> Result<Self, OcrError> {
        if config.language != "eng" {
            tracing::warn!(
                "ocrs only recognizes Latin script; ignoring language '{}'",
                config.language
            );
        }

        let cache = download::cache_dir(config.model_cache_dir.as_deref(), "")?;
        let detection_path =
            download::ensure_downloaded(DETECTION_MODEL_URL, &cache, "text-detection.rten")?;
        let recognition_path =
            download::ensure_downloaded(RECOGNITION_MODEL_URL, &cache, "text-recognition.rten")?;

        let detection_model = Model::load_file(&detection_path).map_err(|e| {
            OcrError::InitializationError(format!("Failed to load detection model: {}", e))
        })?;
        let recognition_model = Model::load_file(&recognition_path).map_err(|e| {
            OcrError::InitializationError(format!("Failed to load recognition model: {}", e))
        })?;

        let engine = OcrsOcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            decode_method: DecodeMethod::Greedy,
            ..Default::default()
        })
        .map_err(|e| {
            OcrError::InitializationError(format!("Failed to create OCR engine: {}", e))
        })?;

        tracing::info!("ocrs engine initialized (models: {:?})", cache);

        Ok(Self { engine })
    }
}

impl OcrEngine for OcrsEngine {
    fn name(&self) -> &'static str {
        "ocrs"
    }

    fn description(&self) -> &'static str {
        "Pure Rust OCR engine - fast, no system dependencies required"
    }

    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        // ocrs reads packed RGB in HWC order
        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height))
            .map_err(|e| OcrError::ProcessingError(format!("Invalid image buffer: {}", e)))?;
        let input = self
            .engine
            .prepare_input(source)
            .map_err(|e| OcrError::ProcessingError(format!("Failed to prepare input: {}", e)))?;

        // Detected lines are joined with newlines, words with single spaces
        let text = self
            .engine
            .get_text(&input)
            .map_err(|e| OcrError::ProcessingError(format!("Text recognition failed: {}", e)))?;

        tracing::debug!(
            "ocrs read {} lines from {}x{} image",
            text.lines().count(),
            width,
            height
        );

        Ok(OcrResult {
            text,
            confidence: None,
        })
    }

    fn supported_languages(&self) -> Vec<String> {
        vec!["eng".to_string()]
    }
}
