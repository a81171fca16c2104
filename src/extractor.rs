//! Image -> text extraction on top of a pluggable OCR engine

use crate::config::OcrConfig;
use crate::engine::OcrEngine;
use crate::engines;
use crate::error::OcrError;
use image::ImageReader;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Text recognized in one image
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedText {
    pub text: String,
    pub confidence: Option<f32>,
    pub engine: &'static str,
}

/// Runs OCR over image files
#[derive(Clone)]
pub struct TextExtractor {
    engine: Arc<dyn OcrEngine>,
}

impl TextExtractor {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self { engine }
    }

    /// Build an extractor around the engine named in `config`
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        Ok(Self::new(engines::create(config)?))
    }

    pub fn engine(&self) -> &dyn OcrEngine {
        self.engine.as_ref()
    }

    /// Decode the image at `path` and recognize its text
    pub fn extract(&self, path: &Path) -> Result<ExtractedText, OcrError> {
        let start = Instant::now();

        if !path.is_file() {
            return Err(OcrError::ImageNotFound(path.to_path_buf()));
        }

        let decode_error = |reason: String| OcrError::ImageDecode {
            path: path.to_path_buf(),
            reason,
        };
        let image = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| decode_error(e.to_string()))?
            .decode()
            .map_err(|e| decode_error(e.to_string()))?;

        let result = self.engine.recognize(&image)?;

        tracing::info!(
            "OCR of {:?} with {} completed in {}ms, text length: {}",
            path,
            self.engine.name(),
            start.elapsed().as_millis(),
            result.text.len()
        );

        Ok(ExtractedText {
            text: result.text,
            confidence: result.confidence,
            engine: self.engine.name(),
        })
    }
}
