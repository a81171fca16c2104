use crate::error::OcrError;
use image::DynamicImage;

/// Raw engine output for one image
#[derive(Debug, Clone)]
pub struct OcrResult {
    pub text: String,
    /// Mean recognition confidence in 0.0..=1.0, when the engine reports one
    pub confidence: Option<f32>,
}

/// Trait that all OCR engines must implement
pub trait OcrEngine: Send + Sync {
    /// Returns the engine identifier (e.g., "ocrs", "leptess")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the engine
    fn description(&self) -> &'static str;

    /// Recognize the text in a decoded image
    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError>;

    /// Get supported MIME types
    fn supported_formats(&self) -> Vec<String> {
        [
            "image/png",
            "image/jpeg",
            "image/gif",
            "image/bmp",
            "image/webp",
            "image/tiff",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    /// Get supported languages
    fn supported_languages(&self) -> Vec<String>;
}
