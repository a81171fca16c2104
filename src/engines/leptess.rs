//! Tesseract engine implementation
//!
//! Uses tesseract-static for static linking (no system dependencies).
//! Language data comes from an explicit tessdata directory, or is downloaded
//! into the cache on first use.

use super::download;
use crate::config::OcrConfig;
use crate::engine::{OcrEngine, OcrResult};
use crate::error::OcrError;
use image::DynamicImage;
use std::path::Path;
use tesseract_static::tesseract::Tesseract;

/// Tesseract OCR Engine
pub struct LeptessEngine {
    tessdata_path: String,
    language: String,
}

impl LeptessEngine {
    pub fn new(config: &OcrConfig) -> Result<Self, OcrError> {
        let language = config.language.clone();

        let tessdata_dir = match &config.tessdata_path {
            Some(dir) => dir.clone(),
            None => ensure_tessdata_available(config.model_cache_dir.as_deref(), &language)?,
        };
        let tessdata_path = tessdata_dir
            .to_str()
            .map(|s| s.to_string())
            .ok_or_else(|| OcrError::InitializationError("Invalid tessdata path".to_string()))?;

        // Fail at startup rather than on the first image when tessdata is unusable
        Tesseract::new(Some(&tessdata_path), Some(&language)).map_err(|e| {
            OcrError::InitializationError(format!("Failed to initialize Tesseract: {}", e))
        })?;

        tracing::info!(
            "Tesseract engine initialized (tessdata: {}, language: {})",
            tessdata_path,
            language
        );

        Ok(Self {
            tessdata_path,
            language,
        })
    }
}

impl OcrEngine for LeptessEngine {
    fn name(&self) -> &'static str {
        "leptess"
    }

    fn description(&self) -> &'static str {
        "Tesseract OCR engine - better for noisy/messy images like phone photos"
    }

    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
        let rgb_img = image.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        // Leptonica always reads BMP, whatever the source format was
        let mut bmp_data = Vec::new();
        rgb_img
            .write_to(&mut std::io::Cursor::new(&mut bmp_data), image::ImageFormat::Bmp)
            .map_err(|e| OcrError::ProcessingError(format!("Failed to convert to BMP: {}", e)))?;

        tracing::debug!(
            "Processing image: {}x{}, BMP size: {} bytes",
            width,
            height,
            bmp_data.len()
        );

        let mut tess = Tesseract::new(Some(&self.tessdata_path), Some(&self.language))
            .map_err(|e| OcrError::ProcessingError(format!("Failed to create Tesseract: {}", e)))?
            .set_image_from_mem(&bmp_data)
            .map_err(|e| OcrError::ProcessingError(format!("Failed to set image: {}", e)))?
            .recognize()
            .map_err(|e| OcrError::ProcessingError(format!("Failed to recognize text: {}", e)))?;

        let text = tess
            .get_text()
            .map_err(|e| OcrError::ProcessingError(format!("Failed to get text: {}", e)))?;

        // mean_text_conf is 0-100
        let confidence = tess.mean_text_conf() as f32 / 100.0;

        Ok(OcrResult {
            text,
            confidence: Some(confidence),
        })
    }

    fn supported_languages(&self) -> Vec<String> {
        vec![self.language.clone()]
    }
}

/// Ensure `{language}.traineddata` is cached and return the tessdata directory
fn ensure_tessdata_available(
    cache_root: Option<&Path>,
    language: &str,
) -> Result<std::path::PathBuf, OcrError> {
    let dir = download::cache_dir(cache_root, "tessdata")?;
    download::ensure_downloaded(
        &tessdata_url(language),
        &dir,
        &format!("{}.traineddata", language),
    )?;
    Ok(dir)
}

/// tessdata_fast keeps downloads small
fn tessdata_url(language: &str) -> String {
    format!(
        "https://github.com/tesseract-ocr/tessdata_fast/raw/main/{}.traineddata",
        language
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tessdata_url() {
        assert_eq!(
            tessdata_url("deu"),
            "https://github.com/tesseract-ocr/tessdata_fast/raw/main/deu.traineddata"
        );
    }
}
