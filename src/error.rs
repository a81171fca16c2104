use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Failed to initialize OCR engine: {0}")]
    InitializationError(String),

    #[error("Unknown OCR engine '{name}' (available: {available})")]
    UnknownEngine { name: String, available: String },

    #[error("No such image file: {}", .0.display())]
    ImageNotFound(PathBuf),

    #[error("Failed to decode image {}: {reason}", .path.display())]
    ImageDecode { path: PathBuf, reason: String },

    #[error("Failed to process image: {0}")]
    ProcessingError(String),

    #[error("Image too large: {size} bytes (max: {max} bytes)")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Request body exceeds the upload limit (max image size: {max} bytes)")]
    PayloadTooLarge { max: usize },

    #[error("Missing image in request")]
    MissingFile,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised while loading or evaluating a model bundle
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read model bundle {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to deserialize model bundle {}: {source}", .path.display())]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Incompatible model bundle member '{member}': {reason}")]
    Incompatible { member: &'static str, reason: String },

    #[error("Predicted class {index} is outside encoder '{member}' ({classes} classes)")]
    UnknownClass {
        member: &'static str,
        index: usize,
        classes: usize,
    },
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("{} not found", display_name(.0))]
    NamesFileNotFound(PathBuf),

    #[error("No chemical names in {}", .0.display())]
    NoChemicalNames(PathBuf),

    #[error("Prediction failed for '{chemical}': {source}")]
    Prediction {
        chemical: String,
        #[source]
        source: ModelError,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// File name used in user-facing messages, falling back to the full path
pub(crate) fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

fn error_response(status: StatusCode, code: &str, message: String) -> Response {
    let body = Json(ErrorResponse {
        error: message,
        code: code.to_string(),
    });

    (status, body).into_response()
}

impl IntoResponse for OcrError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            OcrError::InitializationError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INIT_ERROR"),
            OcrError::UnknownEngine { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INIT_ERROR"),
            OcrError::ImageNotFound(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            OcrError::ImageDecode { .. } => (StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT"),
            OcrError::ProcessingError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PROCESSING_ERROR"),
            OcrError::ImageTooLarge { .. } | OcrError::PayloadTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "IMAGE_TOO_LARGE")
            }
            OcrError::MissingFile => (StatusCode::BAD_REQUEST, "MISSING_FILE"),
            OcrError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            OcrError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        error_response(status, code, self.to_string())
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        match &self {
            AnalysisError::NamesFileNotFound(_) => error_response(
                StatusCode::BAD_REQUEST,
                "NAMES_NOT_FOUND",
                "No chemical names extracted yet".to_string(),
            ),
            AnalysisError::NoChemicalNames(_) => {
                error_response(StatusCode::BAD_REQUEST, "NO_CHEMICAL_NAMES", self.to_string())
            }
            AnalysisError::Prediction { .. } => {
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "PREDICTION_ERROR", self.to_string())
            }
            AnalysisError::Model(_) => {
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "MODEL_ERROR", self.to_string())
            }
            AnalysisError::Io(_) | AnalysisError::Internal(_) => {
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", self.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_not_found_uses_file_name() {
        let err = AnalysisError::NamesFileNotFound(PathBuf::from("/tmp/work/chemical_names.txt"));
        assert_eq!(err.to_string(), "chemical_names.txt not found");
    }

    #[test]
    fn test_image_not_found_message_is_not_empty() {
        let err = OcrError::ImageNotFound(PathBuf::from("missing.png"));
        assert_eq!(err.to_string(), "No such image file: missing.png");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            OcrError::MissingFile.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            OcrError::ImageTooLarge { size: 10, max: 5 }
                .into_response()
                .status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            OcrError::PayloadTooLarge { max: 5 }.into_response().status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AnalysisError::NamesFileNotFound(PathBuf::from("x.txt"))
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }
}
