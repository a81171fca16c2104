//! OCR engine implementations
//!
//! This module contains implementations of the OcrEngine trait for different
//! OCR backends. Engines are conditionally compiled based on feature flags.

#[cfg(any(feature = "engine-ocrs", feature = "engine-leptess"))]
mod download;

#[cfg(feature = "engine-ocrs")]
pub mod ocrs;

#[cfg(feature = "engine-leptess")]
pub mod leptess;

use crate::config::OcrConfig;
use crate::engine::OcrEngine;
use crate::error::OcrError;
use std::sync::Arc;

/// Names of the engines compiled into this build, in order of preference
pub fn available() -> Vec<&'static str> {
    #[allow(unused_mut)]
    let mut names = Vec::new();

    #[cfg(feature = "engine-ocrs")]
    names.push("ocrs");

    #[cfg(feature = "engine-leptess")]
    names.push("leptess");

    names
}

/// Initialize the engine selected by `config.engine`, or the preferred one
pub fn create(config: &OcrConfig) -> Result<Arc<dyn OcrEngine>, OcrError> {
    let available = available();

    let name = match config.engine.as_deref() {
        Some(name) => name.to_lowercase(),
        None => match available.first() {
            Some(name) => name.to_string(),
            None => {
                return Err(OcrError::InitializationError(
                    "No OCR engines available. Build with --features engine-ocrs or --features engine-leptess".to_string()
                ));
            }
        },
    };

    tracing::info!("Initializing {} engine...", name);

    match name.as_str() {
        #[cfg(feature = "engine-ocrs")]
        "ocrs" => Ok(Arc::new(ocrs::OcrsEngine::new(config)?)),

        #[cfg(feature = "engine-leptess")]
        "leptess" => Ok(Arc::new(leptess::LeptessEngine::new(config)?)),

        _ => Err(OcrError::UnknownEngine {
            name: name.clone(),
            available: if available.is_empty() {
                "none".to_string()
            } else {
                available.join(", ")
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_engine_is_rejected() {
        let config = OcrConfig {
            engine: Some("cuneiform".to_string()),
            ..OcrConfig::default()
        };

        match create(&config) {
            Err(OcrError::UnknownEngine { name, .. }) => assert_eq!(name, "cuneiform"),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(engine) => panic!("unexpected engine: {}", engine.name()),
        }
    }

    #[test]
    fn test_available_matches_features() {
        let names = available();
        assert_eq!(names.contains(&"ocrs"), cfg!(feature = "engine-ocrs"));
        assert_eq!(names.contains(&"leptess"), cfg!(feature = "engine-leptess"));
    }
}
