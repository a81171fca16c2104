use crate::cli::{AnalyzerArgs, EngineArgs, ServeArgs};
use std::path::PathBuf;

/// OCR engine configuration
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Engine name; `None` picks the first compiled-in engine
    pub engine: Option<String>,
    pub language: String,
    pub tessdata_path: Option<PathBuf>,
    pub model_cache_dir: Option<PathBuf>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: None,
            language: "eng".to_string(),
            tessdata_path: None,
            model_cache_dir: None,
        }
    }
}

impl From<EngineArgs> for OcrConfig {
    fn from(args: EngineArgs) -> Self {
        Self {
            engine: args.engine,
            language: args.language,
            tessdata_path: args.tessdata_path,
            model_cache_dir: args.model_cache_dir,
        }
    }
}

/// File locations for one analyzer run
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub names_path: PathBuf,
    pub model_path: PathBuf,
    pub output_path: PathBuf,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            names_path: PathBuf::from("chemical_names.txt"),
            model_path: PathBuf::from("skincare_model.json"),
            output_path: PathBuf::from("ans.txt"),
        }
    }
}

impl From<AnalyzerArgs> for AnalyzerConfig {
    fn from(args: AnalyzerArgs) -> Self {
        Self {
            names_path: args.names_path,
            model_path: args.model_path,
            output_path: args.output_path,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_file_size: usize,
    pub ocr: OcrConfig,
    pub analyzer: AnalyzerConfig,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            max_file_size: args.max_file_size,
            ocr: args.engine.into(),
            analyzer: args.analyzer.into(),
        }
    }
}
