use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "skincare-analyzer")]
#[command(about = "Extract ingredient text from images and predict skincare chemical attributes")]
#[command(version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run OCR on an image and print the extracted text
    Ocr(OcrArgs),
    /// Predict use, benefits and disadvantages for every chemical name in a file
    Analyze(AnalyzerArgs),
    /// Serve the OCR and analysis pipelines over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
pub struct OcrArgs {
    /// Path to the image file
    pub image: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// OCR engine to use (ocrs, leptess); defaults to the first compiled-in engine
    #[arg(long, env = "OCR_ENGINE")]
    pub engine: Option<String>,

    /// Language for OCR (e.g., "eng", "deu", "fra")
    #[arg(long, env = "OCR_LANGUAGE", default_value = "eng")]
    pub language: String,

    /// Path to tessdata directory (downloaded to the cache if not set)
    #[arg(long, env = "TESSDATA_PREFIX")]
    pub tessdata_path: Option<PathBuf>,

    /// Directory for downloaded engine models
    #[arg(long, env = "OCR_MODEL_CACHE_DIR")]
    pub model_cache_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzerArgs {
    /// Newline-delimited chemical names
    #[arg(long = "names", env = "ANALYZER_NAMES_FILE", default_value = "chemical_names.txt")]
    pub names_path: PathBuf,

    /// Serialized model bundle
    #[arg(long = "model", env = "ANALYZER_MODEL_FILE", default_value = "skincare_model.json")]
    pub model_path: PathBuf,

    /// Report destination (overwritten)
    #[arg(long = "output", env = "ANALYZER_OUTPUT_FILE", default_value = "ans.txt")]
    pub output_path: PathBuf,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long, env = "SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Maximum upload size in bytes (default: 50MB)
    #[arg(long, env = "SERVER_MAX_FILE_SIZE", default_value = "52428800")]
    pub max_file_size: usize,

    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(flatten)]
    pub analyzer: AnalyzerArgs,
}
