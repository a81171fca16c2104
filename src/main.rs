use clap::Parser;
use skincare_analyzer::cli::{Cli, Command};
use skincare_analyzer::config::{AnalyzerConfig, OcrConfig, ServerConfig};
use skincare_analyzer::error::{AnalysisError, OcrError};
use skincare_analyzer::extractor::TextExtractor;
use skincare_analyzer::{analyzer, server};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Ocr(args) => {
            // Building the engine may download models, so report a bad path first
            if !args.image.is_file() {
                println!("{}", OcrError::ImageNotFound(args.image));
                return Ok(ExitCode::FAILURE);
            }

            let config = OcrConfig::from(args.engine);
            let extracted = TextExtractor::from_config(&config)
                .and_then(|extractor| extractor.extract(&args.image));

            match extracted {
                Ok(extracted) => {
                    println!("{}", extracted.text);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    println!("{}", e);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Analyze(args) => {
            let config = AnalyzerConfig::from(args);

            match analyzer::run(&config) {
                Ok(summary) => {
                    println!("{} generated successfully", summary.output_path.display());
                    Ok(ExitCode::SUCCESS)
                }
                Err(e @ AnalysisError::NamesFileNotFound(_)) => {
                    println!("Error: {}", e);
                    Ok(ExitCode::FAILURE)
                }
                Err(e) => Err(e.into()),
            }
        }
        Command::Serve(args) => {
            let config = ServerConfig::from(args);

            tracing::info!(
                "Starting skincare-analyzer v{}",
                env!("CARGO_PKG_VERSION")
            );
            tracing::info!("Binding to {}:{}", config.host, config.port);

            tokio::runtime::Runtime::new()?.block_on(server::run(config))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
