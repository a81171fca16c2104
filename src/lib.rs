//! Ingredient-label OCR and skincare chemical attribute prediction.
//!
//! Two independent pipelines: [`extractor::TextExtractor`] turns an image into
//! text through a pluggable [`engine::OcrEngine`], and [`analyzer::run`] turns a
//! file of chemical names into use / benefit / disadvantage reports with a
//! pre-trained [`model::ModelBundle`]. [`server`] exposes both over HTTP.

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod extractor;
pub mod model;
pub mod server;
