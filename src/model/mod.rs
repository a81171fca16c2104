//! Pre-trained model bundle
//!
//! A bundle is one JSON artifact holding the shared vectorizer plus a
//! classifier and label encoder for each predicted attribute. It is loaded and
//! validated in a single step; nothing is read lazily afterwards.

pub mod classifier;
pub mod encoder;
pub mod vectorizer;

pub use classifier::Classifier;
pub use encoder::LabelEncoder;
pub use vectorizer::{SparseVector, Vectorizer};

use crate::error::ModelError;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Attributes predicted for every chemical
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Use,
    Benefit,
    Disadvantage,
}

impl Attribute {
    pub const ALL: [Attribute; 3] = [Attribute::Use, Attribute::Benefit, Attribute::Disadvantage];

    fn model_member(self) -> &'static str {
        match self {
            Attribute::Use => "model_uses",
            Attribute::Benefit => "model_benefits",
            Attribute::Disadvantage => "model_disadvantages",
        }
    }

    fn encoder_member(self) -> &'static str {
        match self {
            Attribute::Use => "encoder_uses",
            Attribute::Benefit => "encoder_benefits",
            Attribute::Disadvantage => "encoder_disadvantages",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelBundle {
    pub model_uses: Classifier,
    pub model_benefits: Classifier,
    pub model_disadvantages: Classifier,
    pub vectorizer: Vectorizer,
    pub encoder_uses: LabelEncoder,
    pub encoder_benefits: LabelEncoder,
    pub encoder_disadvantages: LabelEncoder,
}

impl ModelBundle {
    /// Read, deserialize and validate a bundle file
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let file = File::open(path).map_err(|source| ModelError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let bundle: ModelBundle = serde_json::from_reader(BufReader::new(file)).map_err(
            |source| ModelError::Deserialize {
                path: path.to_path_buf(),
                source,
            },
        )?;

        bundle.validate()?;

        tracing::info!(
            "Loaded model bundle {:?} ({} features; {}/{}/{} classes)",
            path,
            bundle.vectorizer.n_features(),
            bundle.encoder_uses.len(),
            bundle.encoder_benefits.len(),
            bundle.encoder_disadvantages.len()
        );

        Ok(bundle)
    }

    /// Parse a bundle from an in-memory JSON document
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let bundle: ModelBundle =
            serde_json::from_str(json).map_err(|source| ModelError::Deserialize {
                path: "<memory>".into(),
                source,
            })?;
        bundle.validate()?;
        Ok(bundle)
    }

    /// Check that every member was trained against the same feature space and
    /// that each classifier's classes line up with its encoder
    pub fn validate(&self) -> Result<(), ModelError> {
        self.vectorizer
            .validate()
            .map_err(|reason| ModelError::Incompatible {
                member: "vectorizer",
                reason,
            })?;

        let n_features = self.vectorizer.n_features();
        for attribute in Attribute::ALL {
            let (classifier, encoder) = self.head(attribute);

            classifier
                .validate(n_features)
                .map_err(|reason| ModelError::Incompatible {
                    member: attribute.model_member(),
                    reason,
                })?;

            if encoder.len() != classifier.n_classes() {
                return Err(ModelError::Incompatible {
                    member: attribute.encoder_member(),
                    reason: format!(
                        "{} labels for a classifier with {} classes",
                        encoder.len(),
                        classifier.n_classes()
                    ),
                });
            }
        }

        Ok(())
    }

    pub fn head(&self, attribute: Attribute) -> (&Classifier, &LabelEncoder) {
        match attribute {
            Attribute::Use => (&self.model_uses, &self.encoder_uses),
            Attribute::Benefit => (&self.model_benefits, &self.encoder_benefits),
            Attribute::Disadvantage => (&self.model_disadvantages, &self.encoder_disadvantages),
        }
    }

    /// Vectorize once, then classify and decode `attribute`
    pub fn predict(&self, features: &SparseVector, attribute: Attribute) -> Result<&str, ModelError> {
        let (classifier, encoder) = self.head(attribute);
        let index = classifier.predict(features);

        encoder
            .inverse_transform(index)
            .ok_or(ModelError::UnknownClass {
                member: attribute.encoder_member(),
                index,
                classes: encoder.len(),
            })
    }
}
