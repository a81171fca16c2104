use super::vectorizer::SparseVector;
use ndarray::{Array1, Array2, ArrayView1};
use serde::Deserialize;

/// Trained classifier mapping a feature vector to a class index
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawClassifier")]
pub enum Classifier {
    /// Linear decision function (logistic regression, linear SVM, ...)
    ///
    /// A single coefficient row is a binary model: class 1 when the score is
    /// positive, class 0 otherwise.
    Linear {
        coef: Array2<f64>,
        intercept: Array1<f64>,
    },
    /// Multinomial naive Bayes
    MultinomialNb {
        class_log_prior: Array1<f64>,
        feature_log_prob: Array2<f64>,
    },
}

/// On-disk layout: nested row lists, tagged by `kind`
#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum RawClassifier {
    Linear {
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },
    MultinomialNb {
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
    },
}

impl TryFrom<RawClassifier> for Classifier {
    type Error = String;

    fn try_from(raw: RawClassifier) -> Result<Self, Self::Error> {
        Ok(match raw {
            RawClassifier::Linear { coef, intercept } => Classifier::Linear {
                coef: matrix("coef", coef)?,
                intercept: Array1::from(intercept),
            },
            RawClassifier::MultinomialNb {
                class_log_prior,
                feature_log_prob,
            } => Classifier::MultinomialNb {
                class_log_prior: Array1::from(class_log_prior),
                feature_log_prob: matrix("feature_log_prob", feature_log_prob)?,
            },
        })
    }
}

/// Stack rows into a matrix; ragged rows are a shape error
fn matrix(name: &str, rows: Vec<Vec<f64>>) -> Result<Array2<f64>, String> {
    let shape = (rows.len(), rows.first().map_or(0, Vec::len));
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec(shape, flat)
        .map_err(|e| format!("{} is not a {}x{} matrix: {}", name, shape.0, shape.1, e))
}

impl Classifier {
    pub fn n_classes(&self) -> usize {
        match self {
            Classifier::Linear { coef, .. } if coef.nrows() == 1 => 2,
            _ => self.weights().nrows(),
        }
    }

    fn weights(&self) -> &Array2<f64> {
        match self {
            Classifier::Linear { coef, .. } => coef,
            Classifier::MultinomialNb {
                feature_log_prob, ..
            } => feature_log_prob,
        }
    }

    fn biases(&self) -> (&Array1<f64>, &'static str) {
        match self {
            Classifier::Linear { intercept, .. } => (intercept, "intercept"),
            Classifier::MultinomialNb {
                class_log_prior, ..
            } => (class_log_prior, "class_log_prior"),
        }
    }

    /// Check shapes against the vectorizer width
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        let weights = self.weights();
        if weights.nrows() == 0 {
            return Err("no classes".to_string());
        }
        if weights.ncols() != n_features {
            return Err(format!(
                "weights have {} features, vectorizer produces {}",
                weights.ncols(),
                n_features
            ));
        }

        let (biases, name) = self.biases();
        if biases.len() != weights.nrows() {
            return Err(format!(
                "{} has {} entries for {} rows",
                name,
                biases.len(),
                weights.nrows()
            ));
        }

        Ok(())
    }

    /// Per-class scores for one feature vector
    pub fn decision_function(&self, x: &SparseVector) -> Array1<f64> {
        let weights = self.weights();
        let (biases, _) = self.biases();
        weights.dot(&x.to_dense(weights.ncols())) + biases
    }

    /// Predict the class index for one feature vector
    pub fn predict(&self, x: &SparseVector) -> usize {
        let scores = self.decision_function(x);
        match self {
            Classifier::Linear { .. } if scores.len() == 1 => usize::from(scores[0] > 0.0),
            _ => argmax(scores.view()),
        }
    }
}

/// Index of the largest score; the first one wins ties
fn argmax(scores: ArrayView1<f64>) -> usize {
    scores
        .iter()
        .enumerate()
        .fold(0, |best, (i, &score)| if score > scores[best] { i } else { best })
}
