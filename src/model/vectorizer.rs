//! Text -> sparse feature vector mapping fitted at training time

use ndarray::Array1;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Sparse feature vector: `(column, value)` pairs sorted by column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dense vector of `n_features` columns; entries beyond it are dropped
    pub fn to_dense(&self, n_features: usize) -> Array1<f64> {
        let mut dense = Array1::zeros(n_features);
        for &(col, value) in self.entries.iter().filter(|(col, _)| *col < n_features) {
            dense[col] = value;
        }
        dense
    }
}

/// How input text is split into terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Analyzer {
    /// Word n-grams over tokens of two or more word characters
    #[default]
    Word,
    /// Character n-grams over the text, whitespace runs collapsed to one space
    Char,
    /// Character n-grams inside word boundaries, words padded with spaces
    CharWb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Norm {
    #[default]
    L2,
    L1,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_true() -> bool {
    true
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// Term-frequency (optionally idf-weighted) vectorizer
#[derive(Debug, Clone, Deserialize)]
pub struct Vectorizer {
    #[serde(default)]
    pub analyzer: Analyzer,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default = "default_true")]
    pub lowercase: bool,
    pub vocabulary: HashMap<String, usize>,
    /// Per-column inverse document frequency; absent means raw counts
    #[serde(default)]
    pub idf: Option<Vec<f64>>,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
}

impl Vectorizer {
    /// Number of feature columns
    pub fn n_features(&self) -> usize {
        let from_vocab = self.vocabulary.values().max().map_or(0, |max| max + 1);
        match &self.idf {
            Some(idf) => idf.len().max(from_vocab),
            None => from_vocab,
        }
    }

    /// Internal consistency check run when a bundle is loaded
    pub fn validate(&self) -> Result<(), String> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(format!("invalid ngram_range ({}, {})", min_n, max_n));
        }
        if self.vocabulary.is_empty() {
            return Err("empty vocabulary".to_string());
        }
        if let Some(idf) = &self.idf {
            let columns = self.vocabulary.values().max().map_or(0, |max| max + 1);
            if idf.len() != columns {
                return Err(format!(
                    "idf has {} weights but vocabulary spans {} columns",
                    idf.len(),
                    columns
                ));
            }
        }
        Ok(())
    }

    /// Map one document to its feature vector; out-of-vocabulary terms are dropped
    pub fn transform(&self, text: &str) -> SparseVector {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.terms(&text) {
            if let Some(&col) = self.vocabulary.get(&term) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(col, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                let idf = self
                    .idf
                    .as_ref()
                    .and_then(|idf| idf.get(col).copied())
                    .unwrap_or(1.0);
                (col, tf * idf)
            })
            .collect();

        if let Some(norm) = self.norm {
            let length = match norm {
                Norm::L2 => entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
                Norm::L1 => entries.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            };
            if length > 0.0 {
                for (_, value) in entries.iter_mut() {
                    *value /= length;
                }
            }
        }

        SparseVector { entries }
    }

    fn terms(&self, text: &str) -> Vec<String> {
        let (min_n, max_n) = self.ngram_range;
        match self.analyzer {
            Analyzer::Word => word_ngrams(&tokenize(text), min_n, max_n),
            Analyzer::Char => char_ngrams(text, min_n, max_n),
            Analyzer::CharWb => char_wb_ngrams(text, min_n, max_n),
        }
    }
}

/// Maximal runs of word characters, keeping tokens of at least two characters
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

fn word_ngrams(tokens: &[String], min_n: usize, max_n: usize) -> Vec<String> {
    let mut terms = Vec::new();
    for n in min_n..=max_n {
        if n > tokens.len() {
            break;
        }
        terms.extend(tokens.windows(n).map(|window| window.join(" ")));
    }
    terms
}

/// Replace runs of two or more whitespace characters with a single space
fn collapse_whitespace(text: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());
    let mut run = 0;
    for c in text.chars() {
        if c.is_whitespace() {
            run += 1;
            match run {
                1 => out.push(c),
                2 => {
                    if let Some(last) = out.last_mut() {
                        *last = ' ';
                    }
                }
                _ => {}
            }
        } else {
            run = 0;
            out.push(c);
        }
    }
    out
}

fn char_ngrams(text: &str, min_n: usize, max_n: usize) -> Vec<String> {
    let chars = collapse_whitespace(text);

    let mut terms = Vec::new();
    for n in min_n..=max_n {
        if n > chars.len() {
            break;
        }
        terms.extend(chars.windows(n).map(|window| window.iter().collect::<String>()));
    }
    terms
}

fn char_wb_ngrams(text: &str, min_n: usize, max_n: usize) -> Vec<String> {
    let mut terms = Vec::new();
    for word in text.split_whitespace() {
        let padded: Vec<char> = std::iter::once(' ')
            .chain(word.chars())
            .chain(std::iter::once(' '))
            .collect();

        for n in min_n..=max_n {
            if n >= padded.len() {
                // A short word contributes itself once
                terms.push(padded.iter().collect());
                break;
            }
            terms.extend(padded.windows(n).map(|window| window.iter().collect::<String>()));
        }
    }
    terms
}
