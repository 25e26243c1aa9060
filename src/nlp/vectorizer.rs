//! TF-IDF document-term weighting
//!
//! Raw term counts, smooth IDF `ln((1 + n) / (1 + df)) + 1`, L2-normalised
//! rows. The vocabulary is sorted alphabetically so column order is stable.

use std::collections::BTreeMap;

use ahash::AHashSet;
use ndarray::Array2;

use crate::core::error::{PulsoError, Result};
use crate::nlp::tokenizer::Tokenizer;

#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    tokenizer: Tokenizer,
    /// Term -> column index
    vocabulary: BTreeMap<String, usize>,
    /// Column index -> term
    terms: Vec<String>,
    idf: Vec<f64>,
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self::new(Tokenizer::new())
    }
}

impl TfIdfVectorizer {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            vocabulary: BTreeMap::new(),
            terms: Vec::new(),
            idf: Vec::new(),
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Learn vocabulary and IDF, then return the weighted matrix (docs x terms)
    pub fn fit_transform(&mut self, texts: &[&str]) -> Result<Array2<f64>> {
        if texts.is_empty() {
            return Err(PulsoError::EmptyCorpus);
        }

        let tokenized: Vec<Vec<String>> = texts.iter().map(|t| self.tokenizer.tokenize(t)).collect();

        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for doc in &tokenized {
            let unique: AHashSet<&String> = doc.iter().collect();
            for term in unique {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
        }
        if doc_freq.is_empty() {
            return Err(PulsoError::EmptyCorpus);
        }

        let n = tokenized.len() as f64;
        self.vocabulary.clear();
        self.terms.clear();
        self.idf.clear();
        for (idx, (term, df)) in doc_freq.into_iter().enumerate() {
            self.vocabulary.insert(term.clone(), idx);
            self.terms.push(term);
            self.idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
        }

        let mut matrix = Array2::<f64>::zeros((tokenized.len(), self.terms.len()));
        for (row, doc) in tokenized.iter().enumerate() {
            for token in doc {
                if let Some(&col) = self.vocabulary.get(token) {
                    matrix[[row, col]] += 1.0;
                }
            }
            for col in 0..self.terms.len() {
                matrix[[row, col]] *= self.idf[col];
            }
            let norm = matrix.row(row).mapv(|v| v * v).sum().sqrt();
            if norm > 0.0 {
                matrix.row_mut(row).mapv_inplace(|v| v / norm);
            }
        }

        tracing::debug!(
            documents = tokenized.len(),
            terms = self.terms.len(),
            "Built TF-IDF matrix"
        );

        Ok(matrix)
    }
}
