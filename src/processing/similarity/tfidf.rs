//! TF-IDF cosine tier
//!
//! The vector space is fitted jointly over both groups so IDF reflects the
//! combined vocabulary. Terms are word uni- through trigrams with sublinear
//! term frequency and smoothed IDF; rows are L2-normalized, so the dot product
//! of two rows is their cosine. The raw score is the best-matching pair.

use super::{rescale_cosine, SimilarityStrategy, Tier};
use crate::error::{Result, ResumeScorerError};
use log::debug;
use ndarray::{s, Array2};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("Invalid token regex"));

pub struct TfidfCosine {
    ngram_range: (usize, usize),
    max_df: f64,
}

impl TfidfCosine {
    pub fn new(max_df: f64) -> Self {
        Self {
            ngram_range: (1, 3),
            max_df,
        }
    }

    /// Lowercased word n-grams of one document.
    fn analyze(&self, doc: &str) -> Vec<String> {
        let lowered = doc.to_lowercase();
        let tokens: Vec<&str> = TOKEN_PATTERN.find_iter(&lowered).map(|m| m.as_str()).collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n.max(1)..=max_n.min(tokens.len()) {
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        terms
    }

    /// Fit the vocabulary over `docs` and return one normalized row per
    /// document, or `None` when no document has any term.
    pub fn fit_transform(&self, docs: &[&str]) -> Result<Option<Array2<f64>>> {
        let counts: Vec<HashMap<String, usize>> = docs
            .iter()
            .map(|doc| {
                let mut counts = HashMap::new();
                for term in self.analyze(doc) {
                    *counts.entry(term).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for doc_counts in &counts {
            for term in doc_counts.keys() {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            debug!("Empty TF-IDF vocabulary");
            return Ok(None);
        }

        let n_docs = docs.len() as f64;
        let max_doc_count = self.max_df * n_docs;
        if max_doc_count < 1.0 {
            return Err(ResumeScorerError::Scoring(format!(
                "max_df {} keeps terms in fewer than one of {} documents",
                self.max_df, docs.len()
            )));
        }

        let vocabulary: Vec<(&str, usize)> = document_frequency
            .into_iter()
            .filter(|(_, df)| *df as f64 <= max_doc_count)
            .collect();

        if vocabulary.is_empty() {
            return Err(ResumeScorerError::Scoring(
                "no terms remain after max_df pruning".to_string(),
            ));
        }

        let mut matrix = Array2::<f64>::zeros((docs.len(), vocabulary.len()));
        for (col, (term, df)) in vocabulary.iter().enumerate() {
            let idf = ((1.0 + n_docs) / (1.0 + *df as f64)).ln() + 1.0;
            for (row, doc_counts) in counts.iter().enumerate() {
                if let Some(&tf) = doc_counts.get(*term) {
                    matrix[[row, col]] = (1.0 + (tf as f64).ln()) * idf;
                }
            }
        }

        for mut row in matrix.rows_mut() {
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|v| v / norm);
            }
        }

        debug!("TF-IDF matrix shape: {:?}", matrix.shape());
        Ok(Some(matrix))
    }

    /// Highest cosine similarity between any text of `group_a` and any text
    /// of `group_b`.
    pub fn max_cosine(&self, group_a: &[&str], group_b: &[&str]) -> Result<Option<f64>> {
        let docs: Vec<&str> = group_a.iter().chain(group_b).copied().collect();
        let Some(matrix) = self.fit_transform(&docs)? else {
            return Ok(None);
        };

        let split = group_a.len();
        let rows_a = matrix.slice(s![..split, ..]);
        let rows_b = matrix.slice(s![split.., ..]);
        let similarities = rows_a.dot(&rows_b.t());

        let max = similarities.iter().copied().fold(0.0_f64, f64::max);
        debug!("Max cosine similarity: {:.4}", max);
        Ok(Some(max.min(1.0)))
    }
}

impl SimilarityStrategy for TfidfCosine {
    fn tier(&self) -> Tier {
        Tier::VectorSpace
    }

    fn score(&self, group_a: &[&str], group_b: &[&str]) -> Result<Option<f64>> {
        match self.max_cosine(group_a, group_b)? {
            Some(raw) if raw > 0.0 => {
                let scaled = rescale_cosine(raw);
                debug!("Raw cosine {:.4} scaled to {:.4}", raw, scaled);
                Ok(Some(scaled))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ngrams_up_to_trigrams() {
        let tfidf = TfidfCosine::new(1.0);
        let terms = tfidf.analyze("Rust Backend Systems");

        assert_eq!(
            terms,
            vec![
                "rust",
                "backend",
                "systems",
                "rust backend",
                "backend systems",
                "rust backend systems"
            ]
        );
    }

    #[test]
    fn test_rows_are_unit_length() {
        let tfidf = TfidfCosine::new(1.0);
        let matrix = tfidf
            .fit_transform(&["python sql python", "go kubernetes"])
            .unwrap()
            .unwrap();

        for row in matrix.rows() {
            assert!((row.dot(&row) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_identical_documents_have_cosine_one() {
        let tfidf = TfidfCosine::new(1.0);
        let raw = tfidf
            .max_cosine(&["backend python engineer"], &["backend python engineer"])
            .unwrap()
            .unwrap();
        assert!((raw - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_pair_wins() {
        let tfidf = TfidfCosine::new(1.0);
        let single = tfidf
            .max_cosine(&["python backend"], &["python backend"])
            .unwrap()
            .unwrap();
        let diluted = tfidf
            .max_cosine(
                &["python backend"],
                &["python backend", "gardening", "cooking recipes"],
            )
            .unwrap()
            .unwrap();

        // unrelated sentences change IDF slightly but do not average the score down
        assert!(diluted > 0.9);
        assert!(single > 0.9);
    }

    #[test]
    fn test_disjoint_documents_are_not_applicable() {
        let tfidf = TfidfCosine::new(1.0);
        assert_eq!(tfidf.score(&["python"], &["painting"]).unwrap(), None);
    }

    #[test]
    fn test_empty_vocabulary_is_not_applicable() {
        let tfidf = TfidfCosine::new(1.0);
        assert_eq!(tfidf.score(&["!!!"], &["..."]).unwrap(), None);
    }

    #[test]
    fn test_max_df_pruning_everything_is_error() {
        let tfidf = TfidfCosine::new(0.8);
        assert!(tfidf.score(&["python"], &["python"]).is_err());
    }

    #[test]
    fn test_partial_overlap_is_rescaled() {
        let tfidf = TfidfCosine::new(1.0);
        let score = tfidf
            .score(
                &["looking backend engineer python distributed systems experience"],
                &["python go sql distributed systems"],
            )
            .unwrap()
            .unwrap();

        let raw = tfidf
            .max_cosine(
                &["looking backend engineer python distributed systems experience"],
                &["python go sql distributed systems"],
            )
            .unwrap()
            .unwrap();

        assert!(raw > 0.0 && raw < 1.0);
        assert!(score > raw);
        assert!(score <= 1.0);
    }
}
