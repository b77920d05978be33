//! Similarity scoring between two groups of preprocessed text
//!
//! Scoring runs an ordered chain of strategies. The first one that produces a
//! score wins; a strategy that has nothing to say (`Ok(None)`) or fails
//! (`Err`) hands over to the next. Every score is bounded to `[0, 1]`.

pub mod keyword;
pub mod overlap;
#[cfg(feature = "tfidf")]
pub mod tfidf;

use crate::config::{Config, ScoringConfig};
use crate::error::Result;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub use keyword::KeywordOverlap;
pub use overlap::WordOverlap;
#[cfg(feature = "tfidf")]
pub use tfidf::TfidfCosine;

static DEFAULT_SCORER: LazyLock<SimilarityScorer> = LazyLock::new(SimilarityScorer::default);

/// Fallback chain position of a scoring strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    VectorSpace,
    WordOverlap,
    Keyword,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::VectorSpace => write!(f, "TF-IDF cosine"),
            Tier::WordOverlap => write!(f, "word overlap"),
            Tier::Keyword => write!(f, "keyword"),
        }
    }
}

/// A bounded score and the tier that produced it.
///
/// `tier` is `None` when no tier ran or every tier was exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: f64,
    pub tier: Option<Tier>,
}

impl ScoreResult {
    pub fn zero() -> Self {
        Self { score: 0.0, tier: None }
    }
}

/// Optional scoring capabilities, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub vector_space: bool,
}

impl Capabilities {
    pub fn detect(config: &Config) -> Self {
        Self {
            vector_space: cfg!(feature = "tfidf") && config.scoring.enable_vector_tier,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::detect(&Config::default())
    }
}

/// One tier of the fallback chain.
pub trait SimilarityStrategy: Send + Sync {
    fn tier(&self) -> Tier;

    /// Score two non-empty groups. `Ok(None)` passes to the next tier.
    fn score(&self, group_a: &[&str], group_b: &[&str]) -> Result<Option<f64>>;
}

pub struct SimilarityScorer {
    strategies: Vec<Box<dyn SimilarityStrategy>>,
}

impl SimilarityScorer {
    /// Build the standard chain: TF-IDF cosine (when available), word
    /// overlap, then fixed keywords.
    pub fn new(capabilities: &Capabilities, scoring: &ScoringConfig) -> Self {
        let mut strategies: Vec<Box<dyn SimilarityStrategy>> = Vec::new();

        #[cfg(feature = "tfidf")]
        if capabilities.vector_space {
            strategies.push(Box::new(TfidfCosine::new(scoring.max_df)));
        }
        #[cfg(not(feature = "tfidf"))]
        if capabilities.vector_space {
            warn!("Vector space tier requested but not compiled in; max_df {} unused", scoring.max_df);
        }

        strategies.push(Box::new(WordOverlap));

        match KeywordOverlap::new() {
            Ok(keywords) => strategies.push(Box::new(keywords)),
            Err(e) => warn!("Keyword tier unavailable: {}", e),
        }

        Self::with_strategies(strategies)
    }

    pub fn with_strategies(strategies: Vec<Box<dyn SimilarityStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn tiers(&self) -> Vec<Tier> {
        self.strategies.iter().map(|s| s.tier()).collect()
    }

    /// Score two groups, reporting which tier produced the result.
    pub fn score<A, B>(&self, group_a: &[A], group_b: &[B]) -> ScoreResult
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let group_a = non_blank(group_a);
        let group_b = non_blank(group_b);

        if group_a.is_empty() || group_b.is_empty() {
            debug!("Empty group after filtering, similarity is 0");
            return ScoreResult::zero();
        }

        debug!("Comparing {} texts with {} texts", group_a.len(), group_b.len());

        for strategy in &self.strategies {
            match strategy.score(&group_a, &group_b) {
                Ok(Some(score)) => {
                    let score = bounded(score);
                    debug!("{} similarity: {:.4}", strategy.tier(), score);
                    return ScoreResult {
                        score,
                        tier: Some(strategy.tier()),
                    };
                }
                Ok(None) => debug!("{} tier not applicable, falling through", strategy.tier()),
                Err(e) => warn!("{} tier failed: {}", strategy.tier(), e),
            }
        }

        warn!("All similarity tiers exhausted");
        ScoreResult::zero()
    }

    pub fn similarity<A, B>(&self, group_a: &[A], group_b: &[B]) -> f64
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        self.score(group_a, group_b).score
    }
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new(&Capabilities::default(), &ScoringConfig::default())
    }
}

/// Score two groups with the default chain.
pub fn similarity<A, B>(group_a: &[A], group_b: &[B]) -> f64
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    DEFAULT_SCORER.similarity(group_a, group_b)
}

fn non_blank<S: AsRef<str>>(group: &[S]) -> Vec<&str> {
    group
        .iter()
        .map(AsRef::as_ref)
        .filter(|s| !s.trim().is_empty())
        .collect()
}

fn bounded(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

// Rescaling bands are empirical and unvalidated.

/// Stretch a raw cosine similarity, which runs small even for related texts.
pub(crate) fn rescale_cosine(raw: f64) -> f64 {
    let percentage = raw * 100.0;
    let scaled = if percentage < 10.0 {
        percentage * 8.0
    } else if percentage < 30.0 {
        percentage * 3.0
    } else {
        percentage * 1.5
    };
    scaled.min(100.0) / 100.0
}

/// Stretch a Jaccard similarity, boosting the low range harder.
pub(crate) fn rescale_overlap(jaccard: f64) -> f64 {
    let percentage = jaccard * 100.0;
    let scaled = if percentage < 5.0 {
        percentage * 15.0
    } else if percentage < 15.0 {
        percentage * 6.0
    } else if percentage < 30.0 {
        percentage * 3.0
    } else {
        percentage * 1.5
    };
    scaled.min(100.0) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResumeScorerError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixed(Tier, Option<f64>);

    impl SimilarityStrategy for Fixed {
        fn tier(&self) -> Tier {
            self.0
        }

        fn score(&self, _: &[&str], _: &[&str]) -> Result<Option<f64>> {
            Ok(self.1)
        }
    }

    struct Failing(Tier, Arc<AtomicUsize>);

    impl SimilarityStrategy for Failing {
        fn tier(&self) -> Tier {
            self.0
        }

        fn score(&self, _: &[&str], _: &[&str]) -> Result<Option<f64>> {
            self.1.fetch_add(1, Ordering::SeqCst);
            Err(ResumeScorerError::Scoring("boom".to_string()))
        }
    }

    #[test]
    fn test_rescale_cosine_bands() {
        assert!((rescale_cosine(0.05) - 0.40).abs() < 1e-9);
        assert!((rescale_cosine(0.20) - 0.60).abs() < 1e-9);
        assert!((rescale_cosine(0.40) - 0.60).abs() < 1e-9);
        assert_eq!(rescale_cosine(0.9), 1.0);
    }

    #[test]
    fn test_rescale_overlap_bands() {
        assert!((rescale_overlap(0.02) - 0.30).abs() < 1e-9);
        assert!((rescale_overlap(0.10) - 0.60).abs() < 1e-9);
        assert!((rescale_overlap(0.20) - 0.60).abs() < 1e-9);
        assert!((rescale_overlap(0.50) - 0.75).abs() < 1e-9);
        assert_eq!(rescale_overlap(1.0), 1.0);
    }

    #[test]
    fn test_empty_groups_short_circuit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let scorer = SimilarityScorer::with_strategies(vec![Box::new(Failing(
            Tier::WordOverlap,
            Arc::clone(&calls),
        ))]);

        let empty: [&str; 0] = [];
        assert_eq!(scorer.score(&empty, &["python"]), ScoreResult::zero());
        assert_eq!(scorer.score(&["python"], &empty), ScoreResult::zero());
        assert_eq!(scorer.score(&["  ", ""], &["python"]), ScoreResult::zero());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_not_applicable_falls_through() {
        let scorer = SimilarityScorer::with_strategies(vec![
            Box::new(Fixed(Tier::VectorSpace, None)),
            Box::new(Fixed(Tier::WordOverlap, Some(0.0))),
            Box::new(Fixed(Tier::Keyword, Some(0.9))),
        ]);

        // a zero from the overlap tier is a result, not a fall-through
        let result = scorer.score(&["a"], &["b"]);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.tier, Some(Tier::WordOverlap));
    }

    #[test]
    fn test_errors_fall_through_to_next_tier() {
        let calls = Arc::new(AtomicUsize::new(0));
        let scorer = SimilarityScorer::with_strategies(vec![
            Box::new(Failing(Tier::VectorSpace, Arc::clone(&calls))),
            Box::new(Failing(Tier::WordOverlap, Arc::clone(&calls))),
            Box::new(Fixed(Tier::Keyword, Some(0.5))),
        ]);

        let result = scorer.score(&["a"], &["b"]);
        assert_eq!(result.score, 0.5);
        assert_eq!(result.tier, Some(Tier::Keyword));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_exhausted_chain_is_zero() {
        let calls = Arc::new(AtomicUsize::new(0));
        let scorer = SimilarityScorer::with_strategies(vec![Box::new(Failing(
            Tier::Keyword,
            Arc::clone(&calls),
        ))]);

        assert_eq!(scorer.score(&["a"], &["b"]), ScoreResult::zero());
    }

    #[test]
    fn test_scores_are_bounded() {
        let scorer = SimilarityScorer::with_strategies(vec![Box::new(Fixed(
            Tier::Keyword,
            Some(1.7),
        ))]);
        assert_eq!(scorer.similarity(&["a"], &["b"]), 1.0);
    }

    #[test]
    fn test_default_chain_order() {
        let tiers = SimilarityScorer::default().tiers();

        #[cfg(feature = "tfidf")]
        assert_eq!(tiers, vec![Tier::VectorSpace, Tier::WordOverlap, Tier::Keyword]);
        #[cfg(not(feature = "tfidf"))]
        assert_eq!(tiers, vec![Tier::WordOverlap, Tier::Keyword]);
    }

    #[test]
    fn test_vector_tier_can_be_disabled() {
        let mut config = Config::default();
        config.scoring.enable_vector_tier = false;

        let capabilities = Capabilities::detect(&config);
        assert!(!capabilities.vector_space);

        let scorer = SimilarityScorer::new(&capabilities, &config.scoring);
        assert_eq!(scorer.tiers(), vec![Tier::WordOverlap, Tier::Keyword]);
    }

    #[test]
    fn test_identical_text_beats_unrelated_text() {
        let text = "rust developer distributed systems kubernetes";
        let same = similarity(&[text], &[text]);
        let unrelated = similarity(&[text], &["watercolor painting landscapes"]);

        assert!(same > 0.9);
        assert_eq!(unrelated, 0.0);
        assert!(same > unrelated);
    }
}
