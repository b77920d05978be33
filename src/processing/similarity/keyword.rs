//! Fixed-keyword tier, the last resort of the chain

use super::{SimilarityStrategy, Tier};
use crate::error::{Result, ResumeScorerError};
use aho_corasick::AhoCorasick;
use log::debug;
use std::collections::HashSet;

/// Domain keywords checked by substring containment.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    // Languages and technologies
    "python", "java", "javascript", "react", "angular", "node", "sql", "database",
    "machine learning", "ai", "data science", "analytics", "programming", "development",
    // Roles
    "software", "engineer", "developer", "analyst", "manager", "lead", "senior",
    // General and soft skills
    "experience", "skills", "project", "team", "leadership", "communication",
    "problem solving", "analysis", "design", "implementation", "testing", "deployment",
];

/// Share of keywords found in both groups, doubled and capped at 1.
pub struct KeywordOverlap {
    matcher: AhoCorasick,
    keyword_count: usize,
}

impl KeywordOverlap {
    pub fn new() -> Result<Self> {
        Self::with_keywords(DEFAULT_KEYWORDS)
    }

    pub fn with_keywords(keywords: &[&str]) -> Result<Self> {
        // Standard match semantics so overlapping keywords ("java" inside
        // "javascript") are each reported.
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(keywords)
            .map_err(|e| ResumeScorerError::Scoring(format!("Failed to build keyword matcher: {}", e)))?;

        Ok(Self {
            matcher,
            keyword_count: keywords.len(),
        })
    }

    /// Indices of the keywords contained anywhere in `group`.
    fn keywords_present(&self, group: &[&str]) -> HashSet<usize> {
        let text = group.join(" ").to_lowercase();
        self.matcher
            .find_overlapping_iter(&text)
            .map(|m| m.pattern().as_usize())
            .collect()
    }

    pub fn shared_keywords(&self, group_a: &[&str], group_b: &[&str]) -> usize {
        let present_a = self.keywords_present(group_a);
        let present_b = self.keywords_present(group_b);
        present_a.intersection(&present_b).count()
    }
}

impl SimilarityStrategy for KeywordOverlap {
    fn tier(&self) -> Tier {
        Tier::Keyword
    }

    fn score(&self, group_a: &[&str], group_b: &[&str]) -> Result<Option<f64>> {
        if self.keyword_count == 0 {
            return Ok(Some(0.0));
        }

        let matches = self.shared_keywords(group_a, group_b);
        let ratio = matches as f64 / self.keyword_count as f64;
        debug!("Keyword matches: {}/{}", matches, self.keyword_count);

        Ok(Some((ratio * 200.0).min(100.0) / 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_matcher_creation() {
        let keywords = KeywordOverlap::new().unwrap();
        assert_eq!(keywords.keyword_count, DEFAULT_KEYWORDS.len());
    }

    #[test]
    fn test_shared_keywords_use_substring_containment() {
        let keywords = KeywordOverlap::with_keywords(&["java", "javascript", "sql"]).unwrap();

        // "javascript" contains "java" as well
        let shared = keywords.shared_keywords(&["JavaScript developer"], &["javascript", "MySQL"]);
        assert_eq!(shared, 2);
    }

    #[test]
    fn test_keyword_score_is_doubled_and_capped() {
        let keywords = KeywordOverlap::with_keywords(&["python", "sql", "go", "rust"]).unwrap();

        let score = keywords.score(&["python"], &["python developer"]).unwrap();
        assert_eq!(score, Some(0.5));

        let score = keywords
            .score(&["python sql rust"], &["python sql rust"])
            .unwrap();
        assert_eq!(score, Some(1.0));
    }

    #[test]
    fn test_no_shared_keywords() {
        let keywords = KeywordOverlap::new().unwrap();
        let score = keywords.score(&["python"], &["gardening"]).unwrap();
        assert_eq!(score, Some(0.0));
    }

    #[test]
    fn test_empty_keyword_list_scores_zero() {
        let keywords = KeywordOverlap::with_keywords(&[]).unwrap();
        assert_eq!(keywords.score(&["python"], &["python"]).unwrap(), Some(0.0));
    }
}
