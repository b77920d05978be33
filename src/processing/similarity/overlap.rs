//! Jaccard word-overlap tier

use super::{rescale_overlap, SimilarityStrategy, Tier};
use crate::error::Result;
use crate::processing::text_processor::{is_stop_word, strip_punctuation};
use log::debug;
use std::collections::HashSet;

/// Jaccard similarity of the unique non-stop-words of each group.
pub struct WordOverlap;

impl WordOverlap {
    fn word_set(group: &[&str]) -> HashSet<String> {
        let text = strip_punctuation(&group.join(" ").to_lowercase());
        text.split_whitespace()
            .filter(|word| !is_stop_word(word))
            .map(str::to_string)
            .collect()
    }

    pub fn jaccard(group_a: &[&str], group_b: &[&str]) -> f64 {
        let words_a = Self::word_set(group_a);
        let words_b = Self::word_set(group_b);

        let intersection = words_a.intersection(&words_b).count();
        let union = words_a.union(&words_b).count();
        debug!("Word overlap: intersection {}, union {}", intersection, union);

        if union == 0 {
            0.0
        } else {
            intersection as f64 / union as f64
        }
    }
}

impl SimilarityStrategy for WordOverlap {
    fn tier(&self) -> Tier {
        Tier::WordOverlap
    }

    fn score(&self, group_a: &[&str], group_b: &[&str]) -> Result<Option<f64>> {
        Ok(Some(rescale_overlap(Self::jaccard(group_a, group_b))))
    }
}
