//! Weighted combination of the component similarity scores

use crate::config::ScoringConfig;
use serde::{Deserialize, Serialize};

/// Overall score plus the two component scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchScores {
    pub overall: f64,
    pub jobdes: f64,
    pub skills: f64,
}

pub struct ScoreAggregator {
    job_description_weight: f64,
    skills_weight: f64,
}

impl ScoreAggregator {
    pub fn new(scoring: &ScoringConfig) -> Self {
        Self {
            job_description_weight: scoring.job_description_weight,
            skills_weight: scoring.skills_weight,
        }
    }

    /// Skills carry more weight than experience by default (0.6 vs 0.4).
    ///
    /// The weighted sum is taken over the raw inputs and clamped afterwards;
    /// the two components are clamped independently for reporting.
    pub fn aggregate(&self, jobdes_sim: f64, skills_sim: f64) -> MatchScores {
        let jobdes_sim = nan_to_zero(jobdes_sim);
        let skills_sim = nan_to_zero(skills_sim);

        let overall = if jobdes_sim + skills_sim > 0.0 {
            unit(self.job_description_weight * jobdes_sim + self.skills_weight * skills_sim)
        } else {
            0.0
        };

        MatchScores {
            overall,
            jobdes: unit(jobdes_sim),
            skills: unit(skills_sim),
        }
    }
}

impl Default for ScoreAggregator {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

/// Combine scores with the default weights.
pub fn aggregate(jobdes_sim: f64, skills_sim: f64) -> MatchScores {
    ScoreAggregator::default().aggregate(jobdes_sim, skills_sim)
}

fn nan_to_zero(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score
    }
}

fn unit(score: f64) -> f64 {
    nan_to_zero(score).clamp(0.0, 1.0)
}
