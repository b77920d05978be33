//! Report structures built from a match analysis

use crate::processing::analyzer::MatchReport;
use crate::processing::similarity::Capabilities;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Presentation-ready report: percentages, verdict and run metadata around
/// the raw analysis.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub summary: ScoreSummary,
    pub metadata: ReportMetadata,
    pub analysis: MatchReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Overall match (0-100)
    pub overall_percentage: u8,
    pub job_description_percentage: u8,
    pub skills_percentage: u8,
    pub assessment: Assessment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub scorer_version: String,
    pub resume_file: String,
    pub job_file: String,
    pub vector_tier_available: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assessment {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl Assessment {
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            80..=u8::MAX => Assessment::Excellent,
            70..=79 => Assessment::Good,
            60..=69 => Assessment::Fair,
            _ => Assessment::NeedsImprovement,
        }
    }
}

impl std::fmt::Display for Assessment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Assessment::Excellent => write!(f, "Excellent Match"),
            Assessment::Good => write!(f, "Good Match"),
            Assessment::Fair => write!(f, "Fair Match"),
            Assessment::NeedsImprovement => write!(f, "Needs Improvement"),
        }
    }
}

/// Whole percentage points of a `[0, 1]` score, truncated.
pub fn to_percentage(score: f64) -> u8 {
    (score.clamp(0.0, 1.0) * 100.0).floor() as u8
}

impl ScoreReport {
    pub fn new(
        analysis: MatchReport,
        capabilities: Capabilities,
        resume_file: impl Into<String>,
        job_file: impl Into<String>,
    ) -> Self {
        let overall_percentage = to_percentage(analysis.scores.overall);

        Self {
            summary: ScoreSummary {
                overall_percentage,
                job_description_percentage: to_percentage(analysis.scores.jobdes),
                skills_percentage: to_percentage(analysis.scores.skills),
                assessment: Assessment::from_percentage(overall_percentage),
            },
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                scorer_version: env!("CARGO_PKG_VERSION").to_string(),
                resume_file: resume_file.into(),
                job_file: job_file.into(),
                vector_tier_available: capabilities.vector_space,
            },
            analysis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assessment_thresholds() {
        assert_eq!(Assessment::from_percentage(100), Assessment::Excellent);
        assert_eq!(Assessment::from_percentage(80), Assessment::Excellent);
        assert_eq!(Assessment::from_percentage(79), Assessment::Good);
        assert_eq!(Assessment::from_percentage(70), Assessment::Good);
        assert_eq!(Assessment::from_percentage(60), Assessment::Fair);
        assert_eq!(Assessment::from_percentage(59), Assessment::NeedsImprovement);
        assert_eq!(Assessment::from_percentage(0), Assessment::NeedsImprovement);
    }

    #[test]
    fn test_percentages_truncate() {
        assert_eq!(to_percentage(0.999), 99);
        assert_eq!(to_percentage(1.0), 100);
        assert_eq!(to_percentage(0.0), 0);
        assert_eq!(to_percentage(1.5), 100);
    }

    #[test]
    fn test_assessment_labels() {
        assert_eq!(Assessment::Good.to_string(), "Good Match");
        assert_eq!(Assessment::NeedsImprovement.to_string(), "Needs Improvement");
    }
}
