//! Match pipeline: segment the resume, then score it against a job description

use crate::config::Config;
use crate::processing::aggregator::{MatchScores, ScoreAggregator};
use crate::processing::document::{Document, DocumentType, SectionMap, SectionType};
use crate::processing::similarity::{Capabilities, ScoreResult, SimilarityScorer, Tier};
use crate::processing::text_processor::{preprocess, split_into_sentences};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Scores a resume against a job description.
///
/// Holds only read-only scoring tables, so one analyzer can serve any number
/// of requests; every call returns its own [`MatchReport`].
pub struct MatchAnalyzer {
    scorer: SimilarityScorer,
    aggregator: ScoreAggregator,
    capabilities: Capabilities,
    sentence_groups: bool,
}

/// Result of one resume / job description comparison.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub sections: SectionMap,
    pub scores: MatchScores,
    pub experience_match: ComponentMatch,
    pub skills_match: ComponentMatch,
    pub resume_characters: usize,
    pub job_description_characters: usize,
    pub processing_time_ms: u64,
}

/// How one component score was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentMatch {
    pub section: SectionType,
    pub score: f64,
    /// Tier that produced the score; `None` when nothing was compared
    pub tier: Option<Tier>,
    /// The section was missing, so the whole resume text stood in for it
    pub used_full_text: bool,
}

impl MatchAnalyzer {
    pub fn new(config: &Config) -> Self {
        let capabilities = Capabilities::detect(config);
        let scorer = SimilarityScorer::new(&capabilities, &config.scoring);
        info!("Similarity tiers: {:?}", scorer.tiers());

        Self {
            scorer,
            aggregator: ScoreAggregator::new(&config.scoring),
            capabilities,
            sentence_groups: config.scoring.sentence_groups,
        }
    }

    pub fn with_scorer(scorer: SimilarityScorer, config: &Config) -> Self {
        Self {
            scorer,
            aggregator: ScoreAggregator::new(&config.scoring),
            capabilities: Capabilities::detect(config),
            sentence_groups: config.scoring.sentence_groups,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn analyze(&self, resume_text: &str, job_description: &str) -> MatchReport {
        let resume = Document::new(resume_text.to_string(), String::new(), DocumentType::Resume);
        let job = Document::new(
            job_description.to_string(),
            String::new(),
            DocumentType::JobDescription,
        );
        self.analyze_documents(&resume, &job)
    }

    pub fn analyze_documents(&self, resume: &Document, job: &Document) -> MatchReport {
        let start_time = Instant::now();

        let sections = resume.sections();
        debug!("Resume sections found: {}", sections.found_count());

        let job_group = self.prepare(&job.normalized);
        let experience_match =
            self.compare(&job_group, &sections, SectionType::Experience, &resume.normalized);
        let skills_match =
            self.compare(&job_group, &sections, SectionType::Skills, &resume.normalized);

        let scores = self
            .aggregator
            .aggregate(experience_match.score, skills_match.score);

        info!(
            "Match scores: overall {:.3}, job description {:.3}, skills {:.3}",
            scores.overall, scores.jobdes, scores.skills
        );

        MatchReport {
            sections,
            scores,
            experience_match,
            skills_match,
            resume_characters: resume.metadata.character_count,
            job_description_characters: job.metadata.character_count,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        }
    }

    /// Score the job description against one resume section, falling back to
    /// the full resume text when the section has nothing to compare.
    fn compare(
        &self,
        job_group: &[String],
        sections: &SectionMap,
        section: SectionType,
        full_text: &str,
    ) -> ComponentMatch {
        let mut used_full_text = false;
        let mut group = sections
            .get(section)
            .map(|text| self.prepare(text))
            .unwrap_or_default();

        if group.is_empty() && !full_text.is_empty() {
            debug!("{} section empty, using full resume text", section);
            group = self.prepare(full_text);
            used_full_text = true;
        }

        let result = if group.is_empty() || job_group.is_empty() {
            ScoreResult::zero()
        } else {
            self.scorer.score(job_group, &group)
        };

        ComponentMatch {
            section,
            score: result.score,
            tier: result.tier,
            used_full_text,
        }
    }

    /// Preprocess text into a scoring group, one entry per sentence when
    /// sentence groups are enabled.
    fn prepare(&self, text: &str) -> Vec<String> {
        let pieces = if self.sentence_groups {
            split_into_sentences(text)
        } else {
            vec![text.to_string()]
        };

        pieces
            .iter()
            .map(|piece| preprocess(piece))
            .filter(|piece| !piece.is_empty())
            .collect()
    }
}

impl Default for MatchAnalyzer {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
