//! Resume scorer library
//!
//! Splits resume text into canonical sections and scores how well it
//! matches a job description.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, ResumeScorerError};
pub use processing::aggregator::{aggregate, MatchScores};
pub use processing::analyzer::{MatchAnalyzer, MatchReport};
pub use processing::document::{SectionMap, SectionType, SECTION_NOT_FOUND};
pub use processing::segmenter::segment;
pub use processing::similarity::similarity;
pub use processing::text_processor::{normalize, preprocess};
