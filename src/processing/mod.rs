//! Section segmentation and similarity scoring

pub mod aggregator;
pub mod analyzer;
pub mod document;
pub mod segmenter;
pub mod similarity;
pub mod text_processor;
