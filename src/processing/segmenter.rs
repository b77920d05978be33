//! Header-driven section segmentation
//!
//! Every occurrence of every header variant becomes a marker. Markers are
//! ordered by start offset and each one owns the text up to the next marker,
//! whatever section that next marker names. Fragments of the same section are
//! then joined in document order.

use crate::error::{Result, ResumeScorerError};
use crate::processing::document::{SectionMap, SectionType};
use crate::processing::text_processor::collapse_whitespace;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static DEFAULT_SEGMENTER: LazyLock<SectionSegmenter> = LazyLock::new(SectionSegmenter::default);

/// A located header occurrence, in byte offsets of the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionMarker {
    pub start: usize,
    pub end: usize,
    pub section: SectionType,
}

/// Compiled header patterns, in scan order.
pub struct SectionSegmenter {
    patterns: Vec<(SectionType, Regex)>,
}

impl SectionSegmenter {
    /// Create a segmenter with the default header variants of each section
    pub fn new() -> Result<Self> {
        let variants = SectionType::ALL
            .into_iter()
            .flat_map(|section| section.header_variants().iter().map(move |v| (section, *v)));

        Self::with_variants(variants)
    }

    /// Create a segmenter from `(section, pattern)` pairs.
    ///
    /// Patterns are matched case-insensitively at word boundaries and swallow
    /// any trailing whitespace, colons and dashes.
    pub fn with_variants<'a, I>(variants: I) -> Result<Self>
    where
        I: IntoIterator<Item = (SectionType, &'a str)>,
    {
        let patterns = variants
            .into_iter()
            .map(|(section, variant)| {
                Regex::new(&format!(r"(?i)\b{}\b\s*[-:]*", variant))
                    .map(|regex| (section, regex))
                    .map_err(|e| {
                        ResumeScorerError::TextProcessing(format!(
                            "Invalid header pattern '{}' for {}: {}",
                            variant, section, e
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Find every header occurrence, sorted by start offset.
    ///
    /// Markers starting at the same offset keep scan order.
    pub fn find_markers(&self, text: &str) -> Vec<SectionMarker> {
        let mut markers: Vec<SectionMarker> = self
            .patterns
            .iter()
            .flat_map(|(section, regex)| {
                regex.find_iter(text).map(move |m| SectionMarker {
                    start: m.start(),
                    end: m.end(),
                    section: *section,
                })
            })
            .collect();

        markers.sort_by_key(|marker| marker.start);
        markers
    }

    /// Split normalized text into its canonical sections.
    pub fn segment(&self, text: &str) -> SectionMap {
        let markers = self.find_markers(text);
        if markers.is_empty() {
            debug!("No section headers found in {} characters of text", text.len());
            return SectionMap::empty();
        }

        debug!("Found {} section markers", markers.len());

        let mut fragments: Vec<Vec<&str>> = vec![Vec::new(); SectionType::ALL.len()];
        for (idx, span) in content_spans(&markers, text.len()).into_iter().enumerate() {
            let content = span.map(|(from, to)| text[from..to].trim()).unwrap_or_default();
            if !content.is_empty() {
                fragments[markers[idx].section as usize].push(content);
            }
        }

        let mut sections = SectionMap::empty();
        for (section, parts) in SectionType::ALL.into_iter().zip(fragments) {
            sections.insert(section, collapse_whitespace(&parts.join(" ")));
        }

        sections
    }
}

/// Content span of each marker: from its end to the next marker's start, or
/// to `text_len` for the last one. `None` when a later marker overlaps it.
fn content_spans(markers: &[SectionMarker], text_len: usize) -> Vec<Option<(usize, usize)>> {
    markers
        .iter()
        .enumerate()
        .map(|(idx, marker)| {
            let next_start = markers.get(idx + 1).map_or(text_len, |next| next.start);
            (marker.end < next_start).then_some((marker.end, next_start))
        })
        .collect()
}

impl Default for SectionSegmenter {
    fn default() -> Self {
        Self::new().expect("Failed to compile default section headers")
    }
}

/// Segment normalized text with the default header variants.
pub fn segment(text: &str) -> SectionMap {
    DEFAULT_SEGMENTER.segment(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::document::SECTION_NOT_FOUND;

    #[test]
    fn test_basic_segmentation() {
        let text = "Education: BS Computer Science, MIT. Experience: Built scalable backend systems in Python and Go. Skills: Python, Go, SQL, distributed systems.";
        let sections = segment(text);

        assert_eq!(sections.display(SectionType::Education), "BS Computer Science, MIT.");
        assert_eq!(
            sections.display(SectionType::Experience),
            "Built scalable backend systems in Python and Go."
        );
        assert_eq!(
            sections.display(SectionType::Skills),
            "Python, Go, SQL, distributed systems."
        );
        assert_eq!(sections.display(SectionType::Projects), SECTION_NOT_FOUND);
        assert_eq!(sections.display(SectionType::Publications), SECTION_NOT_FOUND);
    }

    #[test]
    fn test_no_markers_returns_all_not_found() {
        for text in ["Lorem ipsum dolor sit amet", ""] {
            let sections = segment(text);
            assert_eq!(sections, SectionMap::empty());
            assert!(sections.iter().all(|(_, content)| content == SECTION_NOT_FOUND));
        }
    }

    #[test]
    fn test_interleaved_headers_merge_in_order() {
        let text = "Education: BS Physics. Experience: Lab assistant. Education: MS Physics.";
        let sections = segment(text);

        assert_eq!(sections.display(SectionType::Education), "BS Physics. MS Physics.");
        assert_eq!(sections.display(SectionType::Experience), "Lab assistant.");
    }

    #[test]
    fn test_overlapping_variants_are_not_double_counted() {
        let text = "Work Experience: Backend developer at Acme";
        let segmenter = SectionSegmenter::default();

        let markers = segmenter.find_markers(text);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].start, 0);
        assert_eq!(markers[1].start, 5);

        let sections = segmenter.segment(text);
        assert_eq!(sections.display(SectionType::Experience), "Backend developer at Acme");
    }

    #[test]
    fn test_header_followed_by_header_contributes_nothing() {
        let text = "Projects Skills: Rust";
        let sections = segment(text);

        assert!(!sections.is_found(SectionType::Projects));
        assert_eq!(sections.display(SectionType::Skills), "Rust");
    }

    #[test]
    fn test_header_matching_is_case_insensitive_with_trailing_punctuation() {
        let text = "TECHNICAL SKILLS -- Rust, Go PUBLICATIONS: Paper one";
        let sections = segment(text);

        assert_eq!(sections.display(SectionType::Skills), "Rust, Go");
        assert_eq!(sections.display(SectionType::Publications), "Paper one");
    }

    #[test]
    fn test_word_boundaries_are_respected() {
        let sections = segment("Inexperienced reskillsed person");
        assert_eq!(sections.found_count(), 0);
    }

    #[test]
    fn test_spans_never_cross_next_marker() {
        let text = "Skills: Rust Education: BSc Experience Projects: compiler Publications: none";
        let segmenter = SectionSegmenter::default();
        let markers = segmenter.find_markers(text);
        let spans = content_spans(&markers, text.len());

        for (idx, span) in spans.iter().enumerate() {
            if let (Some((_, to)), Some(next)) = (span, markers.get(idx + 1)) {
                assert!(*to <= next.start);
            }
        }
    }

    #[test]
    fn test_segmentation_is_deterministic() {
        let text = "Key Projects: parser. Projects: lexer. Technical Skills: Rust Skills: Go";
        assert_eq!(segment(text), segment(text));
    }

    #[test]
    fn test_invalid_custom_variant_is_error() {
        let result = SectionSegmenter::with_variants([(SectionType::Skills, "(unclosed")]);
        assert!(result.is_err());
    }
}
