//! Document structures and section maps

use crate::processing::segmenter;
use crate::processing::text_processor;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Value reported for a section with no content.
pub const SECTION_NOT_FOUND: &str = "Section not found.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub normalized: String,
    pub file_path: String,
    pub document_type: DocumentType,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Resume,
    JobDescription,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub word_count: usize,
    pub character_count: usize,
}

/// Canonical section names, the fixed output vocabulary of the segmenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionType {
    Education,
    Experience,
    Projects,
    Publications,
    Skills,
}

impl SectionType {
    pub const ALL: [SectionType; 5] = [
        SectionType::Education,
        SectionType::Experience,
        SectionType::Projects,
        SectionType::Publications,
        SectionType::Skills,
    ];

    /// Header variants recognized for this section, as regex fragments.
    pub fn header_variants(self) -> &'static [&'static str] {
        match self {
            SectionType::Education => &[
                r"education",
                r"educational\s+background",
                r"academic\s+background",
            ],
            SectionType::Experience => &[
                r"experience",
                r"work\s+experience",
                r"professional\s+experience",
                r"employment\s+history",
            ],
            SectionType::Projects => &[
                r"personal\s+projects",
                r"projects",
                r"key\s+projects",
                r"academic\s+projects",
            ],
            SectionType::Publications => &[r"publications", r"research\s+publications"],
            SectionType::Skills => &[
                r"technical\s+skills",
                r"skills",
                r"core\s+skills",
                r"technical\s+expertise",
            ],
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for SectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionType::Education => write!(f, "Education"),
            SectionType::Experience => write!(f, "Experience"),
            SectionType::Projects => write!(f, "Projects"),
            SectionType::Publications => write!(f, "Publications"),
            SectionType::Skills => write!(f, "Skills"),
        }
    }
}

/// Content of every canonical section of one document.
///
/// All five sections are always present; a section without content reads as
/// [`SECTION_NOT_FOUND`] through [`SectionMap::display`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    sections: [Option<String>; 5],
}

impl SectionMap {
    /// The all-"not found" map.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, section: SectionType) -> Option<&str> {
        self.sections[section.index()].as_deref()
    }

    pub fn display(&self, section: SectionType) -> &str {
        self.get(section).unwrap_or(SECTION_NOT_FOUND)
    }

    pub fn is_found(&self, section: SectionType) -> bool {
        self.get(section).is_some()
    }

    pub fn found_count(&self) -> usize {
        self.sections.iter().filter(|s| s.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionType, &str)> + '_ {
        SectionType::ALL
            .into_iter()
            .map(move |section| (section, self.display(section)))
    }

    pub(crate) fn insert(&mut self, section: SectionType, content: String) {
        let content = content.trim();
        self.sections[section.index()] = if content.is_empty() {
            None
        } else {
            Some(content.to_string())
        };
    }
}

impl Serialize for SectionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SectionType::ALL.len()))?;
        for (section, content) in self.iter() {
            map.serialize_entry(&section.to_string(), content)?;
        }
        map.end()
    }
}

impl Document {
    pub fn new(content: String, file_path: String, document_type: DocumentType) -> Self {
        let normalized = text_processor::normalize(&content);
        let word_count = normalized.split_whitespace().count();
        let character_count = normalized.chars().count();

        Self {
            content,
            normalized,
            file_path,
            document_type,
            metadata: DocumentMetadata {
                word_count,
                character_count,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    /// Segment the normalized text with the default header variants.
    pub fn sections(&self) -> SectionMap {
        segmenter::segment(&self.normalized)
    }
}
