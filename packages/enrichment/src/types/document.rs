//! Output document types - what an enrichment call produces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named external source backing a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorySource {
    /// Publication or site name
    pub name: String,
    /// Link to the corroborating page
    pub url: String,
}

/// One verified (or explicitly unverified) local-interest story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryItem {
    /// Entity the story is about (venue, event, program)
    pub entity: String,
    /// The claim, in context
    pub context: String,
    /// Corroborating source. None only when the story carries an
    /// annotation saying why (a note, or the exclusion marker in context).
    pub source: Option<StorySource>,
    /// Second corroborating source, when the backend found one
    #[serde(default)]
    pub secondary_source: Option<StorySource>,
    /// Editorial annotation from the backend (caveats, freshness notes)
    #[serde(default)]
    pub note: Option<String>,
    /// Deterministic search link for the entity in this locale.
    /// Always present, whether or not a real source exists.
    pub fallback_url: String,
}

/// An ordered group of stories under one heading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryCategory {
    pub name: String,
    pub stories: Vec<StoryItem>,
}

/// A substring of the final prose nominated for hyperlinking.
///
/// Validity is checked, not stored: a candidate survives validation only
/// if its text occurs verbatim in the sanitized prose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCandidate {
    pub text: String,
}

/// What happened to the machine-readable block for this document.
///
/// Separates a parser miss from a genuinely quiet locale, so callers can
/// alert on the former without treating the latter as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PayloadStatus {
    /// Block parsed and carried at least one story
    #[default]
    Parsed,
    /// Block parsed but carried no stories
    ParsedEmpty,
    /// No block could be recovered; document is prose-only
    Unparsed,
}

/// The publication-ready result of one enrichment call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedDocument {
    /// Human-readable local date label
    pub date_label: String,
    /// Neighborhood or place this document covers
    pub locale_name: String,
    /// Verified stories, grouped. Empty is a legitimate outcome.
    pub categories: Vec<StoryCategory>,
    /// Sanitized narrative with links injected. Always present.
    pub prose: String,
    /// Model identifier that produced the raw text
    pub model: String,
    /// Blocked-domain list that was applied during validation
    pub blocked_domains: Vec<String>,
    /// Short notification subject (1-5 words, at most 40 chars), if one validated
    pub subject_teaser: Option<String>,
    /// One-line email preview (10-200 chars), if one validated
    pub email_teaser: Option<String>,
    /// How the machine-readable block fared
    pub payload_status: PayloadStatus,
    /// When this document was assembled
    pub generated_at: DateTime<Utc>,
}

impl EnrichedDocument {
    /// Whether this is a prose-only document (no structured stories).
    pub fn is_prose_only(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of stories across all categories.
    pub fn story_count(&self) -> usize {
        self.categories.iter().map(|c| c.stories.len()).sum()
    }
}
