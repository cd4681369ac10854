//! Locale types - where and when a document is being produced.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Caller-supplied facts about the place a document is written for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleFacts {
    /// Neighborhood or place name (e.g. "Longfellow")
    pub neighborhood: String,
    /// City the neighborhood belongs to
    pub city: String,
    /// Country, as a name or ISO code (drives the timezone fallback)
    pub country: String,
    /// Explicit IANA timezone, when the caller knows it
    #[serde(default)]
    pub timezone: Option<String>,
    /// Output language hint (e.g. "es"); None keeps the default language
    #[serde(default)]
    pub language: Option<String>,
}

impl LocaleFacts {
    pub fn new(
        neighborhood: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            neighborhood: neighborhood.into(),
            city: city.into(),
            country: country.into(),
            timezone: None,
            language: None,
        }
    }

    /// Set an explicit IANA timezone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Set an output language hint.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Document type. Selects the style-directive bundle for the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EditionKind {
    /// Conversational morning edition with a greeting
    #[default]
    Daily,
    /// Direct, no-greeting edition for returning readers
    Briefing,
    /// Forward-looking weekend edition organized by day
    Weekend,
}

impl EditionKind {
    /// Lowercase label for prompts and logs.
    pub fn label(&self) -> &'static str {
        match self {
            EditionKind::Daily => "daily",
            EditionKind::Briefing => "briefing",
            EditionKind::Weekend => "weekend",
        }
    }

    /// Editorial style directives for this edition.
    ///
    /// Data, not branching logic: a new edition kind adds a row here and
    /// nothing downstream changes.
    pub fn style_directives(&self) -> &'static [&'static str] {
        match self {
            EditionKind::Daily => &[
                "Open with a one-line conversational greeting that mentions the neighborhood.",
                "Write in a warm, neighborly voice, as if texting a friend who asked what's happening.",
                "Keep each item to two or three sentences.",
            ],
            EditionKind::Briefing => &[
                "No greeting. Open directly with the most interesting verified item.",
                "Keep the voice brisk and factual.",
                "Keep each item to one or two sentences.",
            ],
            EditionKind::Weekend => &[
                "No greeting. Organize the items by day, Saturday first, then Sunday.",
                "Lead each day with a [[Header]] marker naming the day.",
                "Prefer forward-looking phrasing for things readers can still attend.",
            ],
        }
    }
}

/// Resolved, immutable context for one enrichment call.
///
/// Built once by the resolver; every later stage reads from it and none
/// may change it.
#[derive(Debug, Clone)]
pub struct LocaleContext {
    pub facts: LocaleFacts,
    /// Resolved IANA timezone
    pub timezone: Tz,
    /// The instant "now" is measured from (caller-supplied or wall clock)
    pub reference_instant: DateTime<Utc>,
    /// Human-readable local date, e.g. "Tuesday, August 25, 2026"
    pub date_label: String,
    /// Locale-local timestamp string for the outgoing request
    pub local_timestamp: String,
    /// Canonical local hour the document is framed as delivered at
    pub publication_hour: u32,
    /// Edition kind this call is producing
    pub edition: EditionKind,
}

impl LocaleContext {
    /// The reference instant expressed in local time.
    pub fn local_now(&self) -> DateTime<Tz> {
        self.reference_instant.with_timezone(&self.timezone)
    }

    /// Style directives for this context's edition.
    pub fn style_directives(&self) -> &'static [&'static str] {
        self.edition.style_directives()
    }
}
