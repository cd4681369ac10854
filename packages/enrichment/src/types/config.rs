//! Configuration for the enrichment pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::text::teaser::TeaserRules;
use crate::types::locale::EditionKind;

/// Bounded retry schedule for the quota/rate-limit error class.
///
/// `delays` holds the sleep before each retry, so `delays.len()` is the
/// maximum number of retries and the worst-case added latency is their sum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub delays: Vec<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delays: vec![
                Duration::from_secs(2),
                Duration::from_secs(5),
                Duration::from_secs(15),
            ],
        }
    }
}

impl RetryPolicy {
    pub fn new(delays: Vec<Duration>) -> Self {
        Self { delays }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self { delays: Vec::new() }
    }

    /// Maximum number of retries (not counting the first attempt).
    pub fn max_retries(&self) -> usize {
        self.delays.len()
    }
}

/// Configuration for the enrichment pipeline.
///
/// Everything that would otherwise be a module-level table (blocked
/// domains, timezone fallbacks, phrase lists) lives here as data, so
/// tests can substitute fixtures without touching global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichConfig {
    /// Backend model identifier used unless a call overrides it
    pub model: String,
    /// Source domains excluded from citations (substring match on the URL)
    pub blocked_domains: Vec<String>,
    /// Regex rejecting greeting-style email teasers
    pub greeting_pattern: String,
    /// Country (name or ISO code) to IANA timezone fallback table
    pub timezone_fallbacks: HashMap<String, String>,
    /// Zone used when the country is not in the table
    pub default_timezone: String,
    /// Canonical local hour the document is framed as delivered at
    pub publication_hour: u32,
    /// Base URL for fallback and injected search links
    pub search_base_url: String,
    /// Retry schedule for the quota error class
    pub retry: RetryPolicy,
    /// Phrase tables for teaser cleanup
    pub teaser_rules: TeaserRules,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            model: crate::GEMINI_FLASH.to_string(),
            blocked_domains: default_blocked_domains(),
            greeting_pattern:
                r"(?i)^(hi|hey|hello|howdy|greetings|good (morning|afternoon|evening)|dear)\b"
                    .to_string(),
            timezone_fallbacks: default_timezone_fallbacks(),
            default_timezone: "America/Chicago".to_string(),
            publication_hour: 7,
            search_base_url: "https://www.google.com/search".to_string(),
            retry: RetryPolicy::default(),
            teaser_rules: TeaserRules::default(),
        }
    }
}

impl EnrichConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Replace the blocked-domain list.
    pub fn with_blocked_domains(
        mut self,
        domains: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.blocked_domains = domains.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the retry schedule.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the zone used when the country is unrecognized.
    pub fn with_default_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.default_timezone = timezone.into();
        self
    }

    /// Set the canonical publication hour.
    pub fn with_publication_hour(mut self, hour: u32) -> Self {
        self.publication_hour = hour;
        self
    }

    /// Replace the teaser phrase tables.
    pub fn with_teaser_rules(mut self, rules: TeaserRules) -> Self {
        self.teaser_rules = rules;
        self
    }
}

/// Per-call overrides accepted by [`Enricher::enrich`](crate::Enricher::enrich).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichOptions {
    /// Override the backend model identifier
    #[serde(default)]
    pub model: Option<String>,
    /// Reference instant for "today"/"tomorrow" (e.g. when the draft was
    /// captured); None uses the wall clock
    #[serde(default)]
    pub reference_instant: Option<DateTime<Utc>>,
    /// Override the draft's edition kind
    #[serde(default)]
    pub edition: Option<EditionKind>,
}

impl EnrichOptions {
    /// Override the model for this call.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Pin the reference instant for this call.
    pub fn with_reference_instant(mut self, instant: DateTime<Utc>) -> Self {
        self.reference_instant = Some(instant);
        self
    }

    /// Override the edition kind for this call.
    pub fn with_edition(mut self, edition: EditionKind) -> Self {
        self.edition = Some(edition);
        self
    }
}

fn default_blocked_domains() -> Vec<String> {
    [
        "facebook.com",
        "instagram.com",
        "twitter.com",
        "x.com",
        "tiktok.com",
        "reddit.com",
        "pinterest.com",
        "linktr.ee",
    ]
    .map(String::from)
    .to_vec()
}

fn default_timezone_fallbacks() -> HashMap<String, String> {
    [
        ("US", "America/Chicago"),
        ("United States", "America/Chicago"),
        ("CA", "America/Toronto"),
        ("Canada", "America/Toronto"),
        ("GB", "Europe/London"),
        ("United Kingdom", "Europe/London"),
        ("IE", "Europe/Dublin"),
        ("Ireland", "Europe/Dublin"),
        ("AU", "Australia/Sydney"),
        ("Australia", "Australia/Sydney"),
        ("NZ", "Pacific/Auckland"),
        ("New Zealand", "Pacific/Auckland"),
        ("MX", "America/Mexico_City"),
        ("Mexico", "America/Mexico_City"),
    ]
    .map(|(country, tz)| (country.to_string(), tz.to_string()))
    .into_iter()
    .collect()
}
