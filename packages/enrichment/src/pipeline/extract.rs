//! Payload extraction and validation - raw backend text to checked fields.
//!
//! Nothing in here fails the call. A missing or malformed machine block
//! degrades to a prose-only result; an invalid field is dropped, not
//! repaired into the document.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::text::sanitize::sanitize_prose;
use crate::text::teaser::clean_teaser;
use crate::types::config::EnrichConfig;
use crate::types::document::{LinkCandidate, PayloadStatus, StoryCategory, StoryItem, StorySource};
use crate::types::locale::LocaleContext;

/// Context prefix marking a story whose source was excluded by the
/// blocked-domain list.
pub const EXCLUSION_MARKER: &str = "[source excluded] ";

/// Wire shape of the machine-readable block. Tolerant by design: every
/// field defaults, unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPayload {
    #[serde(default)]
    pub categories: Vec<RawCategory>,
    #[serde(default)]
    pub link_candidates: Vec<RawLinkCandidate>,
    #[serde(default)]
    pub subject_teaser: Option<String>,
    #[serde(default)]
    pub email_teaser: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCategory {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stories: Vec<RawStory>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawStory {
    #[serde(default)]
    pub entity: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub source: Option<RawSource>,
    #[serde(default)]
    pub secondary_source: Option<RawSource>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLinkCandidate {
    #[serde(default)]
    pub text: String,
}

/// Everything the validator hands to link injection and assembly.
#[derive(Debug, Clone)]
pub struct ValidatedExtraction {
    pub prose: String,
    pub categories: Vec<StoryCategory>,
    pub link_candidates: Vec<LinkCandidate>,
    pub subject_teaser: Option<String>,
    pub email_teaser: Option<String>,
    pub payload_status: PayloadStatus,
}

/// Parse and validate raw backend text.
pub fn extract_and_validate(
    raw_text: &str,
    context: &LocaleContext,
    config: &EnrichConfig,
) -> ValidatedExtraction {
    let (remainder, payload) = split_payload(raw_text);
    let prose = sanitize_prose(&remainder);

    let payload = match payload {
        Some(payload) => payload,
        None => {
            warn!("No machine-readable block recovered, producing prose-only document");
            return ValidatedExtraction {
                prose,
                categories: Vec::new(),
                link_candidates: Vec::new(),
                subject_teaser: None,
                email_teaser: None,
                payload_status: PayloadStatus::Unparsed,
            };
        }
    };

    let subject_teaser = payload.subject_teaser.as_deref().and_then(validate_subject_teaser);
    let email_teaser = payload
        .email_teaser
        .as_deref()
        .and_then(|teaser| validate_email_teaser(teaser, config));
    let link_candidates = validate_link_candidates(payload.link_candidates, &prose);
    let categories = transform_categories(payload.categories, context, config);

    let payload_status = if categories.iter().any(|c| !c.stories.is_empty()) {
        PayloadStatus::Parsed
    } else {
        PayloadStatus::ParsedEmpty
    };

    debug!(
        categories = categories.len(),
        candidates = link_candidates.len(),
        status = ?payload_status,
        "Validated machine-readable payload"
    );

    ValidatedExtraction {
        prose,
        categories,
        link_candidates,
        subject_teaser,
        email_teaser,
        payload_status,
    }
}

/// Locate the machine-readable block and carve it out of the raw text.
///
/// Searches rather than assuming position: a ```json fence anywhere wins;
/// failing that, the first brace-balanced object that parses and carries
/// at least one contract key is taken. Neither found means prose-only.
pub fn split_payload(raw: &str) -> (String, Option<RawPayload>) {
    let fence = Regex::new(r"(?s)```[a-zA-Z]*\s*(\{.*?\})\s*```").unwrap();
    for captures in fence.captures_iter(raw) {
        let whole = captures.get(0).unwrap();
        let inner = captures.get(1).unwrap().as_str();
        match payload_from_json(inner) {
            Some(payload) => {
                let remainder = format!("{}{}", &raw[..whole.start()], &raw[whole.end()..]);
                return (remainder, Some(payload));
            }
            None => {
                warn!("Fenced block found but did not parse as a payload, trying brace scan");
            }
        }
    }

    if let Some((start, end, payload)) = scan_for_payload(raw) {
        let remainder = format!("{}{}", &raw[..start], &raw[end..]);
        return (remainder, Some(payload));
    }

    (raw.to_string(), None)
}

/// Parse text as a payload object. Requires at least one contract key so
/// an incidental `{}` in prose is not mistaken for the block.
fn payload_from_json(text: &str) -> Option<RawPayload> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    let object = value.as_object()?;

    const CONTRACT_KEYS: [&str; 4] = [
        "categories",
        "link_candidates",
        "subject_teaser",
        "email_teaser",
    ];
    if !CONTRACT_KEYS.iter().any(|key| object.contains_key(*key)) {
        return None;
    }

    serde_json::from_value(value).ok()
}

/// Scan for the first brace-balanced object that parses as a payload.
fn scan_for_payload(raw: &str) -> Option<(usize, usize, RawPayload)> {
    let bytes = raw.as_bytes();
    for (index, byte) in bytes.iter().enumerate() {
        if *byte != b'{' {
            continue;
        }
        if let Some(end) = balanced_end(bytes, index) {
            if let Some(payload) = payload_from_json(&raw[index..end]) {
                return Some((index, end, payload));
            }
        }
    }
    None
}

/// Byte offset just past the brace that balances the one at `start`.
/// String-aware: braces inside JSON strings do not count.
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Gate: 1-5 words inclusive and at most 40 characters.
pub fn validate_subject_teaser(teaser: &str) -> Option<String> {
    let trimmed = teaser.trim();
    let words = trimmed.split_whitespace().count();
    if !(1..=5).contains(&words) || trimmed.chars().count() > 40 {
        warn!(teaser = %trimmed, "Subject teaser failed validation, dropping");
        return None;
    }
    Some(trimmed.to_string())
}

/// Gate: after cleanup, 10-200 characters, a terminal `.` or `!`, and not
/// a greeting.
pub fn validate_email_teaser(teaser: &str, config: &EnrichConfig) -> Option<String> {
    let cleaned = clean_teaser(teaser, &config.teaser_rules);

    let length = cleaned.chars().count();
    if !(10..=200).contains(&length) {
        warn!(length, "Email teaser failed length gate, dropping");
        return None;
    }
    if !cleaned.ends_with('.') && !cleaned.ends_with('!') {
        warn!(teaser = %cleaned, "Email teaser missing terminal punctuation, dropping");
        return None;
    }

    match Regex::new(&config.greeting_pattern) {
        Ok(greeting) if greeting.is_match(&cleaned) => {
            warn!(teaser = %cleaned, "Email teaser reads as a greeting, dropping");
            return None;
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Invalid greeting pattern, skipping greeting gate"),
    }

    Some(cleaned)
}

/// Gate: candidate text must occur verbatim (case-sensitive) in the prose.
pub fn validate_link_candidates(
    raw: Vec<RawLinkCandidate>,
    prose: &str,
) -> Vec<LinkCandidate> {
    raw.into_iter()
        .filter_map(|candidate| {
            let text = candidate.text.trim().to_string();
            if text.is_empty() {
                return None;
            }
            if prose.contains(&text) {
                Some(LinkCandidate { text })
            } else {
                debug!(candidate = %text, "Link candidate not present in prose, dropping");
                None
            }
        })
        .collect()
}

/// Deterministic search link for an entity in this locale.
pub fn fallback_search_url(entity: &str, context: &LocaleContext, config: &EnrichConfig) -> String {
    let query = format!(
        "{} {} {}",
        entity, context.facts.neighborhood, context.facts.city
    );
    match Url::parse_with_params(&config.search_base_url, &[("q", query.as_str())]) {
        Ok(url) => url.to_string(),
        Err(_) => config.search_base_url.clone(),
    }
}

fn transform_categories(
    raw: Vec<RawCategory>,
    context: &LocaleContext,
    config: &EnrichConfig,
) -> Vec<StoryCategory> {
    raw.into_iter()
        .map(|category| StoryCategory {
            name: category.name.trim().to_string(),
            stories: category
                .stories
                .into_iter()
                .filter_map(|story| transform_story(story, context, config))
                .collect(),
        })
        .filter(|category| !category.stories.is_empty())
        .collect()
}

/// Validate one story and apply the blocked-domain post-filter.
///
/// The filter is the one sanctioned post-construction adjustment: it may
/// null the source and prefix the context with [`EXCLUSION_MARKER`], and
/// the story survives because the marker is its annotation.
fn transform_story(
    raw: RawStory,
    context: &LocaleContext,
    config: &EnrichConfig,
) -> Option<StoryItem> {
    let entity = raw.entity.trim().to_string();
    if entity.is_empty() {
        warn!("Story with empty entity, dropping");
        return None;
    }

    let mut context_text = raw.context.trim().to_string();
    let mut source = raw.source.and_then(source_from_raw);
    let mut secondary_source = raw.secondary_source.and_then(source_from_raw);
    let note = raw
        .note
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    if source.is_none() && note.is_none() {
        debug!(entity = %entity, "Unverified story without annotation, dropping");
        return None;
    }

    if let Some(existing) = &source {
        if let Some(blocked) = blocked_domain(&existing.url, config) {
            warn!(entity = %entity, domain = %blocked, "Primary source excluded by blocked-domain list");
            source = None;
            context_text = format!("{}{}", EXCLUSION_MARKER, context_text);
        }
    }
    if let Some(existing) = &secondary_source {
        if let Some(blocked) = blocked_domain(&existing.url, config) {
            warn!(entity = %entity, domain = %blocked, "Secondary source excluded by blocked-domain list");
            secondary_source = None;
        }
    }

    let fallback_url = fallback_search_url(&entity, context, config);

    Some(StoryItem {
        entity,
        context: context_text,
        source,
        secondary_source,
        note,
        fallback_url,
    })
}

fn blocked_domain<'a>(url: &str, config: &'a EnrichConfig) -> Option<&'a str> {
    config
        .blocked_domains
        .iter()
        .map(String::as_str)
        .find(|domain| url.contains(domain))
}

/// A source with no URL is no source at all. A source with no name keeps
/// its URL as the display name.
fn source_from_raw(raw: RawSource) -> Option<StorySource> {
    let url = raw.url.trim().to_string();
    if url.is_empty() {
        return None;
    }
    let name = raw.name.trim().to_string();
    Some(StorySource {
        name: if name.is_empty() { url.clone() } else { name },
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::resolver::resolve_locale;
    use crate::types::locale::{EditionKind, LocaleFacts};
    use chrono::{TimeZone, Utc};

    fn context() -> LocaleContext {
        let facts = LocaleFacts::new("Longfellow", "Minneapolis", "US");
        let instant = Utc
            .with_ymd_and_hms(2026, 8, 25, 23, 0, 0)
            .single()
            .expect("valid instant");
        resolve_locale(&facts, Some(instant), EditionKind::Daily, &EnrichConfig::default())
    }

    #[test]
    fn test_split_payload_carves_fenced_block() {
        let raw = "Before the block.\n```json\n{\"categories\": []}\n```\nAfter the block.";
        let (remainder, payload) = split_payload(raw);

        assert!(payload.is_some());
        assert!(remainder.contains("Before the block."));
        assert!(remainder.contains("After the block."));
        assert!(!remainder.contains("```"));
    }

    #[test]
    fn test_split_payload_brace_scan_without_fence() {
        let raw = "Prose first.\n{\"subject_teaser\": \"Big week ahead\"}\nProse after.";
        let (remainder, payload) = split_payload(raw);

        assert_eq!(payload.unwrap().subject_teaser.as_deref(), Some("Big week ahead"));
        assert!(!remainder.contains("subject_teaser"));
    }

    #[test]
    fn test_split_payload_ignores_plain_braces_in_prose() {
        let raw = "A set like {} or {\"other\": 1} is not the payload.";
        let (remainder, payload) = split_payload(raw);

        assert!(payload.is_none());
        assert_eq!(remainder, raw);
    }

    #[test]
    fn test_split_payload_handles_braces_inside_strings() {
        let raw = r#"{"email_teaser": "Curly {braces} and a \" quote.", "categories": []}"#;
        let (_, payload) = split_payload(raw);

        assert_eq!(
            payload.unwrap().email_teaser.as_deref(),
            Some("Curly {braces} and a \" quote.")
        );
    }

    #[test]
    fn test_no_payload_degrades_to_prose_only() {
        let result = extract_and_validate(
            "Good morning! A quiet week in the neighborhood.",
            &context(),
            &EnrichConfig::default(),
        );

        assert_eq!(result.payload_status, PayloadStatus::Unparsed);
        assert!(result.categories.is_empty());
        assert!(result.subject_teaser.is_none());
        assert!(result.email_teaser.is_none());
        assert_eq!(result.prose, "Good morning! A quiet week in the neighborhood.");
    }

    #[test]
    fn test_parsed_empty_status_for_storyless_payload() {
        let raw = "Quiet week.\n```json\n{\"categories\": []}\n```";
        let result = extract_and_validate(raw, &context(), &EnrichConfig::default());

        assert_eq!(result.payload_status, PayloadStatus::ParsedEmpty);
        assert!(result.categories.is_empty());
    }

    #[test]
    fn test_subject_teaser_gates() {
        assert_eq!(
            validate_subject_teaser("Bakery news and art").as_deref(),
            Some("Bakery news and art")
        );
        // six words
        assert!(validate_subject_teaser("one two three four five six").is_none());
        // four words but over forty characters
        assert!(validate_subject_teaser(
            "extraordinarily comprehensive neighborhood bulletin"
        )
        .is_none());
        assert!(validate_subject_teaser("   ").is_none());
    }

    #[test]
    fn test_subject_teaser_limits_are_inclusive() {
        // five words exactly
        assert_eq!(
            validate_subject_teaser("Bakery news and art week").as_deref(),
            Some("Bakery news and art week")
        );
        // forty characters exactly
        let subject = "Neighborhood bakeries reopen this August";
        assert_eq!(subject.chars().count(), 40);
        assert_eq!(validate_subject_teaser(subject).as_deref(), Some(subject));
        // forty-one tips it over
        let over = "Neighborhood bakeries reopen this October";
        assert_eq!(over.chars().count(), 41);
        assert!(validate_subject_teaser(over).is_none());
        // a single word is enough
        assert_eq!(validate_subject_teaser("Openings").as_deref(), Some("Openings"));
    }

    #[test]
    fn test_email_teaser_gates() {
        let config = EnrichConfig::default();

        assert_eq!(
            validate_email_teaser("Plus, the bakery starts tomorrow.", &config).as_deref(),
            Some("The bakery now live.")
        );
        // too short after cleanup
        assert!(validate_email_teaser("Plus, hi.", &config).is_none());
        // no terminal punctuation
        assert!(validate_email_teaser("The bakery opens Saturday", &config).is_none());
        // greeting
        assert!(validate_email_teaser("Hi neighbors, lots to see this week.", &config).is_none());
        // greeting gate matches whole words only
        assert_eq!(
            validate_email_teaser("High water closes the river path.", &config).as_deref(),
            Some("High water closes the river path.")
        );
    }

    #[test]
    fn test_email_teaser_length_limits_are_inclusive() {
        let config = EnrichConfig::default();

        // ten characters exactly
        assert_eq!(
            validate_email_teaser("Go see it.", &config).as_deref(),
            Some("Go see it.")
        );
        // nine misses the floor
        assert!(validate_email_teaser("Go do it.", &config).is_none());

        // two hundred characters exactly
        let longest = format!("The {}fairs.", "very ".repeat(38));
        assert_eq!(longest.chars().count(), 200);
        assert_eq!(
            validate_email_teaser(&longest, &config).as_deref(),
            Some(longest.as_str())
        );
        // two hundred one tips it over
        let over = format!("The {}bazaar.", "very ".repeat(38));
        assert_eq!(over.chars().count(), 201);
        assert!(validate_email_teaser(&over, &config).is_none());
    }

    #[test]
    fn test_link_candidates_must_occur_verbatim() {
        let prose = "Wildflower Bakery opens Saturday.";
        let raw = vec![
            RawLinkCandidate { text: "Wildflower Bakery".to_string() },
            RawLinkCandidate { text: "wildflower bakery".to_string() },
            RawLinkCandidate { text: "Grain Belt Bottling House".to_string() },
            RawLinkCandidate { text: "  ".to_string() },
        ];

        let valid = validate_link_candidates(raw, prose);
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].text, "Wildflower Bakery");
    }

    #[test]
    fn test_blocked_domain_nulls_source_and_marks_context() {
        let config = EnrichConfig::default().with_blocked_domains(["example.com"]);
        let raw = RawStory {
            entity: "Corner Cup".to_string(),
            context: "Extending weekend hours.".to_string(),
            source: Some(RawSource {
                name: "Example".to_string(),
                url: "https://example.com/post/1".to_string(),
            }),
            secondary_source: None,
            note: None,
        };

        let story = transform_story(raw, &context(), &config).unwrap();
        assert!(story.source.is_none());
        assert_eq!(story.context, "[source excluded] Extending weekend hours.");
        assert!(!story.fallback_url.is_empty());
    }

    #[test]
    fn test_blocked_secondary_source_dropped_quietly() {
        let config = EnrichConfig::default();
        let raw = RawStory {
            entity: "Art Crawl".to_string(),
            context: "Returns this weekend.".to_string(),
            source: Some(RawSource {
                name: "Crawl Site".to_string(),
                url: "https://riversideartcrawl.org/2026".to_string(),
            }),
            secondary_source: Some(RawSource {
                name: "Forum".to_string(),
                url: "https://facebook.com/groups/x".to_string(),
            }),
            note: None,
        };

        let story = transform_story(raw, &context(), &config).unwrap();
        assert!(story.source.is_some());
        assert!(story.secondary_source.is_none());
        assert!(!story.context.starts_with(EXCLUSION_MARKER));
    }

    #[test]
    fn test_unverified_story_without_note_dropped() {
        let config = EnrichConfig::default();
        let raw = RawStory {
            entity: "Pickle Fest".to_string(),
            context: "Rumored festival.".to_string(),
            source: None,
            secondary_source: None,
            note: None,
        };

        assert!(transform_story(raw, &context(), &config).is_none());
    }

    #[test]
    fn test_unverified_story_with_note_kept() {
        let config = EnrichConfig::default();
        let raw = RawStory {
            entity: "Pickle Fest".to_string(),
            context: "Rumored festival.".to_string(),
            source: None,
            secondary_source: None,
            note: Some("Could not confirm a date with the park board".to_string()),
        };

        let story = transform_story(raw, &context(), &config).unwrap();
        assert!(story.source.is_none());
        assert!(story.note.is_some());
    }

    #[test]
    fn test_empty_categories_pruned() {
        let config = EnrichConfig::default();
        let raw = vec![
            RawCategory {
                name: "Openings".to_string(),
                stories: vec![RawStory {
                    entity: "Bakery".to_string(),
                    context: "Opens Saturday.".to_string(),
                    source: Some(RawSource {
                        name: "Messenger".to_string(),
                        url: "https://messenger.example.org/bakery".to_string(),
                    }),
                    secondary_source: None,
                    note: None,
                }],
            },
            RawCategory {
                name: "Events".to_string(),
                stories: vec![RawStory::default()],
            },
        ];

        let categories = transform_categories(raw, &context(), &config);
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Openings");
    }

    #[test]
    fn test_fallback_url_is_locale_scoped_and_encoded() {
        let url = fallback_search_url("Joe's Pizza", &context(), &EnrichConfig::default());

        assert!(url.starts_with("https://www.google.com/search?q="));
        assert!(url.contains("Longfellow"));
        assert!(url.contains("Minneapolis"));
        assert!(!url.contains(' '));
    }
}
