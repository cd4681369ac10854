//! Final assembly of the enriched document.
//!
//! Combines the validated extraction, the linked prose, and the locale
//! context into the [`EnrichedDocument`] handed back to the caller. No
//! validation happens here; everything arriving at this stage is
//! already in its final shape.

use chrono::Utc;
use tracing::info;

use crate::pipeline::extract::ValidatedExtraction;
use crate::types::config::EnrichConfig;
use crate::types::document::EnrichedDocument;
use crate::types::locale::LocaleContext;

/// Assemble the final document from the pipeline's intermediate products.
pub fn assemble_document(
    extraction: ValidatedExtraction,
    linked_prose: String,
    context: &LocaleContext,
    model: &str,
    config: &EnrichConfig,
) -> EnrichedDocument {
    let document = EnrichedDocument {
        date_label: context.date_label.clone(),
        locale_name: context.facts.neighborhood.clone(),
        categories: extraction.categories,
        prose: linked_prose,
        model: model.to_string(),
        blocked_domains: config.blocked_domains.clone(),
        subject_teaser: extraction.subject_teaser,
        email_teaser: extraction.email_teaser,
        payload_status: extraction.payload_status,
        generated_at: Utc::now(),
    };

    info!(
        locale = %document.locale_name,
        stories = document.story_count(),
        prose_only = document.is_prose_only(),
        status = ?document.payload_status,
        "assembled enriched document"
    );

    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::resolver::resolve_locale;
    use crate::types::document::{PayloadStatus, StoryCategory, StoryItem};
    use crate::types::locale::{EditionKind, LocaleFacts};
    use chrono::TimeZone;

    fn context() -> LocaleContext {
        let facts = LocaleFacts::new("Longfellow", "Minneapolis", "US");
        let instant = Utc.with_ymd_and_hms(2026, 8, 25, 23, 0, 0).unwrap();
        resolve_locale(
            &facts,
            Some(instant),
            EditionKind::Daily,
            &EnrichConfig::default(),
        )
    }

    fn extraction() -> ValidatedExtraction {
        ValidatedExtraction {
            prose: "Good morning, Longfellow!".to_string(),
            categories: vec![StoryCategory {
                name: "Openings".to_string(),
                stories: vec![StoryItem {
                    entity: "Wildflower Bakery".to_string(),
                    context: "Opens Saturday on Lake Street.".to_string(),
                    source: None,
                    secondary_source: None,
                    note: Some("Confirmed by two neighbors.".to_string()),
                    fallback_url: "https://www.google.com/search?q=Wildflower+Bakery+Longfellow+Minneapolis".to_string(),
                }],
            }],
            link_candidates: Vec::new(),
            subject_teaser: Some("Bakery news".to_string()),
            email_teaser: Some("A new bakery lands on Lake Street.".to_string()),
            payload_status: PayloadStatus::Parsed,
        }
    }

    #[test]
    fn test_fields_come_from_the_right_places() {
        let config = EnrichConfig::default();
        let context = context();
        let document = assemble_document(
            extraction(),
            "Good morning, [Longfellow](https://example.com)!".to_string(),
            &context,
            "gemini-2.5-flash",
            &config,
        );

        assert_eq!(document.date_label, "Tuesday, August 25, 2026");
        assert_eq!(document.locale_name, "Longfellow");
        // The linked prose wins over the extraction's unlinked copy.
        assert_eq!(
            document.prose,
            "Good morning, [Longfellow](https://example.com)!"
        );
        assert_eq!(document.model, "gemini-2.5-flash");
        assert_eq!(document.blocked_domains, config.blocked_domains);
        assert_eq!(document.subject_teaser.as_deref(), Some("Bakery news"));
        assert_eq!(document.story_count(), 1);
        assert!(!document.is_prose_only());
    }

    #[test]
    fn test_prose_only_document_is_legitimate() {
        let mut extraction = extraction();
        extraction.categories = Vec::new();
        extraction.payload_status = PayloadStatus::ParsedEmpty;

        let document = assemble_document(
            extraction,
            "A quiet day in the neighborhood.".to_string(),
            &context(),
            "gemini-2.5-flash",
            &EnrichConfig::default(),
        );

        assert!(document.is_prose_only());
        assert_eq!(document.story_count(), 0);
        assert_eq!(document.payload_status, PayloadStatus::ParsedEmpty);
    }
}
