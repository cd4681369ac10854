//! Prompts for the grounded generation call.
//!
//! One call produces both the reader-facing prose and the
//! machine-readable payload, so the contract section is strict about the
//! block format while the style directives stay per-edition data.

use crate::types::draft::DraftNarrative;
use crate::types::locale::LocaleContext;

/// System framing: persona plus the hard output contract.
pub const ENRICH_SYSTEM_PROMPT: &str = r#"You are the fact-checker and copy editor for a neighborhood newsletter.

You receive a draft of candidate local items. Verify every claim against
live web sources before keeping it. Drop anything you cannot corroborate.
Never invent events, businesses, dates, or quotes.

Rules:
1. Search for each claim. Keep it only when a source confirms it.
2. Cite the confirming publication by name and URL.
3. Prefer local outlets, official sites, and venue pages over aggregators.
4. Mark section breaks in the prose with [[Header]] markers, e.g. [[What's New]].
5. No markdown headings (#) and no bold or italics in the prose.
6. Write the prose first. Then append exactly one ```json block:

{
    "categories": [
        {
            "name": "Category name",
            "stories": [
                {
                    "entity": "Who or what the story is about",
                    "context": "The verified claim, one or two sentences",
                    "source": {"name": "Publication", "url": "https://..."},
                    "secondary_source": {"name": "Publication", "url": "https://..."},
                    "note": "Caveats, or why a claim stays unverified"
                }
            ]
        }
    ],
    "link_candidates": [
        {"text": "exact substring of the prose worth hyperlinking"}
    ],
    "subject_teaser": "1-5 words, at most 40 characters",
    "email_teaser": "one sentence, 10-200 characters, ending in . or !"
}

"secondary_source" and "note" are optional. A story you could not verify
does not get an invented source: set "source" to null and say why in
"note". Every link_candidates[].text must be copied character-for-character
from the prose."#;

/// User prompt template. `{placeholders}` are filled by [`format_enrich_prompt`].
pub const ENRICH_PROMPT: &str = r#"Edition: {edition} newsletter for {neighborhood}, {city}, {country}.
Local time now: {local_timestamp}. Today is {date_label}.
Readers open this at {publication_hour}:00 local time; phrase timing accordingly.

Style directives:
{style_directives}
{language_line}
Draft claims to verify:
{claims}
{prior_coverage_section}"#;

/// Format the enrichment prompt from the resolved context and the draft.
pub fn format_enrich_prompt(context: &LocaleContext, draft: &DraftNarrative) -> String {
    let style_directives = context
        .style_directives()
        .iter()
        .map(|d| format!("- {}", d))
        .collect::<Vec<_>>()
        .join("\n");

    let language_line = match context.facts.language.as_deref() {
        Some(language) => format!("Write all output in {}.\n", language),
        None => String::new(),
    };

    let prior_coverage_section = if draft.prior_coverage.is_empty() {
        String::new()
    } else {
        let items = draft
            .prior_coverage
            .iter()
            .map(|item| format!("- {}", item))
            .collect::<Vec<_>>()
            .join("\n");
        format!("\nAlready covered recently - do not repeat these angles:\n{}", items)
    };

    ENRICH_PROMPT
        .replace("{edition}", context.edition.label())
        .replace("{neighborhood}", &context.facts.neighborhood)
        .replace("{city}", &context.facts.city)
        .replace("{country}", &context.facts.country)
        .replace("{local_timestamp}", &context.local_timestamp)
        .replace("{date_label}", &context.date_label)
        .replace("{publication_hour}", &context.publication_hour.to_string())
        .replace("{style_directives}", &style_directives)
        .replace("{language_line}", &language_line)
        .replace("{claims}", &draft.claims)
        .replace("{prior_coverage_section}", &prior_coverage_section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::resolver::resolve_locale;
    use crate::types::config::EnrichConfig;
    use crate::types::locale::{EditionKind, LocaleFacts};
    use chrono::{TimeZone, Utc};

    fn context(edition: EditionKind) -> LocaleContext {
        let facts = LocaleFacts::new("Longfellow", "Minneapolis", "US");
        let instant = Utc
            .with_ymd_and_hms(2026, 8, 25, 23, 0, 0)
            .single()
            .expect("valid instant");
        resolve_locale(&facts, Some(instant), edition, &EnrichConfig::default())
    }

    #[test]
    fn test_format_enrich_prompt() {
        let draft = DraftNarrative::new("Bakery opening Saturday\nPool closing for season");
        let formatted = format_enrich_prompt(&context(EditionKind::Daily), &draft);

        assert!(formatted.contains("daily newsletter for Longfellow, Minneapolis, US"));
        assert!(formatted.contains("Today is Tuesday, August 25, 2026"));
        assert!(formatted.contains("at 7:00 local time"));
        assert!(formatted.contains("Bakery opening Saturday"));
        assert!(formatted.contains("Pool closing for season"));
        assert!(!formatted.contains("{claims}"));
    }

    #[test]
    fn test_edition_selects_directives() {
        let draft = DraftNarrative::new("something");
        let weekend = format_enrich_prompt(&context(EditionKind::Weekend), &draft);

        assert!(weekend.contains("weekend newsletter"));
        assert!(weekend.contains("Saturday first, then Sunday"));
    }

    #[test]
    fn test_prior_coverage_section() {
        let draft = DraftNarrative::new("claims")
            .with_prior_coverage(["Covered the rink opening last week"]);
        let formatted = format_enrich_prompt(&context(EditionKind::Daily), &draft);

        assert!(formatted.contains("do not repeat these angles"));
        assert!(formatted.contains("- Covered the rink opening last week"));

        let bare = format_enrich_prompt(&context(EditionKind::Daily), &DraftNarrative::new("claims"));
        assert!(!bare.contains("do not repeat"));
    }

    #[test]
    fn test_language_hint_line() {
        let facts = LocaleFacts::new("Longfellow", "Minneapolis", "US").with_language("Spanish");
        let instant = Utc
            .with_ymd_and_hms(2026, 8, 25, 23, 0, 0)
            .single()
            .expect("valid instant");
        let context = resolve_locale(&facts, Some(instant), EditionKind::Daily, &EnrichConfig::default());

        let formatted = format_enrich_prompt(&context, &DraftNarrative::new("claims"));
        assert!(formatted.contains("Write all output in Spanish."));
    }

    #[test]
    fn test_system_prompt_carries_the_contract() {
        assert!(ENRICH_SYSTEM_PROMPT.contains("```json"));
        assert!(ENRICH_SYSTEM_PROMPT.contains("link_candidates"));
        assert!(ENRICH_SYSTEM_PROMPT.contains("[[Header]]"));
    }
}
