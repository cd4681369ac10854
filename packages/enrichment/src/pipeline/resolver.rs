//! Locale resolution - canonical "now", date labels, and style context.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::types::config::EnrichConfig;
use crate::types::locale::{EditionKind, LocaleContext, LocaleFacts};

/// Resolve caller-supplied locale facts into the per-call context.
///
/// The reference instant, when supplied, is authoritative for what
/// "today" and "tomorrow" mean: the draft may have been captured on a
/// different calendar day, in a different zone, than this process runs in.
pub fn resolve_locale(
    facts: &LocaleFacts,
    reference_instant: Option<DateTime<Utc>>,
    edition: EditionKind,
    config: &EnrichConfig,
) -> LocaleContext {
    let timezone = resolve_timezone(facts, config);
    let reference_instant = reference_instant.unwrap_or_else(Utc::now);
    let local_now = reference_instant.with_timezone(&timezone);

    let date_label = local_now.format("%A, %B %-d, %Y").to_string();
    let local_timestamp = local_now.format("%Y-%m-%d %H:%M %Z").to_string();

    debug!(
        neighborhood = %facts.neighborhood,
        timezone = %timezone,
        date_label = %date_label,
        edition = edition.label(),
        "Resolved locale context"
    );

    LocaleContext {
        facts: facts.clone(),
        timezone,
        reference_instant,
        date_label,
        local_timestamp,
        publication_hour: config.publication_hour,
        edition,
    }
}

/// Explicit zone if it parses, else the country fallback table, else the
/// configured default.
fn resolve_timezone(facts: &LocaleFacts, config: &EnrichConfig) -> Tz {
    if let Some(explicit) = facts.timezone.as_deref() {
        match explicit.trim().parse::<Tz>() {
            Ok(tz) => return tz,
            Err(_) => {
                warn!(timezone = %explicit, "Unparseable explicit timezone, using country fallback");
            }
        }
    }

    let country = facts.country.trim();
    let name = config
        .timezone_fallbacks
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(country))
        .map(|(_, tz)| tz.as_str())
        .unwrap_or(config.default_timezone.as_str());

    name.parse::<Tz>().unwrap_or(chrono_tz::America::Chicago)
}
