//! Hyperlink injection - wrap validated candidate substrings as links.

use regex::Regex;
use tracing::debug;

use crate::pipeline::extract::fallback_search_url;
use crate::types::config::EnrichConfig;
use crate::types::document::LinkCandidate;
use crate::types::locale::LocaleContext;

/// Inject links for validated candidates into sanitized prose.
///
/// Longest candidate first, first unoccupied occurrence only, never
/// inside a link the backend already wrote. A candidate with no free
/// occurrence is skipped, not an error. All non-link text comes through
/// byte-identical.
pub fn inject_links(
    prose: &str,
    candidates: &[LinkCandidate],
    context: &LocaleContext,
    config: &EnrichConfig,
) -> String {
    // Spans already spoken for: markdown links the backend emitted itself.
    let mut occupied = existing_link_spans(prose);

    let mut ordered: Vec<&LinkCandidate> = candidates.iter().collect();
    ordered.sort_by(|a, b| b.text.len().cmp(&a.text.len()));

    let mut injections: Vec<(usize, usize, String)> = Vec::new();
    for candidate in ordered {
        if candidate.text.is_empty() {
            continue;
        }
        match first_free_occurrence(prose, &candidate.text, &occupied) {
            Some(start) => {
                let end = start + candidate.text.len();
                let url = fallback_search_url(&candidate.text, context, config);
                occupied.push((start, end));
                injections.push((start, end, url));
            }
            None => {
                debug!(candidate = %candidate.text, "No free occurrence, skipping candidate");
            }
        }
    }

    if injections.is_empty() {
        return prose.to_string();
    }
    injections.sort_by_key(|(start, _, _)| *start);

    let mut out = String::with_capacity(prose.len() + injections.len() * 64);
    let mut cursor = 0;
    for (start, end, url) in injections {
        out.push_str(&prose[cursor..start]);
        out.push('[');
        out.push_str(&prose[start..end]);
        out.push_str("](");
        out.push_str(&url);
        out.push(')');
        cursor = end;
    }
    out.push_str(&prose[cursor..]);
    out
}

/// Byte spans of markdown links already present in the text.
fn existing_link_spans(prose: &str) -> Vec<(usize, usize)> {
    let re = Regex::new(r"\[[^\]\n]*\]\([^)\n]*\)").unwrap();
    re.find_iter(prose).map(|m| (m.start(), m.end())).collect()
}

/// Start offset of the first occurrence of `needle` that does not
/// intersect any occupied span.
fn first_free_occurrence(prose: &str, needle: &str, occupied: &[(usize, usize)]) -> Option<usize> {
    let step = needle.chars().next().map(char::len_utf8).unwrap_or(1);
    let mut from = 0;

    while let Some(relative) = prose[from..].find(needle) {
        let start = from + relative;
        let end = start + needle.len();
        let overlaps = occupied.iter().any(|&(s, e)| start < e && s < end);
        if !overlaps {
            return Some(start);
        }
        from = start + step;
    }
    None
}
