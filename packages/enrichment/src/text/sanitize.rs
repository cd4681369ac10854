//! Prose sanitizer - an ordered pipeline of rewrite rules.
//!
//! Rule order matters: newline collapsing cleans up the holes left by
//! block removal, and trimming runs last. Removing one artifact can
//! splice another into existence (deleting a fence can join citation
//! fragments), so the ordered pass repeats until the text stops changing.
//! Every rule only deletes or shrinks text, so the loop terminates, and
//! the fixpoint makes the whole pipeline idempotent:
//! `sanitize_prose(sanitize_prose(x)) == sanitize_prose(x)` for any input.

use regex::Regex;

/// Run the full sanitizer pipeline over raw narrative text.
pub fn sanitize_prose(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = sanitize_pass(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn sanitize_pass(text: &str) -> String {
    let mut out = strip_emphasis(text);
    out = strip_fenced_blocks(&out);
    out = strip_heading_markers(&out);
    out = strip_label_line(&out);
    out = strip_citation_artifacts(&out);
    out = normalize_dashes(&out);
    out = collapse_newlines(&out);
    out.trim().to_string()
}

/// Remove asterisk emphasis markers. `[[Header]]` markers use brackets
/// and pass through untouched.
pub fn strip_emphasis(text: &str) -> String {
    text.replace('*', "")
}

/// Remove fenced code blocks. The machine-readable payload travels in a
/// fence and is carved out before sanitization; any fence still present
/// here is stray backend noise.
pub fn strip_fenced_blocks(text: &str) -> String {
    let re = Regex::new(r"(?s)```.*?```").unwrap();
    re.replace_all(text, "").to_string()
}

/// Remove markdown heading markers at line starts, including stacked
/// ones ("## # Title" becomes "Title").
pub fn strip_heading_markers(text: &str) -> String {
    let re = Regex::new(r"(?m)^(?:#{1,6}[ \t]+)+").unwrap();
    re.replace_all(text, "").to_string()
}

/// Remove a leading boilerplate or label line: "Here's your update:",
/// "NEWSLETTER:", and the like. Only the first line is considered.
pub fn strip_label_line(text: &str) -> String {
    let re =
        Regex::new(r"(?i)^\s*(?:here(?:['’]s| is)[^\n]{0,80}|[^\n:]{1,60}:)[ \t]*(?:\n|$)")
            .unwrap();
    re.replacen(text, 1, "").to_string()
}

/// Remove citation artifacts the backend leaves behind: numbered markers
/// like `[3]`, emptied parens, and an open paren dangling at a line end.
pub fn strip_citation_artifacts(text: &str) -> String {
    let markers = Regex::new(r"\[\d+\]").unwrap();
    let empty_parens = Regex::new(r"\(\s*\)").unwrap();
    let dangling = Regex::new(r"(?m)[ \t]*\([ \t]*$").unwrap();

    let out = markers.replace_all(text, "");
    let out = empty_parens.replace_all(&out, "");
    dangling.replace_all(&out, "").to_string()
}

/// Normalize em and en dashes to plain hyphens.
pub fn normalize_dashes(text: &str) -> String {
    text.replace('—', "-").replace('–', "-").replace('―', "-")
}

/// Strip trailing blanks from each line and collapse runs of three or
/// more newlines down to two.
pub fn collapse_newlines(text: &str) -> String {
    let trailing = Regex::new(r"(?m)[ \t]+$").unwrap();
    let runs = Regex::new(r"\n{3,}").unwrap();

    let out = trailing.replace_all(text, "");
    runs.replace_all(&out, "\n\n").to_string()
}
