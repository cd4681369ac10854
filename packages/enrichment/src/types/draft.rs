//! Draft narrative - the unverified input batch.

use serde::{Deserialize, Serialize};

use crate::types::locale::EditionKind;

/// A batch of candidate local-interest claims awaiting verification.
///
/// Claims arrive as free text, typically one per line. Nothing in the
/// draft is trusted: every claim must survive grounding before it appears
/// in the output document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftNarrative {
    /// Free-text candidate claims
    pub claims: String,
    /// Document type; selects the style-directive bundle
    #[serde(default)]
    pub edition: EditionKind,
    /// Prior-coverage summaries, newest first. Steers the backend away
    /// from repetition and is never echoed into output.
    #[serde(default)]
    pub prior_coverage: Vec<String>,
}

impl DraftNarrative {
    pub fn new(claims: impl Into<String>) -> Self {
        Self {
            claims: claims.into(),
            edition: EditionKind::default(),
            prior_coverage: Vec::new(),
        }
    }

    /// Set the edition kind.
    pub fn with_edition(mut self, edition: EditionKind) -> Self {
        self.edition = edition;
        self
    }

    /// Attach prior-coverage summaries, newest first.
    pub fn with_prior_coverage(
        mut self,
        items: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.prior_coverage = items.into_iter().map(Into::into).collect();
        self
    }
}
