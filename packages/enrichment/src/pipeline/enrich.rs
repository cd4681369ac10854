//! The enrichment entry point.
//!
//! [`Enricher`] owns a generation backend and a configuration and runs
//! a draft through every stage in order: resolve the locale, build the
//! prompt, call the backend with retry, extract and validate, inject
//! links, assemble. One call produces one document.

use tracing::debug;

use crate::error::{EnrichError, Result};
use crate::pipeline::assemble::assemble_document;
use crate::pipeline::extract::extract_and_validate;
use crate::pipeline::links::inject_links;
use crate::pipeline::orchestrator::generate_with_retry;
use crate::pipeline::prompts::{format_enrich_prompt, ENRICH_SYSTEM_PROMPT};
use crate::pipeline::resolver::resolve_locale;
use crate::traits::backend::{GenerationBackend, GenerationRequest, Sleeper, TokioSleeper};
use crate::types::config::{EnrichConfig, EnrichOptions};
use crate::types::document::EnrichedDocument;
use crate::types::draft::DraftNarrative;
use crate::types::locale::LocaleFacts;

/// Runs draft claims through grounded generation into a publishable
/// document.
///
/// Generic over the backend so tests can swap in a mock, and over the
/// sleeper so retry schedules run instantly under test. Construction
/// picks the real tokio sleeper; [`Enricher::with_sleeper`] replaces it.
pub struct Enricher<B: GenerationBackend, S: Sleeper = TokioSleeper> {
    backend: B,
    sleeper: S,
    config: EnrichConfig,
}

impl<B: GenerationBackend> Enricher<B> {
    /// Create an enricher with the default configuration.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, EnrichConfig::default())
    }

    /// Create an enricher with a custom configuration.
    pub fn with_config(backend: B, config: EnrichConfig) -> Self {
        Self {
            backend,
            sleeper: TokioSleeper,
            config,
        }
    }
}

impl<B: GenerationBackend, S: Sleeper> Enricher<B, S> {
    /// Replace the sleeper used between retry attempts.
    pub fn with_sleeper<S2: Sleeper>(self, sleeper: S2) -> Enricher<B, S2> {
        Enricher {
            backend: self.backend,
            sleeper,
            config: self.config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &EnrichConfig {
        &self.config
    }

    /// Enrich one draft into a publication-ready document.
    ///
    /// Fails only on configuration problems or when the backend fails
    /// past the retry schedule. A reply the parser cannot make sense of
    /// degrades to a prose-only document instead of an error.
    pub async fn enrich(
        &self,
        draft: &DraftNarrative,
        facts: &LocaleFacts,
        options: EnrichOptions,
    ) -> Result<EnrichedDocument> {
        let model = options
            .model
            .unwrap_or_else(|| self.config.model.clone());
        if model.trim().is_empty() {
            return Err(EnrichError::Config(
                "model identifier is empty".to_string(),
            ));
        }

        let edition = options.edition.unwrap_or(draft.edition);
        let context = resolve_locale(facts, options.reference_instant, edition, &self.config);

        let request = GenerationRequest {
            model,
            system: ENRICH_SYSTEM_PROMPT.to_string(),
            prompt: format_enrich_prompt(&context, draft),
        };

        debug!(
            model = %request.model,
            locale = %context.facts.neighborhood,
            edition = edition.label(),
            "requesting grounded generation"
        );

        let reply =
            generate_with_retry(&self.backend, &request, &self.config.retry, &self.sleeper)
                .await?;

        let extraction = extract_and_validate(&reply.text, &context, &self.config);
        let linked = inject_links(
            &extraction.prose,
            &extraction.link_candidates,
            &context,
            &self.config,
        );

        Ok(assemble_document(
            extraction,
            linked,
            &context,
            &reply.model,
            &self.config,
        ))
    }
}
