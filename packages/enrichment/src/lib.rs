//! Grounded enrichment pipeline for neighborhood newsletters.
//!
//! Takes a draft of unverified local claims plus the facts of a locale
//! and produces a publication-ready document: verified stories grouped
//! into categories, sanitized prose with hyperlinks injected, and
//! notification teasers. Verification itself happens inside a grounded
//! generation backend; this library frames the request, retries through
//! quota errors, and validates everything that comes back.
//!
//! # Design Philosophy
//!
//! **"No source, no story"**
//!
//! - The backend does the fact-finding; the library validates and
//!   shapes. A story without a corroborating source survives only when
//!   it carries an annotation saying why.
//! - Parse failures degrade, never error. A reply with no usable
//!   machine block still yields a prose-only document.
//! - Every text transform is idempotent, so re-processing stored output
//!   is safe.
//! - The library handles the mechanics of one call; persistence,
//!   scheduling, and delivery belong to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use enrichment::{DraftNarrative, EnrichOptions, Enricher, GeminiBackend, LocaleFacts};
//!
//! let backend = GeminiBackend::from_env()?;
//! let enricher = Enricher::new(backend);
//!
//! let draft = DraftNarrative::new(
//!     "Wildflower Bakery might be opening on Lake Street this weekend. \
//!      Heard something about an art crawl too?",
//! );
//! let facts = LocaleFacts::new("Longfellow", "Minneapolis", "US");
//!
//! let document = enricher.enrich(&draft, &facts, EnrichOptions::default()).await?;
//! println!("{}", document.prose);
//! ```
//!
//! # Modules
//!
//! - [`pipeline`]: the stages, wired together by [`Enricher`]
//! - [`types`]: drafts, locale facts, configuration, and the document
//! - [`text`]: idempotent prose and teaser cleanup
//! - [`traits`]: the backend seam implementations plug into
//! - [`testing`]: scripted mock backend and recording sleeper
//! - `backend`: the Gemini implementation (feature `gemini`)

pub mod error;
pub mod pipeline;
pub mod testing;
pub mod text;
pub mod traits;
pub mod types;

#[cfg(feature = "gemini")]
pub mod backend;

/// Default model: fast tier, good enough for daily editions.
pub const GEMINI_FLASH: &str = "gemini-2.5-flash";

/// Higher-quality tier for editions worth the extra latency.
pub const GEMINI_PRO: &str = "gemini-2.5-pro";

pub use error::{BackendError, BackendResult, EnrichError, Result};
pub use pipeline::extract::EXCLUSION_MARKER;
pub use pipeline::Enricher;
pub use testing::{MockBackend, MockOutcome, RecordingSleeper};
pub use text::sanitize::sanitize_prose;
pub use text::teaser::{clean_teaser, TeaserRules};
pub use traits::backend::{
    GenerationBackend, GenerationReply, GenerationRequest, Sleeper, TokioSleeper,
};
pub use types::config::{EnrichConfig, EnrichOptions, RetryPolicy};
pub use types::document::{
    EnrichedDocument, LinkCandidate, PayloadStatus, StoryCategory, StoryItem, StorySource,
};
pub use types::draft::DraftNarrative;
pub use types::locale::{EditionKind, LocaleContext, LocaleFacts};

#[cfg(feature = "gemini")]
pub use backend::GeminiBackend;
