//! The enrichment pipeline, stage by stage.
//!
//! Stages run in a fixed order and communicate through plain values:
//! resolver builds the locale context, prompts renders the request,
//! orchestrator drives the backend with retry, extract parses and
//! validates the reply, links injects hyperlinks, assemble produces the
//! final document. [`Enricher`] wires them together.

pub mod assemble;
pub mod enrich;
pub mod extract;
pub mod links;
pub mod orchestrator;
pub mod prompts;
pub mod resolver;

pub use enrich::Enricher;
