//! Trait abstractions at the pipeline's seams.

pub mod backend;

pub use backend::{GenerationBackend, GenerationReply, GenerationRequest, Sleeper, TokioSleeper};
