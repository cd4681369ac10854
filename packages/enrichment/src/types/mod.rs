//! Core data types for the enrichment pipeline.

pub mod config;
pub mod document;
pub mod draft;
pub mod locale;
