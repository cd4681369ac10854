//! Text transforms - pure, ordered, idempotent rewrite pipelines.
//!
//! Nothing here touches configuration, I/O, or the backend. Each rule is
//! a plain function over `&str` so it can be unit tested alone and in
//! composition.

pub mod sanitize;
pub mod teaser;
