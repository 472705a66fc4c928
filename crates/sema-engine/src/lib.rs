//! Analysis orchestration for sema.
//!
//! [`analyzer::Analyzer`] is the public entry point: it parses a file, runs
//! the extraction passes from `sema-parser`, attaches an optional embedding,
//! caches the result keyed by `(path, mtime)`, and answers similarity
//! queries over everything cached so far.

pub mod analyzer;
pub mod embed;

pub use analyzer::{AnalyzeError, Analyzer};
pub use embed::{EmbeddingProvider, cosine_similarity};
