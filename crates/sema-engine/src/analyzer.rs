//! The analyzer facade: parse, extract, embed, cache.

use crate::embed::{EmbeddingProvider, cosine_similarity};
use chrono::Utc;
use parking_lot::Mutex;
use sema_core::config::SemaConfig;
use sema_core::model::SemanticAnalysis;
use sema_parser::{ParseError, imports, metrics, patterns, symbols};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;
use tracing::warn;

/// Errors from a single `analyze` call. Parse and IO failures propagate
/// synchronously and are never retried internally; embedding failures are
/// absorbed (see [`Analyzer::embed_text`]) and never appear here.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Syntax {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Cache key: a record is valid for one exact modification time of one path.
type CacheKey = (PathBuf, SystemTime);

/// Orchestrates all analysis passes behind one `analyze()` entry point.
///
/// Each instance owns its cache and its optional embedding provider — no
/// ambient global state, so tests construct isolated analyzers and the
/// locking discipline is enforceable. Completed analyses are immutable and
/// handed out as `Arc`s; the cache grows until [`clear_cache`] is called.
///
/// Safe to share across threads. The cache mutex guards only the
/// read-check and insert; parsing and embedding run outside it, so two
/// concurrent first analyses of the same file may both do the work — the
/// records are equivalent and the last insert wins.
///
/// [`clear_cache`]: Analyzer::clear_cache
pub struct Analyzer {
    config: SemaConfig,
    provider: Option<Arc<dyn EmbeddingProvider>>,
    cache: Mutex<HashMap<CacheKey, Arc<SemanticAnalysis>>>,
    parses: AtomicU64,
}

impl Analyzer {
    /// Analyzer without an embedding backend: analyses carry no embedding
    /// and `find_similar` returns nothing.
    pub fn new(config: SemaConfig) -> Self {
        Self {
            config,
            provider: None,
            cache: Mutex::new(HashMap::new()),
            parses: AtomicU64::new(0),
        }
    }

    /// Analyzer with an explicit embedding provider.
    pub fn with_provider(config: SemaConfig, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider: Some(provider),
            ..Self::new(config)
        }
    }

    /// Analyzer backed by the local fastembed model. If the model cannot
    /// be initialized the analyzer still works, just without embeddings —
    /// the downgrade is logged once here.
    #[cfg(feature = "local-embeddings")]
    pub fn with_local_model(config: SemaConfig) -> Self {
        match crate::embed::local::LocalEmbedder::new() {
            Ok(embedder) => Self::with_provider(config, Arc::new(embedder)),
            Err(e) => {
                warn!("local embedding model unavailable, continuing without: {e:#}");
                Self::new(config)
            }
        }
    }

    /// Analyze a source file, returning the cached record when the file's
    /// modification time has not changed since the last call.
    ///
    /// On parse failure the parser's diagnostic is propagated unmodified
    /// and nothing is cached — a record exists atomically or not at all.
    pub fn analyze(&self, path: impl AsRef<Path>) -> Result<Arc<SemanticAnalysis>, AnalyzeError> {
        let path = path.as_ref();
        let mtime = modification_time(path)?;
        let key = (path.to_path_buf(), mtime);

        if let Some(hit) = self.cache.lock().get(&key) {
            return Ok(Arc::clone(hit));
        }

        let source = fs::read_to_string(path).map_err(|source| AnalyzeError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.parses.fetch_add(1, Ordering::Relaxed);
        let tree = sema_parser::parse(&source).map_err(|source| AnalyzeError::Syntax {
            path: path.to_path_buf(),
            source,
        })?;

        let symbols = symbols::extract(&tree, &source, path);
        let imports = imports::extract(&tree, &source);
        let patterns = patterns::detect(&tree, &source, path, &self.config.detector);
        let lines_of_code = source.lines().count();
        let complexity_score = metrics::complexity_score(&symbols);
        let maintainability_index = metrics::maintainability_index(lines_of_code, complexity_score);
        let embedding = self.embed_text(&source);

        let analysis = Arc::new(SemanticAnalysis {
            file_path: path.to_path_buf(),
            analyzed_at: Utc::now(),
            symbols,
            patterns,
            imports,
            lines_of_code,
            complexity_score,
            maintainability_index,
            embedding,
        });

        self.cache.lock().insert(key, Arc::clone(&analysis));
        Ok(analysis)
    }

    /// Rank cached analyses by cosine similarity to a query snippet, using
    /// the configured threshold.
    pub fn find_similar(&self, snippet: &str) -> Vec<(PathBuf, f32)> {
        self.find_similar_with(snippet, self.config.similarity.threshold)
    }

    /// `find_similar` with an explicit score threshold.
    ///
    /// Results are sorted by score descending; the order of equal scores
    /// follows cache iteration order and is not deterministic.
    pub fn find_similar_with(&self, snippet: &str, threshold: f32) -> Vec<(PathBuf, f32)> {
        let Some(query) = self.embed_text(snippet) else {
            return Vec::new();
        };

        let mut hits: Vec<(PathBuf, f32)> = {
            let cache = self.cache.lock();
            cache
                .values()
                .filter_map(|analysis| {
                    let embedding = analysis.embedding.as_ref()?;
                    let score = cosine_similarity(&query, embedding);
                    (score >= threshold).then(|| (analysis.file_path.clone(), score))
                })
                .collect()
        };

        hits.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        hits
    }

    /// Embed text, downgrading any provider failure to "no embedding".
    /// This is the one place a failure is deliberately absorbed: embeddings
    /// are optional and must never fail an analysis.
    fn embed_text(&self, text: &str) -> Option<Vec<f32>> {
        let provider = self.provider.as_ref()?;
        match provider.encode(text) {
            Ok(vector) => Some(vector),
            Err(e) => {
                warn!(provider = provider.name(), "embedding failed: {e:#}");
                None
            }
        }
    }

    /// Drop every cached analysis. No other side effects.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    /// Number of cached analyses.
    pub fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Total parses performed (cache misses). Lets callers and tests
    /// observe that a cache hit skipped the parse.
    pub fn parse_count(&self) -> u64 {
        self.parses.load(Ordering::Relaxed)
    }

    pub fn config(&self) -> &SemaConfig {
        &self.config
    }
}

fn modification_time(path: &Path) -> Result<SystemTime, AnalyzeError> {
    let metadata = fs::metadata(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            AnalyzeError::NotFound(path.to_path_buf())
        } else {
            AnalyzeError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    metadata.modified().map_err(|source| AnalyzeError::Io {
        path: path.to_path_buf(),
        source,
    })
}
