//! Data model for single-file semantic analysis results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The kind of structural symbol extracted from source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Class,
    Function,
    Method,
}

/// A named structural unit (class, function, or method) found in a source file.
///
/// Created once during the extraction pass and immutable afterwards; owned
/// by the [`SemanticAnalysis`] that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub file_path: PathBuf,
    /// 1-based line of the definition.
    pub line: usize,
    /// 0-based column of the definition.
    pub column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
    /// Parameter names in declaration order.
    pub parameters: Vec<String>,
    /// Resolved only for simple-name or literal-constant annotations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type_hint: Option<String>,
    /// Decorator base names in source order; unresolvable shapes are `"unknown"`.
    pub decorators: Vec<String>,
    pub is_async: bool,
    /// Decision-point count, always >= 1. Classes carry the base value 1.
    pub cyclomatic_complexity: u32,
    /// Reserved for cross-symbol dependency tracking.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

/// The anti-pattern rule that produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    GodClass,
    LongMethod,
    ExcessiveParameters,
    MagicNumber,
}

/// Severity of a pattern finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

/// One detected anti-pattern occurrence.
///
/// Confidence is fixed per rule, never 0.0 and never above 1.0. Rules are
/// heuristic: a finding is a probable smell, not a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodePattern {
    pub pattern_type: PatternType,
    pub file_path: PathBuf,
    /// 1-based line of the offending node.
    pub line: usize,
    pub severity: Severity,
    /// Human-readable, includes the offending identifier and measured value.
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub confidence: f32,
}

/// The complete analysis result for one source file.
///
/// Produced atomically by `Analyzer::analyze` — on any parse failure no
/// record exists at all. Cached keyed by `(file_path, mtime)` and superseded,
/// never mutated, when the file changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticAnalysis {
    pub file_path: PathBuf,
    pub analyzed_at: DateTime<Utc>,
    pub symbols: Vec<CodeSymbol>,
    pub patterns: Vec<CodePattern>,
    /// Referenced module names, source order, duplicates preserved.
    pub imports: Vec<String>,
    pub lines_of_code: usize,
    /// Mean per-function cyclomatic complexity; 1.0 for a file with no functions.
    pub complexity_score: f64,
    /// Simplified maintainability index in [0, 100].
    pub maintainability_index: f64,
    /// Absent when no embedding provider is available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl SemanticAnalysis {
    /// Names of all class symbols, in extraction order.
    ///
    /// Derived from `symbols` so it can never drift out of sync.
    pub fn classes(&self) -> Vec<&str> {
        self.symbols
            .iter()
            .filter(|s| s.kind == SymbolKind::Class)
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Names of all function and method symbols, in extraction order.
    pub fn functions(&self) -> Vec<&str> {
        self.symbols
            .iter()
            .filter(|s| matches!(s.kind, SymbolKind::Function | SymbolKind::Method))
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Findings of a given pattern type.
    pub fn patterns_of(&self, kind: PatternType) -> Vec<&CodePattern> {
        self.patterns
            .iter()
            .filter(|p| p.pattern_type == kind)
            .collect()
    }
}
