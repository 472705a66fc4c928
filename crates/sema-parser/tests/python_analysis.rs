//! End-to-end extraction scenarios over realistic Python sources.

use sema_core::config::DetectorConfig;
use sema_core::model::{PatternType, SymbolKind};
use sema_parser::{imports, metrics, patterns, symbols, treesitter};
use std::fmt::Write as _;
use std::path::Path;

const SAMPLE: &str = r#"
import os
from typing import Optional

class UserManager:
    """Manages user accounts and authentication."""

    def __init__(self, db_url: str):
        self.db_url = db_url
        self.connection = None

    def connect(self) -> bool:
        """Establish database connection."""
        try:
            self.connection = create_connection(self.db_url)
            return True
        except ConnectionError:
            return False

    async def get_user(self, user_id: int) -> dict:
        """Retrieve user by ID."""
        if not self.connection and not self.reconnect():
            raise RuntimeError("Not connected")
        return self.connection.fetch(user_id)


def parse_config(path: str) -> dict:
    """Parse a TOML configuration file."""
    with open(path) as f:
        return toml.load(f)
"#;

fn parse(source: &str) -> tree_sitter::Tree {
    treesitter::parse(source).expect("sample should parse")
}

#[test]
fn test_sample_symbols() {
    let tree = parse(SAMPLE);
    let syms = symbols::extract(&tree, SAMPLE, Path::new("users.py"));

    let names: Vec<&str> = syms.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["UserManager", "__init__", "connect", "get_user", "parse_config"]
    );

    let manager = &syms[0];
    assert_eq!(manager.kind, SymbolKind::Class);
    assert_eq!(
        manager.docstring.as_deref(),
        Some("Manages user accounts and authentication.")
    );

    let get_user = syms.iter().find(|s| s.name == "get_user").unwrap();
    assert_eq!(get_user.kind, SymbolKind::Method);
    assert!(get_user.is_async);
    assert_eq!(get_user.parameters, vec!["self", "user_id"]);
    assert_eq!(get_user.return_type_hint.as_deref(), Some("dict"));

    let parse_config = syms.iter().find(|s| s.name == "parse_config").unwrap();
    assert_eq!(parse_config.kind, SymbolKind::Function);
}

#[test]
fn test_sample_imports() {
    let tree = parse(SAMPLE);
    assert_eq!(imports::extract(&tree, SAMPLE), vec!["os", "typing"]);
}

#[test]
fn test_sample_complexities() {
    let tree = parse(SAMPLE);
    let syms = symbols::extract(&tree, SAMPLE, Path::new("users.py"));

    for sym in &syms {
        assert!(sym.cyclomatic_complexity >= 1, "{} below 1", sym.name);
    }

    // connect: base + except_clause = 2
    let connect = syms.iter().find(|s| s.name == "connect").unwrap();
    assert_eq!(connect.cyclomatic_complexity, 2);

    // get_user: base + if + `and` = 3
    let get_user = syms.iter().find(|s| s.name == "get_user").unwrap();
    assert_eq!(get_user.cyclomatic_complexity, 3);
}

#[test]
fn test_maintainability_bounds_on_sample() {
    let tree = parse(SAMPLE);
    let syms = symbols::extract(&tree, SAMPLE, Path::new("users.py"));
    let score = metrics::complexity_score(&syms);
    let mi = metrics::maintainability_index(SAMPLE.lines().count(), score);
    assert!((0.0..=100.0).contains(&mi));
}

// --- Pattern scenarios ------------------------------------------------------

fn detect(source: &str) -> Vec<sema_core::model::CodePattern> {
    let tree = parse(source);
    patterns::detect(
        &tree,
        source,
        Path::new("scenario.py"),
        &DetectorConfig::default(),
    )
}

fn class_with_methods(name: &str, count: usize) -> String {
    let mut source = format!("class {name}:\n");
    for i in 0..count {
        let _ = writeln!(source, "    def method_{i}(self):\n        pass");
    }
    source
}

#[test]
fn test_god_class_sixteen_methods() {
    let findings = detect(&class_with_methods("Monolith", 16));
    let god: Vec<_> = findings
        .iter()
        .filter(|p| p.pattern_type == PatternType::GodClass)
        .collect();
    assert_eq!(god.len(), 1);
    assert_eq!(god[0].confidence, 0.90);
    assert!(god[0].description.contains("Monolith"));
    assert!(god[0].description.contains("16"));
}

#[test]
fn test_god_class_fifteen_methods_not_flagged() {
    let findings = detect(&class_with_methods("Large", 15));
    assert!(
        findings
            .iter()
            .all(|p| p.pattern_type != PatternType::GodClass)
    );
}

fn function_spanning(lines: usize) -> String {
    let mut source = String::from("def long_one():\n");
    for _ in 0..lines - 1 {
        source.push_str("    pass\n");
    }
    source
}

#[test]
fn test_long_method_fifty_one_lines() {
    let findings = detect(&function_spanning(51));
    let long: Vec<_> = findings
        .iter()
        .filter(|p| p.pattern_type == PatternType::LongMethod)
        .collect();
    assert_eq!(long.len(), 1);
    assert_eq!(long[0].confidence, 0.85);
    assert!(long[0].description.contains("long_one"));
    assert!(long[0].description.contains("51"));
}

#[test]
fn test_long_method_fifty_lines_not_flagged() {
    let findings = detect(&function_spanning(50));
    assert!(
        findings
            .iter()
            .all(|p| p.pattern_type != PatternType::LongMethod)
    );
}

#[test]
fn test_excessive_parameters_six() {
    let findings = detect("def f(a, b, c, d, e, g):\n    pass\n");
    let hits: Vec<_> = findings
        .iter()
        .filter(|p| p.pattern_type == PatternType::ExcessiveParameters)
        .collect();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].confidence, 0.80);
}

#[test]
fn test_five_parameters_not_flagged() {
    let findings = detect("def f(a, b, c, d, e):\n    pass\n");
    assert!(
        findings
            .iter()
            .all(|p| p.pattern_type != PatternType::ExcessiveParameters)
    );
}

#[test]
fn test_magic_number_scenario() {
    let source = "def f():\n    base = 0\n    step = 1\n    end = -1\n    pct = 100\n    return 42\n";
    let findings = detect(source);
    let magic: Vec<_> = findings
        .iter()
        .filter(|p| p.pattern_type == PatternType::MagicNumber)
        .collect();
    assert_eq!(magic.len(), 1);
    assert_eq!(magic[0].confidence, 0.70);
    assert!(magic[0].description.contains("42"));
}

#[test]
fn test_confidences_within_unit_interval() {
    let mut source = class_with_methods("Blob", 20);
    source.push_str("\ndef f(a, b, c, d, e, g, h):\n    return 7 if a else 9\n");
    let findings = detect(&source);
    assert!(!findings.is_empty());
    for finding in findings {
        assert!(finding.confidence > 0.0 && finding.confidence <= 1.0);
    }
}
