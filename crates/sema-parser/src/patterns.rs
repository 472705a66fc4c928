//! Rule-engine pass detecting structural anti-patterns.
//!
//! Four independent, stateless rules applied in a single traversal. Rules
//! never short-circuit each other: a god class can contain a separately
//! flagged long method. Detection is purely structural — no type
//! information is consulted — and each finding carries the fixed
//! confidence of its rule.

use crate::symbols::parameter_names;
use sema_core::config::DetectorConfig;
use sema_core::model::{CodePattern, PatternType, Severity};
use std::path::Path;
use tree_sitter::{Node, Tree};

/// Apply all rules to every node of the tree.
pub fn detect(
    tree: &Tree,
    source: &str,
    file_path: &Path,
    config: &DetectorConfig,
) -> Vec<CodePattern> {
    let mut findings = Vec::new();
    scan(tree.root_node(), source, file_path, config, &mut findings);
    findings
}

fn scan(
    node: Node<'_>,
    source: &str,
    file_path: &Path,
    config: &DetectorConfig,
    findings: &mut Vec<CodePattern>,
) {
    match node.kind() {
        "class_definition" => check_god_class(node, source, file_path, config, findings),
        "function_definition" => {
            check_long_method(node, source, file_path, config, findings);
            check_excessive_parameters(node, source, file_path, config, findings);
        }
        "integer" | "float" => check_magic_number(node, source, file_path, config, findings),
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        scan(child, source, file_path, config, findings);
    }
}

fn node_name<'s>(node: Node<'_>, source: &'s str) -> Option<&'s str> {
    node.child_by_field_name("name")
        .map(|n| &source[n.byte_range()])
}

fn check_god_class(
    node: Node<'_>,
    source: &str,
    file_path: &Path,
    config: &DetectorConfig,
    findings: &mut Vec<CodePattern>,
) {
    let Some(name) = node_name(node, source) else {
        return;
    };
    let Some(body) = node.child_by_field_name("body") else {
        return;
    };

    let mut cursor = body.walk();
    let method_count = body
        .named_children(&mut cursor)
        .filter(|stmt| is_function_def(*stmt))
        .count();

    if method_count > config.god_class_methods {
        findings.push(CodePattern {
            pattern_type: PatternType::GodClass,
            file_path: file_path.to_path_buf(),
            line: node.start_position().row + 1,
            severity: Severity::Warning,
            description: format!("Class '{name}' has {method_count} methods"),
            suggestion: Some(
                "Consider splitting this class into smaller, focused classes".to_string(),
            ),
            confidence: config.god_class_confidence,
        });
    }
}

fn is_function_def(stmt: Node<'_>) -> bool {
    match stmt.kind() {
        "function_definition" => true,
        "decorated_definition" => stmt
            .child_by_field_name("definition")
            .is_some_and(|d| d.kind() == "function_definition"),
        _ => false,
    }
}

fn check_long_method(
    node: Node<'_>,
    source: &str,
    file_path: &Path,
    config: &DetectorConfig,
    findings: &mut Vec<CodePattern>,
) {
    let Some(name) = node_name(node, source) else {
        return;
    };
    let line_count = node.end_position().row - node.start_position().row + 1;
    if line_count > config.long_method_lines {
        findings.push(CodePattern {
            pattern_type: PatternType::LongMethod,
            file_path: file_path.to_path_buf(),
            line: node.start_position().row + 1,
            severity: Severity::Warning,
            description: format!("Function '{name}' spans {line_count} lines"),
            suggestion: Some("Consider extracting helper functions".to_string()),
            confidence: config.long_method_confidence,
        });
    }
}

fn check_excessive_parameters(
    node: Node<'_>,
    source: &str,
    file_path: &Path,
    config: &DetectorConfig,
    findings: &mut Vec<CodePattern>,
) {
    let Some(name) = node_name(node, source) else {
        return;
    };
    let param_count = parameter_names(node, source).len();
    if param_count > config.max_parameters {
        findings.push(CodePattern {
            pattern_type: PatternType::ExcessiveParameters,
            file_path: file_path.to_path_buf(),
            line: node.start_position().row + 1,
            severity: Severity::Info,
            description: format!("Function '{name}' takes {param_count} parameters"),
            suggestion: Some(
                "Consider grouping related parameters into a parameter object".to_string(),
            ),
            confidence: config.excessive_parameters_confidence,
        });
    }
}

fn check_magic_number(
    node: Node<'_>,
    source: &str,
    file_path: &Path,
    config: &DetectorConfig,
    findings: &mut Vec<CodePattern>,
) {
    let text = &source[node.byte_range()];
    let Some(mut value) = parse_numeric(text) else {
        return;
    };

    // Fold a unary minus into the literal so `-1` matches the allow-list.
    let negated = node
        .parent()
        .is_some_and(|p| p.kind() == "unary_operator" && source[p.byte_range()].starts_with('-'));
    if negated {
        value = -value;
    }

    if config.magic_number_allowlist.contains(&value) {
        return;
    }

    let display = if negated {
        format!("-{text}")
    } else {
        text.to_string()
    };
    findings.push(CodePattern {
        pattern_type: PatternType::MagicNumber,
        file_path: file_path.to_path_buf(),
        line: node.start_position().row + 1,
        severity: Severity::Info,
        description: format!("Magic number {display} should be a named constant"),
        suggestion: Some("Replace with a named constant".to_string()),
        confidence: config.magic_number_confidence,
    });
}

/// Parse an integer or float literal, tolerating underscores and the
/// standard radix prefixes. Complex literals and anything else the parse
/// does not recognize are skipped rather than flagged.
fn parse_numeric(text: &str) -> Option<f64> {
    let cleaned = text.replace('_', "").to_ascii_lowercase();
    if cleaned.ends_with('j') {
        return None;
    }
    if let Some(hex) = cleaned.strip_prefix("0x") {
        return i64::from_str_radix(hex, 16).ok().map(|v| v as f64);
    }
    if let Some(oct) = cleaned.strip_prefix("0o") {
        return i64::from_str_radix(oct, 8).ok().map(|v| v as f64);
    }
    if let Some(bin) = cleaned.strip_prefix("0b") {
        return i64::from_str_radix(bin, 2).ok().map(|v| v as f64);
    }
    cleaned.parse::<f64>().ok()
}
