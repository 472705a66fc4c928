//! Extract structural symbols (classes, functions, methods) from a syntax tree.

use crate::metrics;
use sema_core::model::{CodeSymbol, SymbolKind};
use std::path::Path;
use tree_sitter::{Node, Tree};

/// Walk every node of the tree and collect symbols, nested definitions
/// included. Pure: unrecognized node shapes are skipped, never errors.
pub fn extract(tree: &Tree, source: &str, file_path: &Path) -> Vec<CodeSymbol> {
    let mut symbols = Vec::new();
    walk(tree.root_node(), source, file_path, None, &mut symbols);
    symbols
}

fn walk(
    node: Node<'_>,
    source: &str,
    file_path: &Path,
    parent_class: Option<&str>,
    symbols: &mut Vec<CodeSymbol>,
) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "decorated_definition" => {
                let decorators = decorator_names(child, source);
                if let Some(def) = child.child_by_field_name("definition") {
                    visit_definition(def, decorators, source, file_path, parent_class, symbols);
                }
            }
            "class_definition" | "function_definition" => {
                visit_definition(child, Vec::new(), source, file_path, parent_class, symbols);
            }
            _ => walk(child, source, file_path, parent_class, symbols),
        }
    }
}

fn visit_definition(
    node: Node<'_>,
    decorators: Vec<String>,
    source: &str,
    file_path: &Path,
    parent_class: Option<&str>,
    symbols: &mut Vec<CodeSymbol>,
) {
    let Some(name_node) = node.child_by_field_name("name") else {
        return;
    };
    let name = &source[name_node.byte_range()];
    let pos = node.start_position();

    match node.kind() {
        "class_definition" => {
            symbols.push(CodeSymbol {
                name: name.to_string(),
                kind: SymbolKind::Class,
                file_path: file_path.to_path_buf(),
                line: pos.row + 1,
                column: pos.column,
                docstring: docstring(node, source),
                parameters: Vec::new(),
                return_type_hint: None,
                decorators,
                is_async: false,
                cyclomatic_complexity: 1,
                dependencies: Vec::new(),
            });
            if let Some(body) = node.child_by_field_name("body") {
                walk(body, source, file_path, Some(name), symbols);
            }
        }
        "function_definition" => {
            let kind = if parent_class.is_some() {
                SymbolKind::Method
            } else {
                SymbolKind::Function
            };
            symbols.push(CodeSymbol {
                name: name.to_string(),
                kind,
                file_path: file_path.to_path_buf(),
                line: pos.row + 1,
                column: pos.column,
                docstring: docstring(node, source),
                parameters: parameter_names(node, source),
                return_type_hint: return_type_hint(node, source),
                decorators,
                is_async: is_async(node),
                cyclomatic_complexity: metrics::cyclomatic_complexity(node),
                dependencies: Vec::new(),
            });
            // Definitions nested inside a function body are plain functions,
            // regardless of how deep inside a class they sit.
            if let Some(body) = node.child_by_field_name("body") {
                walk(body, source, file_path, None, symbols);
            }
        }
        _ => {}
    }
}

/// The docstring convention: a definition's docstring is its body's first
/// statement when that statement is a bare string literal.
fn docstring(definition: Node<'_>, source: &str) -> Option<String> {
    let body = definition.child_by_field_name("body")?;
    let first = body.named_child(0)?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let string = first.named_child(0)?;
    if string.kind() != "string" {
        return None;
    }
    Some(string_content(string, source))
}

/// Concatenate the content fragments of a string node, skipping the quotes.
fn string_content(string: Node<'_>, source: &str) -> String {
    let mut content = String::new();
    let mut cursor = string.walk();
    for part in string.children(&mut cursor) {
        if part.kind() == "string_content" || part.kind() == "escape_sequence" {
            content.push_str(&source[part.byte_range()]);
        }
    }
    content
}

/// Resolve decorator expressions to their base name.
///
/// `@name` resolves to `name`, `@name(args)` to `name`; anything else
/// (attribute access, subscripts, ...) resolves to `"unknown"`.
fn decorator_names(decorated: Node<'_>, source: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = decorated.walk();
    for child in decorated.children(&mut cursor) {
        if child.kind() != "decorator" {
            continue;
        }
        let Some(expr) = child.named_child(0) else {
            continue;
        };
        let name = match expr.kind() {
            "identifier" => source[expr.byte_range()].to_string(),
            "call" => match expr.child_by_field_name("function") {
                Some(f) if f.kind() == "identifier" => source[f.byte_range()].to_string(),
                _ => "unknown".to_string(),
            },
            _ => "unknown".to_string(),
        };
        names.push(name);
    }
    names
}

/// Ordered parameter names of a function definition.
///
/// Splat parameters (`*args`, `**kwargs`) and bare separators (`*`, `/`)
/// are not counted; arity enforcement belongs to the pattern detector.
pub(crate) fn parameter_names(function: Node<'_>, source: &str) -> Vec<String> {
    let Some(params) = function.child_by_field_name("parameters") else {
        return Vec::new();
    };
    let mut names = Vec::new();
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        match param.kind() {
            "identifier" => names.push(source[param.byte_range()].to_string()),
            "typed_parameter" => {
                if let Some(id) = param.named_child(0)
                    && id.kind() == "identifier"
                {
                    names.push(source[id.byte_range()].to_string());
                }
            }
            "default_parameter" | "typed_default_parameter" => {
                if let Some(id) = param.child_by_field_name("name")
                    && id.kind() == "identifier"
                {
                    names.push(source[id.byte_range()].to_string());
                }
            }
            _ => {}
        }
    }
    names
}

/// Best-effort return annotation: only simple names and literal constants
/// resolve; generics and other complex annotations yield `None`.
fn return_type_hint(function: Node<'_>, source: &str) -> Option<String> {
    let annotation = function.child_by_field_name("return_type")?;
    let expr = if annotation.kind() == "type" {
        annotation.named_child(0)?
    } else {
        annotation
    };
    match expr.kind() {
        "identifier" | "none" | "true" | "false" | "integer" | "float" => {
            Some(source[expr.byte_range()].to_string())
        }
        "string" => Some(string_content(expr, source)),
        _ => None,
    }
}

fn is_async(function: Node<'_>) -> bool {
    function.child(0).is_some_and(|c| c.kind() == "async")
}
