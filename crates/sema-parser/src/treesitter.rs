//! Tree-sitter integration: parse Python source into a syntax tree.
//!
//! Unlike the extraction passes, parsing is fallible: a source file the
//! grammar cannot make sense of is surfaced as [`ParseError::Syntax`] with
//! the first offending position preserved, and the caller caches nothing.

use tree_sitter::{Node, Tree};

/// Errors from turning raw source text into a syntax tree.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to load Python grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        /// 1-based line of the first error node.
        line: usize,
        /// 0-based column of the first error node.
        column: usize,
        message: String,
    },
}

/// Parse Python source text, rejecting trees that contain error nodes.
pub fn parse(source: &str) -> Result<Tree, ParseError> {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&tree_sitter_python::LANGUAGE.into())?;

    let tree = parser.parse(source, None).ok_or_else(|| ParseError::Syntax {
        line: 1,
        column: 0,
        message: "parser produced no tree".to_string(),
    })?;

    if let Some(err_node) = first_error(tree.root_node()) {
        let pos = err_node.start_position();
        return Err(ParseError::Syntax {
            line: pos.row + 1,
            column: pos.column,
            message: describe_error(err_node, source),
        });
    }

    Ok(tree)
}

/// Depth-first search for the first ERROR or missing node.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error()
            && let Some(err) = first_error(child)
        {
            return Some(err);
        }
    }
    // has_error() set but no ERROR descendant — report the node itself
    Some(node)
}

fn describe_error(node: Node<'_>, source: &str) -> String {
    if node.is_missing() {
        return format!("missing {}", node.kind());
    }
    let snippet: String = source[node.byte_range()].chars().take(30).collect();
    let snippet = snippet.trim();
    if snippet.is_empty() {
        "invalid syntax".to_string()
    } else {
        format!("invalid syntax near '{snippet}'")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_source() {
        let tree = parse("def f():\n    return 1\n").unwrap();
        assert_eq!(tree.root_node().kind(), "module");
    }

    #[test]
    fn test_parse_empty_source() {
        let tree = parse("").unwrap();
        assert_eq!(tree.root_node().named_child_count(), 0);
    }

    #[test]
    fn test_parse_rejects_broken_source() {
        let err = parse("def broken(:\n").unwrap_err();
        match err {
            ParseError::Syntax { line, .. } => assert_eq!(line, 1),
            ParseError::Grammar(_) => panic!("expected syntax error"),
        }
    }

    #[test]
    fn test_syntax_error_reports_offending_line() {
        let source = "x = 1\ny = 2\ndef oops(:\n";
        let err = parse(source).unwrap_err();
        match err {
            ParseError::Syntax { line, .. } => assert_eq!(line, 3),
            ParseError::Grammar(_) => panic!("expected syntax error"),
        }
    }

    #[test]
    fn test_syntax_error_message_is_descriptive() {
        let err = parse("def broken(:\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("syntax error"));
        assert!(msg.contains("line"));
    }
}
