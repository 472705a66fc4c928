//! Complexity and maintainability metrics.

use sema_core::model::{CodeSymbol, SymbolKind};
use tree_sitter::Node;

/// Node kinds that open an extra execution path.
const DECISION_KINDS: [&str; 5] = [
    "if_statement",
    "elif_clause",
    "while_statement",
    "for_statement",
    "except_clause",
];

/// Cyclomatic complexity of a function definition node.
///
/// Starts at 1 (the base path) and adds one per conditional, loop, or
/// exception handler in the subtree. Boolean operators add one per
/// `boolean_operator` node, so a chain of N operands contributes N-1 —
/// standard decision-point counting. Nested definitions count toward
/// their enclosing function, matching a plain full-subtree walk.
pub fn cyclomatic_complexity(function: Node<'_>) -> u32 {
    1 + decision_points(function)
}

fn decision_points(node: Node<'_>) -> u32 {
    let mut count = 0;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if DECISION_KINDS.contains(&child.kind()) || child.kind() == "boolean_operator" {
            count += 1;
        }
        count += decision_points(child);
    }
    count
}

/// Mean cyclomatic complexity over all functions and methods in a file.
/// Defined as 1.0 when the file has no functions, avoiding a zero divide
/// without signaling an error.
pub fn complexity_score(symbols: &[CodeSymbol]) -> f64 {
    let complexities: Vec<u32> = symbols
        .iter()
        .filter(|s| matches!(s.kind, SymbolKind::Function | SymbolKind::Method))
        .map(|s| s.cyclomatic_complexity)
        .collect();
    if complexities.is_empty() {
        return 1.0;
    }
    f64::from(complexities.iter().sum::<u32>()) / complexities.len() as f64
}

/// Simplified maintainability index in [0, 100].
///
/// `MI = 171 - 5.2 * ln(max(LOC, 1)) - 0.23 * complexity_score`, clamped.
/// This deliberately omits the Halstead-volume term of the published
/// formula — computing it would require token-level lexical analysis this
/// engine does not perform — so scores here are an approximation, not the
/// classical MI. An empty file scores exactly 100.0 by convention.
pub fn maintainability_index(lines_of_code: usize, complexity_score: f64) -> f64 {
    if lines_of_code == 0 {
        return 100.0;
    }
    let loc = lines_of_code.max(1) as f64;
    let mi = 171.0 - 5.2 * loc.ln() - 0.23 * complexity_score;
    mi.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols;
    use crate::treesitter::parse;
    use std::path::Path;

    fn complexity_of(source: &str) -> u32 {
        let tree = parse(source).unwrap();
        let syms = symbols::extract(&tree, source, Path::new("test.py"));
        syms[0].cyclomatic_complexity
    }

    #[test]
    fn test_straight_line_function_is_one() {
        assert_eq!(complexity_of("def f():\n    return 2\n"), 1);
    }

    #[test]
    fn test_if_elif_counts_each_branch_point() {
        let source = "def f(x):\n    if x:\n        return 2\n    elif x > 3:\n        return 4\n    return 5\n";
        assert_eq!(complexity_of(source), 3);
    }

    #[test]
    fn test_loops_and_except_counted() {
        let source = "def f(items):\n    for i in items:\n        while i:\n            try:\n                i = step(i)\n            except ValueError:\n                break\n";
        assert_eq!(complexity_of(source), 4);
    }

    #[test]
    fn test_boolean_chain_counts_extra_operands() {
        // `a and b and c` has two boolean_operator nodes: 1 + 2 = 3.
        let source = "def f(a, b, c):\n    return a and b and c\n";
        assert_eq!(complexity_of(source), 3);
    }

    #[test]
    fn test_mixed_conditions() {
        // if (+1) with `a or b` (+1) = 3.
        let source = "def f(a, b):\n    if a or b:\n        return a\n    return b\n";
        assert_eq!(complexity_of(source), 3);
    }

    #[test]
    fn test_complexity_score_mean() {
        let source = "def f(x):\n    if x:\n        return x\n    return 0\n\ndef g():\n    return 1\n";
        let tree = parse(source).unwrap();
        let syms = symbols::extract(&tree, source, Path::new("test.py"));
        // f = 2, g = 1, mean = 1.5
        assert_eq!(complexity_score(&syms), 1.5);
    }

    #[test]
    fn test_complexity_score_no_functions() {
        assert_eq!(complexity_score(&[]), 1.0);
    }

    #[test]
    fn test_maintainability_empty_file_is_hundred() {
        assert_eq!(maintainability_index(0, 1.0), 100.0);
    }

    #[test]
    fn test_maintainability_in_range() {
        for loc in [1, 10, 100, 10_000, 1_000_000] {
            for score in [1.0, 5.0, 50.0, 500.0] {
                let mi = maintainability_index(loc, score);
                assert!((0.0..=100.0).contains(&mi), "MI out of range: {mi}");
            }
        }
    }

    #[test]
    fn test_maintainability_decreases_with_size() {
        let small = maintainability_index(10, 1.0);
        let large = maintainability_index(10_000, 1.0);
        assert!(small > large);
    }
}
