//! Collect referenced module names from import statements.

use tree_sitter::{Node, Tree};

/// Extract imported module names in source order, duplicates preserved.
///
/// `import a.b, c` contributes `a.b` and `c`; `from x.y import z`
/// contributes `x.y`; aliases are ignored in favor of the original name.
/// Imports inside function or class bodies count the same as top-level ones.
pub fn extract(tree: &Tree, source: &str) -> Vec<String> {
    let mut modules = Vec::new();
    walk(tree.root_node(), source, &mut modules);
    modules
}

fn walk(node: Node<'_>, source: &str, modules: &mut Vec<String>) {
    match node.kind() {
        "import_statement" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                match child.kind() {
                    "dotted_name" => modules.push(source[child.byte_range()].to_string()),
                    "aliased_import" => {
                        if let Some(name) = child.child_by_field_name("name") {
                            modules.push(source[name.byte_range()].to_string());
                        }
                    }
                    _ => {}
                }
            }
        }
        "import_from_statement" => {
            if let Some(module) = node.child_by_field_name("module_name") {
                modules.push(source[module.byte_range()].to_string());
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                walk(child, source, modules);
            }
        }
    }
}
