//! Tree-sitter based source analysis for sema.
//!
//! Parses Python source into a syntax tree and extracts structural symbols,
//! import references, complexity metrics, and anti-pattern findings. All
//! passes are pure functions of the tree; nothing here touches the
//! filesystem or mutates shared state.

pub mod imports;
pub mod metrics;
pub mod patterns;
pub mod symbols;
pub mod treesitter;

pub use treesitter::{ParseError, parse};
