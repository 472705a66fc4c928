//! Core types and configuration for the sema analysis engine.
//!
//! Provides the analysis data model ([`model::SemanticAnalysis`] and its
//! constituent symbols and pattern findings) plus the tunable detector and
//! similarity configuration loaded from `sema.toml`.

pub mod config;
pub mod model;
