//! # leaklint-core
//!
//! Core framework for linting Go sources over `tree-sitter` syntax trees.
//!
//! This crate provides the foundational traits and types for building
//! Go linters. It includes:
//!
//! - [`SourceTree`] and the [`syntax`] walker for read-only tree inspection
//! - [`Rule`] trait for per-file rules
//! - [`Analyzer`] for discovering files and running rules in parallel
//! - [`Finding`] for representing lint results
//!
//! ## Example
//!
//! ```ignore
//! use leaklint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./services")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! for finding in &result.findings {
//!     println!("{finding}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod rule;
mod types;

/// Go syntax trees and traversal helpers.
pub mod syntax;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use rule::{Rule, RuleBox};
pub use syntax::{ParseError, SourceTree, Visit};
pub use types::{
    Finding, FindingDiagnostic, LintResult, Location, Severity, Suggestion, MAX_CONFIDENCE,
};
pub use utils::allowance::AllowCheck;
