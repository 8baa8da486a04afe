//! # leaklint-rules
//!
//! Built-in lint rules for leaklint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | GL001 | `resource-leak` | Opened files, connections and handles without a close |
//! | GL002 | `shared-logger` | Standard `log` or ad-hoc loggers instead of the shared logger |
//!
//! ## Usage
//!
//! ```ignore
//! use leaklint_core::Analyzer;
//! use leaklint_rules::{ResourceLeak, SharedLogger};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./services")
//!     .rule(ResourceLeak::new().exempt_test_files(true))
//!     .rule(SharedLogger::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod resource_leak;
mod presets;
pub mod shared_logger;

pub use presets::{all_rules, recommended_rules, rules_from_config, Preset};
pub use resource_leak::patterns::{OpenerMatch, PatternTables};
pub use resource_leak::ResourceLeak;
pub use shared_logger::SharedLogger;

/// Re-export core types for convenience.
pub use leaklint_core::{Finding, Rule, Severity};
