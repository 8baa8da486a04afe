//! Utility functions for rule implementations.

pub mod allowance;

// Re-export commonly used utilities for rule implementations
#[doc(inline)]
pub use allowance::{check_allow_with_reason, missing_reason_finding, AllowCheck};
