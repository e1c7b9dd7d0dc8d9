//! Common error handling utilities for the triage workspace
//!
//! This module provides the error type shared by the binaries and service
//! glue, together with stable error codes for machine-readable output.
//! Library crates keep their own `thiserror` enums and convert into
//! [`EngineError`] at the edge.
//!
//! # Error Categories
//!
//! - **Config**: configuration loading and validation failures
//! - **Validation**: malformed caller input (e.g. an unreadable assessment file)
//! - **Model**: scoring asset lookup, caching and loading
//! - **Logging**: subscriber installation problems
//! - **Io / Serialization**: wrapped standard failures
//!
//! # Example
//!
//! ```rust
//! use error_common::{EngineError, Result};
//!
//! fn parse_top_n(raw: &str) -> Result<usize> {
//!     raw.parse::<usize>()
//!         .map_err(|e| EngineError::Validation(format!("top_n must be a number: {}", e)))
//! }
//!
//! let err = parse_top_n("five").unwrap_err();
//! assert_eq!(err.code(), error_common::codes::validation::INVALID_INPUT);
//! ```

pub mod types;
pub mod codes;

pub use types::*;
