//! # Journal Checker Common Library
//!
//! Shared code for the journal audit tools including:
//! - Error types
//! - Configuration loading and validation
//! - ISO calendar helpers and the `Period` type
//! - Period range parsing and enumeration

pub mod config;
pub mod error;
pub mod period;

pub use error::{Error, Result};
pub use period::{Period, PeriodRange};
