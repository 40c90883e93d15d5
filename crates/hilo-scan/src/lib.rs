//! # hilo-scan
//!
//! Rule-based multi-pattern scanner. A [`PatternScanner`] holds an ordered
//! catalog of named regexes grouped by [`PatternCategory`] and produces
//! per-message [`PatternMatchSet`]s plus context summaries.
//!
//! [`PatternCategory`]: hilo_core::enums::PatternCategory
//! [`PatternMatchSet`]: hilo_core::entities::PatternMatchSet

pub mod catalog;
pub mod context;
pub mod error;
pub mod names;
pub mod scanner;

pub use context::ContextSummary;
pub use error::ScanError;
pub use scanner::{PatternScanner, ScanOptions, ScannerBuilder};
