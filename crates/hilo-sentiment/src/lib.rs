//! # hilo-sentiment
//!
//! Rule-based sentiment scoring for Spanish chat text.
//!
//! A [`Lexicon`] (embedded TOML, replaceable from a path) supplies word,
//! emoji and idiom polarities plus the intensifier, negator and adversative
//! tables. [`SentimentEvaluator`] scores each sentence over a dependency
//! parse when a [`DependencyParser`] is available (the crate ships
//! [`ShallowParser`]) and over a token window otherwise. [`summarize`]
//! aggregates per-message results into chat and per-user summaries.

pub mod aggregate;
pub mod error;
pub mod evaluator;
pub mod lexicon;
pub mod parser;
pub mod tokens;

pub use aggregate::{summarize, summarize_results};
pub use error::LexiconError;
pub use evaluator::SentimentEvaluator;
pub use lexicon::Lexicon;
pub use parser::{DependencyParser, ShallowParser};
