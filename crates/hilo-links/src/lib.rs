//! # hilo-links
//!
//! Everything that turns URLs in message text into readable labels:
//! - [`LinkRegistry`]: ordered, data-driven site extractors producing
//!   [`LinkDescriptor`](hilo_core::entities::LinkDescriptor)s
//! - [`file_type`]: extension-based file labels for direct downloads
//! - [`TextNormalizer`]: URL substitution plus markdown stripping

pub mod error;
pub mod extractor;
pub mod file_type;
pub mod host;
pub mod markdown;
pub mod normalizer;
mod record;
pub mod registry;

pub use error::RegistryError;
pub use normalizer::{Normalized, TextNormalizer};
pub use registry::LinkRegistry;
