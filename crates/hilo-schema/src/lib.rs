//! # hilo-schema
//!
//! JSON Schemas for every artifact Hilo persists, generated from the
//! `hilo-core` types with `schemars`, and validation of JSON values against
//! them with `jsonschema`.
//!
//! The store validates each artifact before writing it and `hilo schema`
//! exports the schemas for external tooling.

pub mod error;
pub mod registry;

pub use error::SchemaError;
pub use registry::SchemaRegistry;
