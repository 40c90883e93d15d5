//! # hilo-core
//!
//! Core types, ID helpers, and error types for Hilo.
//!
//! This crate provides the foundational types shared across all Hilo crates:
//! - Entity structs for chats, messages and every derived artifact
//!   (link descriptors, pattern matches, sentiment, graph, threads, trends)
//! - Closed-set enums (chat kinds, intents, edge kinds, pattern categories)
//! - Node and thread ID formatting helpers
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
