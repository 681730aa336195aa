//! Business logic organized by bounded contexts.
//!
//! This server exposes a single domain: the analytics tools.

pub mod tools;
