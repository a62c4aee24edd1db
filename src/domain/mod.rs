//! Domain layer types and invariants.

pub mod classify;
pub mod entities;
pub mod error;
pub mod posts;
pub mod types;
