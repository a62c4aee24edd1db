//! Application services layer.

pub mod classify;
pub mod error;
pub mod notify;
pub mod posts;
pub mod relay;
pub mod repos;
