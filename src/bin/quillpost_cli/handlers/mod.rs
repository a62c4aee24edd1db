#![deny(clippy::all, clippy::pedantic)]

pub mod classify;
pub mod posts;
