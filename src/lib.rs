//! Quillpost: a small blog service that classifies new posts and fans them out
//! to a relay webhook, a chat channel and a team mailbox.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
