//! CLI command implementations.

pub mod chat;
pub mod stack;
pub mod workflow;
