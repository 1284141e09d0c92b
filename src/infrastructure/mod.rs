//! Infrastructure layer: adapters behind the domain ports.

pub mod config;
pub mod providers;
pub mod stores;
pub mod workspace;
