//! Domain layer: pure models, errors, and collaborator ports.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{SwarmError, SwarmResult};
