//! Ambient stack shared by CompostKaki services: errors, tracing, health,
//! request middleware and environment configuration.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
