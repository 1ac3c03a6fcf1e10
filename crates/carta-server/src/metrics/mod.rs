//! Metrics module for the Carta server.

pub mod http;
pub mod setup;

pub use setup::init_metrics;
