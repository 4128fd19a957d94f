pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod server;
pub mod types;

// Application layer: use cases and the ports they depend on
pub mod app;
// Adapters implementing the ports
pub mod infra;
