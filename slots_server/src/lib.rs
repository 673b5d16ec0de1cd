//! HTTP server for the Vegas slot machine.
//!
//! - [`api`]: Router, handlers and middleware
//! - [`config`]: Environment and CLI configuration
//! - [`logging`]: Structured logging setup
//! - [`metrics`]: Prometheus metrics

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
