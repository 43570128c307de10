//! Demo HTTP service for container/orchestration pipelines.
//!
//! Exposes health, readiness, Prometheus metrics, and informational endpoints
//! behind a fixed middleware chain (security headers, access logging, request
//! duration tracking). All handlers return static or trivially-derived JSON;
//! the service exists to be probed, scraped, and scheduled, not to compute.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`metrics`]: Prometheus recorder and process metrics collection
//! - [`api`]: HTTP routes, handlers, and middleware
//! - [`server`]: Listener setup and serve loop
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod server;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
