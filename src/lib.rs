//! Herald engagement analytics service.
//!
//! Hosts the insight HTTP function and the operator CLI on top of the
//! workspace crates.

pub mod cli;
pub mod config;
pub mod metrics;
pub mod server;

pub use config::Config;
pub use server::{build_router, HttpError, ServeState};
