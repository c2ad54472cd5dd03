//! Leadbook - a lightweight CLI for tracking sales leads.
//!
//! This library exposes the core modules for use in integration tests.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod lead;
pub mod logging;
pub mod query;
pub mod store;
