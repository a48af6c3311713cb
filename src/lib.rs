//! Skycast Library
//!
//! This module exposes the weather pipeline, its clients and the dashboard for
//! the binary and for integration tests.

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod location;
pub mod logging;
pub mod pipeline;
pub mod theme;
pub mod ui;
pub mod worker;
