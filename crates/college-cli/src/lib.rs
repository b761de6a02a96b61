//! CLI library components for the college matcher.

pub mod batch;
pub mod config;
pub mod logging;
