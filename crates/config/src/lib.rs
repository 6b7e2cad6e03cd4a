//! Configuration for the stepdag planner
//!
//! This crate defines `PlannerConfig` and the loader that layers defaults, a
//! JSON file and `STEPDAG_*` environment variables.

pub mod config;
pub mod loader;

#[cfg(test)]
mod config_tests;

pub use config::*;
pub use loader::*;
