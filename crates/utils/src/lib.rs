//! Shared utilities for stepdag
//!
//! Currently the logging setup used by the binary and the spans emitted by
//! the planner.

pub mod tracing;
