//! Core domain types, errors, and constants for `stepdag`.
//!
//! ## Key Components
//!
//! - **`errors`**: the `Error` enum and `Result` alias covering every planning
//!   failure, with `miette` diagnostics attached.
//! - **`types`**: `Action`, `ProposedStep`, `Step`, `ExecutionLevel`,
//!   `ExecutionPlan` and `PlanWarning`.
//! - **`constants`**: shared defaults and environment variable names.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, ErrorKind, MissingReference, Result, ResultExt},
    types::*,
};
