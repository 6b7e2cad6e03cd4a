//! Core domain types for stepdag.
//!
//! - **`action`**: the closed set of step actions
//! - **`step`**: proposed steps from the parser and identified steps
//! - **`plan`**: execution levels and the final plan
//! - **`warning`**: non-fatal findings surfaced with a plan

pub mod action;
pub mod plan;
pub mod step;
pub mod warning;

pub use action::*;
pub use plan::*;
pub use step::*;
pub use warning::*;
