//! Dependency planning for model-proposed steps
//!
//! This crate turns a flat list of proposed steps into a verified DAG and an
//! execution plan: a deterministic total order plus concurrency levels.
//!
//! - **`identifier`**: readable, collision-free step identifiers
//! - **`extract`**: parsing of `Depends on:` style annotations
//! - **`graph`**: unchecked graph assembly
//! - **`validate`**: self-loop pruning, duplicate, missing-reference and cycle checks
//! - **`sort`**: Kahn's algorithm with declaration-order tie-breaking
//! - **`levels`**: grouping into concurrently runnable levels
//! - **`critical_path`**: longest chain of sequential dependencies
//! - **`planner`**: the pipeline tying the above together

pub mod critical_path;
pub mod extract;
pub mod graph;
pub mod identifier;
pub mod levels;
pub mod planner;
pub mod sort;
pub mod validate;

pub use critical_path::critical_path;
pub use extract::{extract_references, resolve_references, ReferenceIndex};
pub use graph::{GraphNode, StepGraph};
pub use identifier::{slugify, IdentifierGenerator, IssuedIdentifier};
pub use levels::{partition_levels, sequential_levels, step_levels};
pub use planner::{IdentifiedSteps, Planner};
pub use sort::{is_valid_linearization, topological_order, SortFault, SortOutcome};
pub use validate::{DependencyType, GraphValidator, ValidatedGraph};
