/// Constants used throughout the stepdag codebase
// Identifier generation
pub const DEFAULT_ID_PREFIX: &str = "step";
pub const DEFAULT_MAX_SLUG_LEN: usize = 20;
pub const MAX_SLUG_LEN_LIMIT: usize = 64;

// Environment variable names
pub const STEPDAG_LOG_VAR: &str = "STEPDAG_LOG";
pub const STEPDAG_ID_PREFIX_VAR: &str = "STEPDAG_ID_PREFIX";
pub const STEPDAG_MAX_SLUG_LEN_VAR: &str = "STEPDAG_MAX_SLUG_LEN";
pub const STEPDAG_PRUNE_SELF_LOOPS_VAR: &str = "STEPDAG_PRUNE_SELF_LOOPS";
pub const STEPDAG_SORT_FALLBACK_VAR: &str = "STEPDAG_SORT_FALLBACK";

// Dependency annotation values that mean "no dependencies"
pub const EMPTY_DEPENDENCY_MARKERS: &[&str] = &["none", "n/a", "na", "-"];
