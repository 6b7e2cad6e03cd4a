// Re-export command modules
pub mod commands;
pub mod formatters;
pub mod input;

// Re-export commonly used types
pub use commands::Commands;
pub use formatters::OutputFormat;
