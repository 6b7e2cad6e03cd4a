//! Error types and result extensions for stepdag operations

mod builders;
mod conversions;
mod diagnostic;
mod display;
mod extensions;
mod types;

pub use extensions::*;
pub use types::{Error, ErrorKind, MissingReference, Result};
