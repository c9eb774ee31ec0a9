//! Filesystem primitives for rulekit
//!
//! Provides normalized path handling, package-name validation, and the
//! atomic write primitive every installed file goes through.

pub mod error;
pub mod io;
pub mod path;

pub use error::{Error, Result};
pub use io::{LinkOutcome, WriteOutcome};
pub use path::{NormalizedPath, validate_package_name};
