//! Shared test utilities for the rulekit workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`package`]: [`PackageFixture`](package::PackageFixture), a temporary
//!   package directory plus project workdir

pub mod package;

pub use package::{PackageFixture, rule_document};
