//! Rule document content for rulekit
//!
//! A rule document is a `---` delimited YAML metadata header followed by a
//! free-form body. This crate provides the ordered [`Metadata`] abstraction
//! and the codec that splits raw bytes into a [`Document`] and marshals it
//! back.

pub mod codec;
pub mod error;
pub mod metadata;

pub use codec::{Document, HEADER_DELIMITER, marshal, split};
pub use error::{Error, ParseErrorKind, Result};
pub use metadata::{Metadata, Value};
