//! Header/body codec for rule documents

mod document;

pub use document::{Document, HEADER_DELIMITER, marshal, split};
