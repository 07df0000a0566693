//! CWL toolkit core types
//!
//! Error model shared by the schema and parser crates, plus small helpers
//! over the decoded value tree. No I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod value;

// Re-exports
pub use error::{
    ArgumentError, DocumentParseError, ParseError, ParseResult, SchemaValidationError, Violation,
    ViolationKind, ROOT_LOCATION,
};
pub use value::{
    integer_field, is_truthy, render_value, scalar_text, shape_name, text_field, OneOrMany,
};
