//! CWL `CommandLineTool` document parser
//!
//! Decodes YAML text and builds a validated [`CommandLineTool`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod parser;
pub mod tags;

pub use cwl_core::{DocumentParseError, ParseError, ParseResult, SchemaValidationError};
pub use cwl_schema::CommandLineTool;
pub use parser::{
    parse_command_line_tool, parse_command_line_tool_file, parse_command_line_tool_reader,
    ParseOptions, Parser,
};
