//! CWL `CommandLineTool` schema
//!
//! Typed input and output parameters, their bindings, the registries that
//! select a parameter variant from its declared type tag, and the tool
//! document that owns them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binding;
pub mod input;
pub mod normalize;
pub mod output;
pub mod registry;
pub mod tool;

pub use binding::{CommandLineBinding, CommandOutputBinding, ValueFrom};
pub use input::{CommandInputParameter, FileInput, InputParameter};
pub use normalize::{normalize, InputFamily, OutputFamily, ParameterFamily};
pub use output::{CommandOutputParameter, OutputParameter};
pub use registry::{
    lookup_input, lookup_output, InputParameterType, InputVariant, OutputParameterType,
    OutputVariant,
};
pub use tool::{CommandLineTool, COMMAND_LINE_TOOL_CLASS};
