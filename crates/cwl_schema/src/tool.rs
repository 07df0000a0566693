//! The `CommandLineTool` document model.

use crate::input::CommandInputParameter;
use crate::normalize::{normalize, InputFamily, OutputFamily, ParameterFamily};
use crate::output::CommandOutputParameter;
use cwl_core::{
    scalar_text, shape_name, OneOrMany, SchemaValidationError, Violation, ROOT_LOCATION,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Document kind written by default in the `class` field
pub const COMMAND_LINE_TOOL_CLASS: &str = "CommandLineTool";

/// A validated `CommandLineTool` document.
///
/// `inputs` and `outputs` are always held in sequence form regardless of
/// how they were written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLineTool {
    #[serde(rename = "class")]
    cls: String,
    #[serde(rename = "cwlVersion")]
    cwl_version: Option<String>,
    inputs: Vec<CommandInputParameter>,
    outputs: Vec<CommandOutputParameter>,
    #[serde(rename = "baseCommand")]
    base_command: Option<OneOrMany>,
}

impl CommandLineTool {
    /// Build a tool from an already decoded value tree.
    ///
    /// All fields are checked; every violation found is reported.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError`] if the tree does not describe a
    /// valid tool
    pub fn from_value(value: Value) -> Result<Self, SchemaValidationError> {
        let mut document = match value {
            Value::Object(map) => map,
            other => {
                return Err(SchemaValidationError::single(Violation::invalid_shape(
                    ROOT_LOCATION,
                    format!("a mapping, found {}", shape_name(&other)),
                )));
            }
        };

        let mut violations = Vec::new();

        let cls = optional_string(&mut document, "class", &mut violations, false)
            .unwrap_or_else(|| COMMAND_LINE_TOOL_CLASS.to_string());
        let cwl_version = optional_string(&mut document, "cwlVersion", &mut violations, true);
        let base_command = base_command(&mut document, &mut violations);
        let inputs = collection::<InputFamily>(&mut document, &mut violations);
        let outputs = collection::<OutputFamily>(&mut document, &mut violations);

        if !violations.is_empty() {
            tracing::debug!(count = violations.len(), "tool document failed validation");
            return Err(SchemaValidationError::new(violations));
        }

        Ok(Self {
            cls,
            cwl_version,
            inputs,
            outputs,
            base_command,
        })
    }

    /// Document kind
    #[must_use]
    pub fn cls(&self) -> &str {
        &self.cls
    }

    /// Whether the document declares itself a `CommandLineTool`
    #[must_use]
    pub fn is_command_line_tool(&self) -> bool {
        self.cls == COMMAND_LINE_TOOL_CLASS
    }

    /// Declared CWL version
    #[must_use]
    pub fn cwl_version(&self) -> Option<&str> {
        self.cwl_version.as_deref()
    }

    /// Input parameters in document order
    #[must_use]
    pub fn inputs(&self) -> &[CommandInputParameter] {
        &self.inputs
    }

    /// Output parameters in document order
    #[must_use]
    pub fn outputs(&self) -> &[CommandOutputParameter] {
        &self.outputs
    }

    /// Input parameter with the given identifier
    #[must_use]
    pub fn input(&self, identifier: &str) -> Option<&CommandInputParameter> {
        self.inputs
            .iter()
            .find(|p| p.identifier() == Some(identifier))
    }

    /// Output parameter with the given identifier
    #[must_use]
    pub fn output(&self, identifier: &str) -> Option<&CommandOutputParameter> {
        self.outputs
            .iter()
            .find(|p| p.identifier() == Some(identifier))
    }

    /// The `baseCommand` field as written
    #[must_use]
    pub fn base_command(&self) -> Option<&OneOrMany> {
        self.base_command.as_ref()
    }

    /// Executable to invoke: the lone `baseCommand` string or its first
    /// element. `None` when absent or empty.
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        self.base_command.as_ref().and_then(OneOrMany::first)
    }

    /// Fixed arguments following the command in `baseCommand`
    #[must_use]
    pub fn base_arguments(&self) -> &[String] {
        match &self.base_command {
            Some(OneOrMany::Many(items)) => items.get(1..).unwrap_or(&[]),
            Some(OneOrMany::One(_)) | None => &[],
        }
    }

    /// Dump the canonical form of the tool
    ///
    /// # Errors
    ///
    /// Returns error if a stored value cannot be represented
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Take an optional string field. Numbers and booleans are read as their
/// text. `null` is accepted only when `nullable`.
fn optional_string(
    document: &mut Map<String, Value>,
    field: &str,
    violations: &mut Vec<Violation>,
    nullable: bool,
) -> Option<String> {
    match document.remove(field) {
        None => None,
        Some(Value::Null) if nullable => None,
        Some(other) => {
            let text = scalar_text(&other);
            if text.is_none() {
                violations.push(Violation::invalid_shape(
                    field,
                    format!("a string, found {}", shape_name(&other)),
                ));
            }
            text
        }
    }
}

fn base_command(
    document: &mut Map<String, Value>,
    violations: &mut Vec<Violation>,
) -> Option<OneOrMany> {
    let value = match document.remove("baseCommand") {
        None | Some(Value::Null) => return None,
        Some(value) => value,
    };
    let command = OneOrMany::from_value(&value);
    if command.is_none() {
        violations.push(Violation::invalid_shape(
            "baseCommand",
            "a string or a sequence of strings",
        ));
    }
    command
}

fn collection<F: ParameterFamily>(
    document: &mut Map<String, Value>,
    violations: &mut Vec<Violation>,
) -> Vec<F::Parameter> {
    let Some(value) = document.remove(F::FIELD) else {
        violations.push(Violation::missing(F::FIELD));
        return Vec::new();
    };
    match normalize::<F>(value) {
        Ok(parameters) => parameters,
        Err(found) => {
            violations.extend(found);
            Vec::new()
        }
    }
}
