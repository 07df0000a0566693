//! Output parameters.
//!
//! The variants carry no behaviour of their own; they exist so capture
//! stages can match on the kind of output.

use crate::binding::CommandOutputBinding;
use crate::registry::{lookup_output, OutputVariant};
use cwl_core::{text_field, OneOrMany, ViolationKind};
use serde::{Deserialize, Serialize, Serializer};

/// Output record as it appears in a document, before variant dispatch.
#[derive(Debug, Deserialize)]
pub(crate) struct OutputRecord {
    #[serde(rename = "type")]
    type_tag: String,
    #[serde(default, deserialize_with = "text_field")]
    label: Option<String>,
    #[serde(default, rename = "id", deserialize_with = "text_field")]
    identifier: Option<String>,
    #[serde(default)]
    streamable: bool,
    #[serde(default, rename = "outputBinding")]
    binding: Option<CommandOutputBinding>,
    #[serde(default)]
    doc: Option<OneOrMany>,
}

/// Fields shared by every output parameter variant.
///
/// Unlike input parameters, an absent binding stays absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputParameter {
    #[serde(rename = "type")]
    type_tag: String,
    label: Option<String>,
    #[serde(rename = "id")]
    identifier: Option<String>,
    streamable: bool,
    #[serde(rename = "outputBinding")]
    binding: Option<CommandOutputBinding>,
    doc: Option<OneOrMany>,
}

impl OutputParameter {
    /// Create a parameter with the given type tag and default fields
    #[must_use]
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            label: None,
            identifier: None,
            streamable: false,
            binding: None,
            doc: None,
        }
    }

    pub(crate) fn from_record(record: OutputRecord, identifier: Option<String>) -> Self {
        Self {
            type_tag: record.type_tag,
            label: record.label,
            identifier: identifier.or(record.identifier),
            streamable: record.streamable,
            binding: record.binding,
            doc: record.doc,
        }
    }

    /// Set the identifier
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Set the binding
    #[must_use]
    pub fn with_binding(mut self, binding: CommandOutputBinding) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Declared type tag
    #[must_use]
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// Display label
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Identifier
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Whether the value may be streamed
    #[must_use]
    pub fn streamable(&self) -> bool {
        self.streamable
    }

    /// Output binding, if declared
    #[must_use]
    pub fn binding(&self) -> Option<&CommandOutputBinding> {
        self.binding.as_ref()
    }

    /// Documentation
    #[must_use]
    pub fn doc(&self) -> Option<&OneOrMany> {
        self.doc.as_ref()
    }
}

/// An output parameter, dispatched on its declared type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutputParameter {
    /// Output of a type no registered tag selects
    Generic(OutputParameter),
    /// `File`
    File(OutputParameter),
    /// `stdout`
    Stdout(OutputParameter),
    /// `stderr`
    Stderr(OutputParameter),
}

impl OutputVariant {
    /// Wrap shared fields into this variant
    #[must_use]
    pub fn build(self, parameter: OutputParameter) -> CommandOutputParameter {
        match self {
            Self::Generic => CommandOutputParameter::Generic(parameter),
            Self::File => CommandOutputParameter::File(parameter),
            Self::Stdout => CommandOutputParameter::Stdout(parameter),
            Self::Stderr => CommandOutputParameter::Stderr(parameter),
        }
    }
}

impl CommandOutputParameter {
    /// Select the variant from the parameter's type tag
    ///
    /// # Errors
    ///
    /// Returns [`ViolationKind::UnknownType`] if the tag is not registered
    pub fn from_parameter(parameter: OutputParameter) -> Result<Self, ViolationKind> {
        let variant = lookup_output(parameter.type_tag())?;
        Ok(variant.build(parameter))
    }

    /// Shared parameter fields
    #[must_use]
    pub fn parameter(&self) -> &OutputParameter {
        match self {
            Self::Generic(p) | Self::File(p) | Self::Stdout(p) | Self::Stderr(p) => p,
        }
    }

    /// Runtime variant
    #[must_use]
    pub fn variant(&self) -> OutputVariant {
        match self {
            Self::Generic(_) => OutputVariant::Generic,
            Self::File(_) => OutputVariant::File,
            Self::Stdout(_) => OutputVariant::Stdout,
            Self::Stderr(_) => OutputVariant::Stderr,
        }
    }

    /// Identifier
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.parameter().identifier()
    }

    /// Declared type tag
    #[must_use]
    pub fn type_tag(&self) -> &str {
        self.parameter().type_tag()
    }

    /// Output binding, if declared
    #[must_use]
    pub fn binding(&self) -> Option<&CommandOutputBinding> {
        self.parameter().binding()
    }

    /// Whether the output captures a standard stream
    #[must_use]
    pub fn is_stream_capture(&self) -> bool {
        matches!(self, Self::Stdout(_) | Self::Stderr(_))
    }
}

impl Serialize for CommandOutputParameter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.parameter().serialize(serializer)
    }
}
