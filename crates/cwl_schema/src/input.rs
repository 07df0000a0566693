//! Input parameters and their argument formatting rules.

use crate::binding::CommandLineBinding;
use crate::registry::{lookup_input, InputVariant};
use cwl_core::{
    is_truthy, render_value, text_field, ArgumentError, OneOrMany, ViolationKind,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::path::{Component, Path, PathBuf};

/// Identifier used in error messages for parameters without one
const ANONYMOUS: &str = "<anonymous>";

/// Input record as it appears in a document, before variant dispatch.
#[derive(Debug, Deserialize)]
pub(crate) struct InputRecord {
    #[serde(rename = "type")]
    type_tag: String,
    #[serde(default, deserialize_with = "text_field")]
    label: Option<String>,
    #[serde(default, rename = "id", deserialize_with = "text_field")]
    identifier: Option<String>,
    #[serde(default)]
    streamable: bool,
    #[serde(default, rename = "inputBinding")]
    binding: Option<CommandLineBinding>,
    #[serde(default)]
    default: Option<Value>,
    #[serde(default)]
    doc: Option<OneOrMany>,
}

/// Fields shared by every input parameter variant.
///
/// The binding is always present: a record without `inputBinding` gets a
/// binding with every field at its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputParameter {
    #[serde(rename = "type")]
    type_tag: String,
    label: Option<String>,
    #[serde(rename = "id")]
    identifier: Option<String>,
    streamable: bool,
    #[serde(rename = "inputBinding")]
    binding: CommandLineBinding,
    default: Option<Value>,
    doc: Option<OneOrMany>,
}

impl InputParameter {
    /// Create a parameter with the given type tag and default fields
    #[must_use]
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            label: None,
            identifier: None,
            streamable: false,
            binding: CommandLineBinding::new(),
            default: None,
            doc: None,
        }
    }

    /// Build from a decoded record. A supplied `identifier` takes
    /// precedence over the record's own `id`.
    pub(crate) fn from_record(record: InputRecord, identifier: Option<String>) -> Self {
        Self {
            type_tag: record.type_tag,
            label: record.label,
            identifier: identifier.or(record.identifier),
            streamable: record.streamable,
            binding: record.binding.unwrap_or_default(),
            default: record.default,
            doc: record.doc,
        }
    }

    /// Set the identifier
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Set the label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the binding
    #[must_use]
    pub fn with_binding(mut self, binding: CommandLineBinding) -> Self {
        self.binding = binding;
        self
    }

    /// Set the default value
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Set the documentation
    #[must_use]
    pub fn with_doc(mut self, doc: OneOrMany) -> Self {
        self.doc = Some(doc);
        self
    }

    /// Set whether the parameter is streamable
    #[must_use]
    pub fn with_streamable(mut self, streamable: bool) -> Self {
        self.streamable = streamable;
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

    /// Command line binding
    #[must_use]
    pub fn binding(&self) -> &CommandLineBinding {
        &self.binding
    }

    /// Default value, not checked against the type tag
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Documentation
    #[must_use]
    pub fn doc(&self) -> Option<&OneOrMany> {
        self.doc.as_ref()
    }

    fn display_identifier(&self) -> String {
        self.identifier.as_deref().unwrap_or(ANONYMOUS).to_string()
    }
}

/// Payload of the `File` variant.
///
/// Arguments are rendered as a `{identifier}` placeholder; the actual path
/// is substituted by a later stage using [`FileInput::format_file_binding`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FileInput {
    parameter: InputParameter,
}

impl FileInput {
    /// Shared parameter fields
    #[must_use]
    pub fn parameter(&self) -> &InputParameter {
        &self.parameter
    }

    /// Placeholder token substituted for the file path
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::MissingIdentifier`] if the parameter has no identifier
    pub fn placeholder(&self) -> Result<String, ArgumentError> {
        self.parameter
            .identifier()
            .map(|id| format!("{{{}}}", id))
            .ok_or(ArgumentError::MissingIdentifier)
    }

    fn format_arguments(&self) -> Result<Vec<String>, ArgumentError> {
        Ok(self.parameter.binding.apply(self.placeholder()?))
    }

    /// Resolve a `{"path": ...}` value against the process working directory
    ///
    /// # Errors
    ///
    /// Returns error if the identifier or path is missing, or the working
    /// directory cannot be read
    pub fn format_file_binding(
        &self,
        value: &Value,
    ) -> Result<IndexMap<String, PathBuf>, ArgumentError> {
        let cwd = std::env::current_dir().map_err(|e| ArgumentError::WorkingDirectory {
            message: e.to_string(),
        })?;
        self.format_file_binding_from(value, &cwd)
    }

    /// Resolve a `{"path": ...}` value against `base`.
    ///
    /// Resolution is lexical; the file is not required to exist.
    ///
    /// # Errors
    ///
    /// Returns error if the identifier or path is missing
    pub fn format_file_binding_from(
        &self,
        value: &Value,
        base: &Path,
    ) -> Result<IndexMap<String, PathBuf>, ArgumentError> {
        let identifier = self
            .parameter
            .identifier()
            .ok_or(ArgumentError::MissingIdentifier)?;
        let path = value
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| ArgumentError::MissingPath {
                identifier: identifier.to_string(),
            })?;

        let mut binding = IndexMap::new();
        binding.insert(identifier.to_string(), normalize_lexically(&base.join(path)));
        Ok(binding)
    }
}

/// Drop `.` segments and fold `..` into the preceding component
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// An input parameter, dispatched on its declared type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandInputParameter {
    /// `null`
    Base(InputParameter),
    /// `boolean`
    Boolean(InputParameter),
    /// `int` / `long`
    Int(InputParameter),
    /// `float` / `double`
    Float(InputParameter),
    /// `string`
    String(InputParameter),
    /// `File`
    File(FileInput),
}

impl InputVariant {
    /// Wrap shared fields into this variant
    #[must_use]
    pub fn build(self, parameter: InputParameter) -> CommandInputParameter {
        match self {
            Self::Base => CommandInputParameter::Base(parameter),
            Self::Boolean => CommandInputParameter::Boolean(parameter),
            Self::Int => CommandInputParameter::Int(parameter),
            Self::Float => CommandInputParameter::Float(parameter),
            Self::String => CommandInputParameter::String(parameter),
            Self::File => CommandInputParameter::File(FileInput { parameter }),
        }
    }
}

impl CommandInputParameter {
    /// Select the variant from the parameter's type tag
    ///
    /// # Errors
    ///
    /// Returns [`ViolationKind::UnknownType`] if the tag is not registered
    pub fn from_parameter(parameter: InputParameter) -> Result<Self, ViolationKind> {
        let variant = lookup_input(parameter.type_tag())?;
        Ok(variant.build(parameter))
    }

    /// Shared parameter fields
    #[must_use]
    pub fn parameter(&self) -> &InputParameter {
        match self {
            Self::Base(p) | Self::Boolean(p) | Self::Int(p) | Self::Float(p) | Self::String(p) => {
                p
            }
            Self::File(f) => &f.parameter,
        }
    }

    /// Runtime variant
    #[must_use]
    pub fn variant(&self) -> InputVariant {
        match self {
            Self::Base(_) => InputVariant::Base,
            Self::Boolean(_) => InputVariant::Boolean,
            Self::Int(_) => InputVariant::Int,
            Self::Float(_) => InputVariant::Float,
            Self::String(_) => InputVariant::String,
            Self::File(_) => InputVariant::File,
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

    /// Command line binding
    #[must_use]
    pub fn binding(&self) -> &CommandLineBinding {
        self.parameter().binding()
    }

    /// The `File` payload, if this is a file input
    #[must_use]
    pub fn as_file(&self) -> Option<&FileInput> {
        match self {
            Self::File(f) => Some(f),
            _ => None,
        }
    }

    /// Render `value` into command-line tokens.
    ///
    /// Boolean inputs emit only their prefix when `value` is truthy and
    /// nothing otherwise. File inputs ignore `value` and emit a
    /// `{identifier}` placeholder.
    ///
    /// # Errors
    ///
    /// Returns error for a truthy boolean without prefix, or a file input
    /// without identifier
    pub fn format_arguments(&self, value: &Value) -> Result<Vec<String>, ArgumentError> {
        match self {
            Self::Boolean(p) => {
                if !is_truthy(value) {
                    return Ok(Vec::new());
                }
                match &p.binding.prefix {
                    Some(prefix) => Ok(vec![prefix.clone()]),
                    None => Err(ArgumentError::MissingPrefix {
                        identifier: p.display_identifier(),
                    }),
                }
            }
            Self::File(f) => f.format_arguments(),
            Self::Base(p) | Self::Int(p) | Self::Float(p) | Self::String(p) => {
                Ok(p.binding.apply(render_value(value)))
            }
        }
    }
}

impl Serialize for CommandInputParameter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.parameter().serialize(serializer)
    }
}
