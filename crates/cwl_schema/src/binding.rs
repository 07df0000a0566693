//! Binding records describing how parameters map to and from the command line.

use cwl_core::{integer_field, text_field};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_true() -> bool {
    true
}

/// Source of an input value other than the job document.
///
/// Expressions are stored as given and never evaluated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueFrom {
    /// A literal string (possibly containing a parameter reference)
    Literal(String),
    /// Any other value, kept opaque
    Expression(Value),
}

/// How an input parameter becomes command-line tokens.
///
/// Only `prefix` and `separate` influence argument formatting. The other
/// fields are kept as metadata so the document round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandLineBinding {
    /// Ordering hint relative to other arguments
    #[serde(default, deserialize_with = "integer_field")]
    pub position: i64,
    /// Token emitted before the value
    #[serde(default, deserialize_with = "text_field")]
    pub prefix: Option<String>,
    /// Emit prefix and value as two tokens (`true`) or as `prefix=value`
    #[serde(default = "default_true")]
    pub separate: bool,
    /// Separator for joining array items
    #[serde(default, deserialize_with = "text_field")]
    pub item_separator: Option<String>,
    /// Value override
    #[serde(default)]
    pub value_from: Option<ValueFrom>,
    /// Whether the value should be shell quoted
    #[serde(default = "default_true")]
    pub shell_quote: bool,
}

impl CommandLineBinding {
    /// Create a binding with every field at its default
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: 0,
            prefix: None,
            separate: true,
            item_separator: None,
            value_from: None,
            shell_quote: true,
        }
    }

    /// Set the prefix
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set whether prefix and value are separate tokens
    #[must_use]
    pub fn with_separate(mut self, separate: bool) -> Self {
        self.separate = separate;
        self
    }

    /// Set the position
    #[must_use]
    pub fn with_position(mut self, position: i64) -> Self {
        self.position = position;
        self
    }

    /// Render `value` behind the prefix according to `separate`
    pub(crate) fn apply(&self, value: String) -> Vec<String> {
        match &self.prefix {
            None => vec![value],
            Some(prefix) if self.separate => vec![prefix.clone(), value],
            Some(prefix) => vec![format!("{}={}", prefix, value)],
        }
    }
}

impl Default for CommandLineBinding {
    fn default() -> Self {
        Self::new()
    }
}

/// How an output parameter's value is captured after execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutputBinding {
    /// Pattern matched against the output directory
    #[serde(default, deserialize_with = "text_field")]
    pub glob: Option<String>,
    /// Whether to read the contents of matched files
    #[serde(default = "default_true")]
    pub load_contents: bool,
}

impl CommandOutputBinding {
    /// Create an output binding with defaults
    #[must_use]
    pub fn new() -> Self {
        Self {
            glob: None,
            load_contents: true,
        }
    }

    /// Set the glob pattern
    #[must_use]
    pub fn with_glob(mut self, glob: impl Into<String>) -> Self {
        self.glob = Some(glob.into());
        self
    }
}

impl Default for CommandOutputBinding {
    fn default() -> Self {
        Self::new()
    }
}
