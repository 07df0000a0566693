//! Error types for document parsing, schema validation and argument formatting.

use std::fmt;

/// Result of parsing a tool document
pub type ParseResult<T> = Result<T, ParseError>;

/// Location used for violations that concern the whole document
pub const ROOT_LOCATION: &str = "<root>";

/// The kind of a single field-level schema violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// A required field is absent
    Missing,
    /// A type tag is not one of the registered tags
    UnknownType {
        /// The offending tag
        tag: String,
        /// Tags accepted at this location
        allowed: Vec<&'static str>,
    },
    /// A field has the wrong shape (e.g. a scalar where a sequence is expected)
    InvalidShape {
        /// Description of the accepted shapes
        expected: String,
    },
    /// Any other field-level failure reported by the deserializer
    Invalid {
        /// Deserializer message
        message: String,
    },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "field required"),
            Self::UnknownType { tag, allowed } => write!(
                f,
                "type tag `{}` is not recognized (expected one of: {})",
                tag,
                allowed.join(", ")
            ),
            Self::InvalidShape { expected } => write!(f, "expected {}", expected),
            Self::Invalid { message } => write!(f, "{}", message),
        }
    }
}

/// A single field-level schema violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path of the offending field, e.g. `inputs.reads.inputBinding`
    pub location: String,
    /// What went wrong
    pub kind: ViolationKind,
}

impl Violation {
    /// Create a new violation
    #[must_use]
    pub fn new(location: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            location: location.into(),
            kind,
        }
    }

    /// A required field is absent
    #[must_use]
    pub fn missing(location: impl Into<String>) -> Self {
        Self::new(location, ViolationKind::Missing)
    }

    /// A field has the wrong shape
    #[must_use]
    pub fn invalid_shape(location: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::new(
            location,
            ViolationKind::InvalidShape {
                expected: expected.into(),
            },
        )
    }

    /// A free-form field failure
    #[must_use]
    pub fn invalid(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            location,
            ViolationKind::Invalid {
                message: message.into(),
            },
        )
    }

    /// Whether this violation reports an unregistered type tag
    #[must_use]
    pub fn is_unknown_type(&self) -> bool {
        matches!(self.kind, ViolationKind::UnknownType { .. })
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.kind)
    }
}

/// The text could not be decoded into a structured value tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to parse the YAML document: {message}")]
pub struct DocumentParseError {
    /// Message of the underlying decoder
    pub message: String,
}

impl DocumentParseError {
    /// Wrap a decoder message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The decoded tree does not satisfy the `CommandLineTool` data model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "The document does not respect the `CommandLineTool` schema: {}",
    render_violations(.violations)
)]
pub struct SchemaValidationError {
    /// Every violation collected during construction, in document order
    pub violations: Vec<Violation>,
}

impl SchemaValidationError {
    /// Create an error from collected violations
    #[must_use]
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Create an error from a single violation
    #[must_use]
    pub fn single(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    /// Whether any violation was reported at `location`
    #[must_use]
    pub fn has_violation_at(&self, location: &str) -> bool {
        self.violations.iter().any(|v| v.location == location)
    }
}

fn render_violations(violations: &[Violation]) -> String {
    let rendered: Vec<String> = violations.iter().map(ToString::to_string).collect();
    rendered.join("; ")
}

/// Failure of the document parsing entry points.
///
/// Invalid markup is always [`ParseError::Document`]; well-formed markup
/// with the wrong shape is always [`ParseError::Schema`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Not valid markup
    #[error(transparent)]
    Document(#[from] DocumentParseError),
    /// Valid markup, wrong shape
    #[error(transparent)]
    Schema(#[from] SchemaValidationError),
}

impl ParseError {
    /// Whether this is a decode failure
    #[must_use]
    pub fn is_document(&self) -> bool {
        matches!(self, Self::Document(_))
    }

    /// Whether this is a schema-validation failure
    #[must_use]
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }

    /// Violations carried by a schema-validation failure
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Document(_) => &[],
            Self::Schema(err) => &err.violations,
        }
    }
}

/// Failure while rendering an input parameter into command-line tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    /// A boolean flag was switched on but its binding declares no prefix
    #[error("Boolean input `{identifier}` is set but its binding has no prefix")]
    MissingPrefix {
        /// Identifier of the parameter, or `<anonymous>`
        identifier: String,
    },
    /// A `File` input has no identifier to build its placeholder from
    #[error("File input has no identifier")]
    MissingIdentifier,
    /// A file value is not a mapping with a string `path`
    #[error("File value for `{identifier}` has no string `path` field")]
    MissingPath {
        /// Identifier of the parameter
        identifier: String,
    },
    /// The process working directory could not be determined
    #[error("Cannot determine the working directory: {message}")]
    WorkingDirectory {
        /// Underlying I/O message
        message: String,
    },
}
