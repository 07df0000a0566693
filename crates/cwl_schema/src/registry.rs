//! Fixed registries from declared type tags to parameter variants.
//!
//! Both registries are closed: a tag either maps to exactly one variant or
//! is rejected. `long` and `double` share the `int` and `float` variants.

use cwl_core::ViolationKind;
use std::fmt;

/// Legal type tags of an input parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputParameterType {
    /// `null`
    Null,
    /// `boolean`
    Boolean,
    /// `int`
    Int,
    /// `long`
    Long,
    /// `float`
    Float,
    /// `double`
    Double,
    /// `string`
    String,
    /// `File`
    File,
}

impl InputParameterType {
    /// Every legal input tag, in registry order
    pub const ALL: [Self; 8] = [
        Self::Null,
        Self::Boolean,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::String,
        Self::File,
    ];

    /// The tag as written in documents
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::File => "File",
        }
    }

    /// Parse a tag; tags are case sensitive
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }

    /// Variant instantiated for this tag
    #[must_use]
    pub fn variant(self) -> InputVariant {
        match self {
            Self::Null => InputVariant::Base,
            Self::Boolean => InputVariant::Boolean,
            Self::Int | Self::Long => InputVariant::Int,
            Self::Float | Self::Double => InputVariant::Float,
            Self::String => InputVariant::String,
            Self::File => InputVariant::File,
        }
    }
}

impl fmt::Display for InputParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete input parameter variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputVariant {
    /// Untyped base parameter
    Base,
    /// Flag parameter
    Boolean,
    /// Integer parameter
    Int,
    /// Floating point parameter
    Float,
    /// String parameter
    String,
    /// File parameter
    File,
}

/// Legal type tags of an output parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputParameterType {
    /// `File`
    File,
    /// `stderr`
    Stderr,
    /// `stdout`
    Stdout,
}

impl OutputParameterType {
    /// Every legal output tag, in registry order
    pub const ALL: [Self; 3] = [Self::File, Self::Stderr, Self::Stdout];

    /// The tag as written in documents
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Stderr => "stderr",
            Self::Stdout => "stdout",
        }
    }

    /// Parse a tag; tags are case sensitive
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }

    /// Variant instantiated for this tag
    #[must_use]
    pub fn variant(self) -> OutputVariant {
        match self {
            Self::File => OutputVariant::File,
            Self::Stderr => OutputVariant::Stderr,
            Self::Stdout => OutputVariant::Stdout,
        }
    }
}

impl fmt::Display for OutputParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete output parameter variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputVariant {
    /// Generic output, not selected by any registered tag
    Generic,
    /// File output
    File,
    /// Captured standard output
    Stdout,
    /// Captured standard error
    Stderr,
}

/// Resolve an input tag to its variant
///
/// # Errors
///
/// Returns [`ViolationKind::UnknownType`] if the tag is not registered
pub fn lookup_input(tag: &str) -> Result<InputVariant, ViolationKind> {
    InputParameterType::from_tag(tag)
        .map(InputParameterType::variant)
        .ok_or_else(|| ViolationKind::UnknownType {
            tag: tag.to_string(),
            allowed: InputParameterType::ALL.iter().map(|t| t.as_str()).collect(),
        })
}

/// Resolve an output tag to its variant
///
/// # Errors
///
/// Returns [`ViolationKind::UnknownType`] if the tag is not registered
pub fn lookup_output(tag: &str) -> Result<OutputVariant, ViolationKind> {
    OutputParameterType::from_tag(tag)
        .map(OutputParameterType::variant)
        .ok_or_else(|| ViolationKind::UnknownType {
            tag: tag.to_string(),
            allowed: OutputParameterType::ALL.iter().map(|t| t.as_str()).collect(),
        })
}
