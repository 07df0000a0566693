//! Parsing of `CommandLineTool` documents from text.
//!
//! Parsing is two steps that fail differently: decoding the YAML text into
//! a value tree ([`DocumentParseError`]) and validating that tree against
//! the tool schema ([`SchemaValidationError`]).
//!
//! [`SchemaValidationError`]: cwl_core::SchemaValidationError

use crate::tags::screen_tags;
use cwl_core::{DocumentParseError, ParseResult};
use cwl_schema::CommandLineTool;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// Parser options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject documents larger than this many bytes before decoding
    pub max_document_bytes: Option<usize>,
}

impl ParseOptions {
    /// Create options with defaults (no size limit)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum document size
    #[must_use]
    pub fn with_max_document_bytes(mut self, bytes: usize) -> Self {
        self.max_document_bytes = Some(bytes);
        self
    }
}

/// Parser for tool documents
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParseOptions,
}

impl Parser {
    /// Create a parser with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom options
    #[must_use]
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Options in effect
    #[must_use]
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Decode `text` into a value tree without validating it
    ///
    /// # Errors
    ///
    /// Returns [`DocumentParseError`] if the text is not valid YAML,
    /// exceeds the configured size, or carries a `!!` tag outside the
    /// core schema
    pub fn decode(&self, text: &str) -> Result<Value, DocumentParseError> {
        if let Some(limit) = self.options.max_document_bytes {
            if text.len() > limit {
                return Err(DocumentParseError::new(format!(
                    "document is {} bytes, limit is {}",
                    text.len(),
                    limit
                )));
            }
        }

        let value = serde_yaml_ng::from_str::<Value>(text).map_err(|e| {
            tracing::debug!(error = %e, "failed to decode document");
            DocumentParseError::new(e.to_string())
        })?;
        screen_tags(text)?;
        Ok(value)
    }

    /// Parse a tool document from text
    ///
    /// # Errors
    ///
    /// Returns a decode failure for invalid YAML and a schema failure for
    /// YAML that does not describe a valid tool
    pub fn parse(&self, text: &str) -> ParseResult<CommandLineTool> {
        let value = self.decode(text)?;
        let tool = CommandLineTool::from_value(value).inspect_err(|e| {
            tracing::debug!(violations = e.violations.len(), "document failed schema validation");
        })?;
        tracing::debug!(
            inputs = tool.inputs().len(),
            outputs = tool.outputs().len(),
            "parsed command line tool"
        );
        Ok(tool)
    }

    /// Parse a tool document from an open reader
    ///
    /// # Errors
    ///
    /// Read failures (including non UTF-8 input) are decode failures;
    /// otherwise as [`Parser::parse`]
    pub fn parse_reader<R: Read>(&self, mut reader: R) -> ParseResult<CommandLineTool> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| DocumentParseError::new(format!("failed to read document: {}", e)))?;
        self.parse(&text)
    }

    /// Parse a tool document from a file
    ///
    /// # Errors
    ///
    /// A file that cannot be read is a decode failure; otherwise as
    /// [`Parser::parse`]
    pub fn parse_file(&self, path: impl AsRef<Path>) -> ParseResult<CommandLineTool> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            DocumentParseError::new(format!("failed to read {}: {}", path.display(), e))
        })?;
        self.parse(&text)
    }
}

/// Parse a `CommandLineTool` document from text
///
/// # Errors
///
/// See [`Parser::parse`]
pub fn parse_command_line_tool(text: &str) -> ParseResult<CommandLineTool> {
    Parser::new().parse(text)
}

/// Parse a `CommandLineTool` document from an open reader
///
/// # Errors
///
/// See [`Parser::parse_reader`]
pub fn parse_command_line_tool_reader<R: Read>(reader: R) -> ParseResult<CommandLineTool> {
    Parser::new().parse_reader(reader)
}

/// Parse a `CommandLineTool` document from a file
///
/// # Errors
///
/// See [`Parser::parse_file`]
pub fn parse_command_line_tool_file(path: impl AsRef<Path>) -> ParseResult<CommandLineTool> {
    Parser::new().parse_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cwl_core::ParseError;
    use cwl_schema::{InputVariant, OutputVariant};
    use serde_json::json;
    use std::io::Write;

    const BASE: &str = include_str!("../fixtures/base.cwl");
    const BASE_COMMAND_STRING: &str = include_str!("../fixtures/base_command_string.cwl");
    const BASE_COMMAND_LIST: &str = include_str!("../fixtures/base_command_list.cwl");
    const BASE_COMMAND_ARGUMENTS: &str = include_str!("../fixtures/base_command_arguments.cwl");
    const INPUTS: &str = include_str!("../fixtures/inputs.cwl");
    const OUTPUTS: &str = include_str!("../fixtures/outputs.cwl");

    #[test]
    fn test_parse_base() {
        let tool = parse_command_line_tool(BASE).unwrap();
        assert_eq!(tool.cls(), "CommandLineTool");
        assert_eq!(tool.cwl_version(), Some("v1.0"));
        assert!(tool.inputs().is_empty());
        assert!(tool.outputs().is_empty());
        assert_eq!(tool.command(), None);
    }

    #[test]
    fn test_parse_base_command_variants() {
        let tool = parse_command_line_tool(BASE_COMMAND_STRING).unwrap();
        assert_eq!(tool.command(), Some("echo"));
        assert!(tool.base_arguments().is_empty());

        let tool = parse_command_line_tool(BASE_COMMAND_LIST).unwrap();
        assert_eq!(tool.command(), Some("echo"));
        assert!(tool.base_arguments().is_empty());

        let tool = parse_command_line_tool(BASE_COMMAND_ARGUMENTS).unwrap();
        assert_eq!(tool.command(), Some("tar"));
        assert_eq!(tool.base_arguments(), ["--extract", "--verbose"]);
    }

    #[test]
    fn test_parse_inputs() {
        let tool = parse_command_line_tool(INPUTS).unwrap();
        let ids: Vec<&str> = tool.inputs().iter().filter_map(|p| p.identifier()).collect();
        assert_eq!(
            ids,
            vec![
                "reference",
                "reads",
                "threads",
                "min_score",
                "verbose",
                "sample",
                "seed",
                "placeholder"
            ]
        );

        let variants: Vec<InputVariant> = tool.inputs().iter().map(|p| p.variant()).collect();
        assert_eq!(
            variants,
            vec![
                InputVariant::File,
                InputVariant::File,
                InputVariant::Int,
                InputVariant::Float,
                InputVariant::Boolean,
                InputVariant::String,
                InputVariant::Int,
                InputVariant::Base,
            ]
        );

        let reference = tool.input("reference").unwrap();
        assert_eq!(reference.parameter().label(), Some("Reference genome"));
        assert_eq!(reference.binding().position, 1);

        let threads = tool.input("threads").unwrap();
        assert_eq!(threads.parameter().default_value(), Some(&json!(4)));
        assert_eq!(threads.format_arguments(&json!(8)).unwrap(), vec!["-t=8"]);

        let reads = tool.input("reads").unwrap();
        assert_eq!(
            reads.format_arguments(&json!({"path": "r.fq"})).unwrap(),
            vec!["--reads", "{reads}"]
        );

        let verbose = tool.input("verbose").unwrap();
        assert_eq!(verbose.format_arguments(&json!(true)).unwrap(), vec!["-v"]);

        let sample = tool.input("sample").unwrap();
        let binding = sample.binding();
        assert_eq!(binding.item_separator.as_deref(), Some(","));
        assert!(!binding.shell_quote);
        assert!(binding.value_from.is_some());
        assert_eq!(
            sample.parameter().doc().map(|d| d.to_vec().len()),
            Some(2)
        );

        let seed = tool.input("seed").unwrap();
        assert_eq!(seed.type_tag(), "long");
        assert_eq!(seed.binding(), &cwl_schema::CommandLineBinding::new());
    }

    #[test]
    fn test_parse_outputs() {
        let tool = parse_command_line_tool(OUTPUTS).unwrap();
        assert_eq!(tool.command(), Some("samtools"));
        assert_eq!(tool.base_arguments(), ["sort"]);
        assert_eq!(tool.inputs()[0].identifier(), Some("alignment"));

        let variants: Vec<OutputVariant> = tool.outputs().iter().map(|p| p.variant()).collect();
        assert_eq!(
            variants,
            vec![OutputVariant::File, OutputVariant::Stderr, OutputVariant::Stdout]
        );

        let sorted = tool.output("sorted").unwrap().binding().unwrap();
        assert_eq!(sorted.glob.as_deref(), Some("sorted.bam"));
        assert!(!sorted.load_contents);

        assert!(tool.output("log").unwrap().binding().is_none());
        assert!(tool.output("summary").unwrap().parameter().streamable());
    }

    #[test]
    fn test_parse_reader_matches_text() {
        let from_text = parse_command_line_tool(INPUTS).unwrap();
        let from_reader = parse_command_line_tool_reader(INPUTS.as_bytes()).unwrap();
        assert_eq!(from_text, from_reader);
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(OUTPUTS.as_bytes()).unwrap();
        let tool = parse_command_line_tool_file(file.path()).unwrap();
        assert_eq!(tool.outputs().len(), 3);
    }

    #[test]
    fn test_parse_missing_file_is_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_command_line_tool_file(dir.path().join("absent.cwl")).unwrap_err();
        assert!(err.is_document());
    }

    #[test]
    fn test_parse_non_utf8_reader_is_decode_failure() {
        let bytes: &[u8] = &[0x63, 0x6c, 0xff, 0xfe];
        let err = parse_command_line_tool_reader(bytes).unwrap_err();
        assert!(err.is_document());
    }

    #[test]
    fn test_garbage_is_decode_failure() {
        for text in [
            "class: [CommandLineTool",
            "inputs: {a: 1",
            "key: 'unterminated",
            "!!None",
            "a: !!python/object x",
            "inputs: []\noutputs: !!python/tuple []",
        ] {
            let err = parse_command_line_tool(text).unwrap_err();
            assert!(matches!(err, ParseError::Document(_)), "{text}: {err}");
        }
    }

    #[test]
    fn test_missing_fields_is_schema_failure() {
        let err = parse_command_line_tool("class: CommandLineTool").unwrap_err();
        assert!(err.is_schema());
        let locations: Vec<&str> = err.violations().iter().map(|v| v.location.as_str()).collect();
        assert_eq!(locations, vec!["inputs", "outputs"]);
    }

    #[test]
    fn test_scalar_document_is_schema_failure() {
        let err = parse_command_line_tool("just some text").unwrap_err();
        assert!(err.is_schema());
        assert!(err.violations()[0].location == cwl_core::ROOT_LOCATION);
    }

    #[test]
    fn test_unknown_type_is_schema_failure() {
        let text = "inputs:\n  reads:\n    type: Directory\noutputs: []\n";
        let err = parse_command_line_tool(text).unwrap_err();
        assert!(err.is_schema());
        assert!(err.violations()[0].is_unknown_type());
        assert_eq!(err.violations()[0].location, "inputs.reads.type");
    }

    #[test]
    fn test_unquoted_null_type_is_missing() {
        let text = "inputs:\n  nothing:\n    type: null\noutputs: []\n";
        let err = parse_command_line_tool(text).unwrap_err();
        assert_eq!(err.violations()[0].location, "inputs.nothing.type");
    }

    #[test]
    fn test_numeric_scalars_read_as_text() {
        let text = "cwlVersion: 1.0\nbaseCommand: [head, -n, 5]\ninputs: []\noutputs: []\n";
        let tool = parse_command_line_tool(text).unwrap();
        assert_eq!(tool.cwl_version(), Some("1.0"));
        assert_eq!(tool.command(), Some("head"));
        assert_eq!(tool.base_arguments(), ["-n", "5"]);

        let text = "inputs:\n  lines:\n    type: int\n    label: 10\n    inputBinding: {position: \"1\", prefix: 2}\noutputs: []\n";
        let tool = parse_command_line_tool(text).unwrap();
        let lines = tool.input("lines").unwrap();
        assert_eq!(lines.parameter().label(), Some("10"));
        assert_eq!(lines.binding().position, 1);
        assert_eq!(lines.format_arguments(&json!(3)).unwrap(), vec!["2", "3"]);
    }

    #[test]
    fn test_compound_values_in_text_fields_are_schema_failures() {
        let err = parse_command_line_tool("cwlVersion: [v1.0]\ninputs: []\noutputs: []").unwrap_err();
        assert!(err.is_schema());
        assert_eq!(err.violations()[0].location, "cwlVersion");

        let text = "baseCommand: [head, {n: 5}]\ninputs: []\noutputs: []";
        let err = parse_command_line_tool(text).unwrap_err();
        assert_eq!(err.violations()[0].location, "baseCommand");
    }

    #[test]
    fn test_scalar_mapping_keys_become_identifiers() {
        let text = "inputs: {1: int, true: boolean}\noutputs: {2.5: stdout}\n";
        let tool = parse_command_line_tool(text).unwrap();
        let ids: Vec<&str> = tool.inputs().iter().filter_map(|p| p.identifier()).collect();
        assert_eq!(ids, vec!["1", "true"]);
        assert_eq!(tool.input("true").map(|p| p.variant()), Some(InputVariant::Boolean));
        assert_eq!(tool.outputs()[0].identifier(), Some("2.5"));
    }

    #[test]
    fn test_core_tags_decode() {
        let value = Parser::new().decode("a: !!str 5\nb: !!int '7'").unwrap();
        assert_eq!(value, json!({"a": "5", "b": 7}));
    }

    #[test]
    fn test_size_limit() {
        let parser = Parser::with_options(ParseOptions::new().with_max_document_bytes(16));
        assert_eq!(parser.options().max_document_bytes, Some(16));
        let err = parser.parse(BASE).unwrap_err();
        assert!(err.is_document());

        let parser = Parser::with_options(ParseOptions::new().with_max_document_bytes(4096));
        assert!(parser.parse(BASE).is_ok());
    }

    #[test]
    fn test_decode_only() {
        let value = Parser::new().decode("a: [1, 2]").unwrap();
        assert_eq!(value, json!({"a": [1, 2]}));
    }
}
