//! Tag screening for decoded documents.
//!
//! The value-tree decoder resolves core-schema tags and silently drops any
//! other `!!` tag, so `!!python/object x` would read as the string `x`.
//! Documents are screened at the event level first and any such tag makes
//! the document undecodable.

use cwl_core::DocumentParseError;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::Marker;

/// Expanded form of the `!!` handle
const CORE_PREFIX: &str = "tag:yaml.org,2002:";

/// Tags of the YAML core and type schemas that decode into a value tree
pub const CORE_TAGS: &[&str] = &[
    "str",
    "int",
    "float",
    "bool",
    "null",
    "map",
    "seq",
    "binary",
    "timestamp",
    "set",
    "omap",
];

/// First unsupported tag seen, with its line
#[derive(Debug, Default)]
struct TagScreen {
    rejected: Option<(String, usize)>,
}

impl MarkedEventReceiver for TagScreen {
    fn on_event(&mut self, event: Event, mark: Marker) {
        if self.rejected.is_some() {
            return;
        }
        let tag = match event {
            Event::Scalar(.., Some(tag))
            | Event::SequenceStart(_, Some(tag))
            | Event::MappingStart(_, Some(tag)) => tag,
            _ => return,
        };
        if let Some(name) = unsupported(&tag) {
            self.rejected = Some((name, mark.line()));
        }
    }
}

/// Shorthand form of a yaml.org tag outside [`CORE_TAGS`]
fn unsupported(tag: &Tag) -> Option<String> {
    let full = format!("{}{}", tag.handle, tag.suffix);
    let name = full
        .strip_prefix(CORE_PREFIX)
        .or_else(|| full.strip_prefix("!!"))?;
    (!CORE_TAGS.contains(&name)).then(|| format!("!!{}", name))
}

/// Reject `text` if any node carries an unsupported `!!` tag
///
/// # Errors
///
/// Returns [`DocumentParseError`] naming the first such tag, or the
/// scanner error if the text is not YAML
pub fn screen_tags(text: &str) -> Result<(), DocumentParseError> {
    let mut screen = TagScreen::default();
    Parser::new_from_str(text)
        .load(&mut screen, true)
        .map_err(|e| DocumentParseError::new(e.to_string()))?;
    match screen.rejected {
        Some((tag, line)) => {
            tracing::debug!(%tag, line, "document uses an unsupported tag");
            Err(DocumentParseError::new(format!(
                "unsupported tag {} at line {}",
                tag, line
            )))
        }
        None => Ok(()),
    }
}
