//! Normalization of parameter collections into their canonical sequence form.
//!
//! `inputs` and `outputs` may be written as a sequence of records or as a
//! mapping from identifier to record. Both become an ordered `Vec` of
//! typed parameters. In the mapping form the key always wins over any `id`
//! inside the record; mapping order is kept.

use crate::input::{CommandInputParameter, InputParameter, InputRecord};
use crate::output::{CommandOutputParameter, OutputParameter, OutputRecord};
use crate::registry::{lookup_input, lookup_output};
use cwl_core::{shape_name, Violation};
use serde_json::{Map, Value};

/// A family of parameters sharing one registry.
pub trait ParameterFamily {
    /// Typed parameter produced for each record
    type Parameter;

    /// Document field holding the collection
    const FIELD: &'static str;

    /// Build one parameter from its record.
    ///
    /// `identifier` is set only for the mapping form and overrides the
    /// record's own `id`.
    ///
    /// # Errors
    ///
    /// Returns the violation that prevented construction
    fn construct(
        record: Value,
        identifier: Option<String>,
        location: &str,
    ) -> Result<Self::Parameter, Violation>;
}

/// Input parameter family (`inputs`)
pub struct InputFamily;

/// Output parameter family (`outputs`)
pub struct OutputFamily;

fn declared_tag<'a>(record: &'a Value, location: &str) -> Result<&'a str, Violation> {
    let map = record.as_object().ok_or_else(|| {
        Violation::invalid_shape(
            location,
            format!("a parameter mapping, found {}", shape_name(record)),
        )
    })?;
    match map.get("type") {
        None | Some(Value::Null) => Err(Violation::missing(format!("{}.type", location))),
        Some(Value::String(tag)) => Ok(tag),
        Some(other) => Err(Violation::invalid_shape(
            format!("{}.type", location),
            format!("a type tag string, found {}", shape_name(other)),
        )),
    }
}

impl ParameterFamily for InputFamily {
    type Parameter = CommandInputParameter;

    const FIELD: &'static str = "inputs";

    fn construct(
        record: Value,
        identifier: Option<String>,
        location: &str,
    ) -> Result<CommandInputParameter, Violation> {
        let variant = lookup_input(declared_tag(&record, location)?)
            .map_err(|kind| Violation::new(format!("{}.type", location), kind))?;
        let record: InputRecord = serde_json::from_value(record)
            .map_err(|e| Violation::invalid(location, e.to_string()))?;
        Ok(variant.build(InputParameter::from_record(record, identifier)))
    }
}

impl ParameterFamily for OutputFamily {
    type Parameter = CommandOutputParameter;

    const FIELD: &'static str = "outputs";

    fn construct(
        record: Value,
        identifier: Option<String>,
        location: &str,
    ) -> Result<CommandOutputParameter, Violation> {
        let variant = lookup_output(declared_tag(&record, location)?)
            .map_err(|kind| Violation::new(format!("{}.type", location), kind))?;
        let record: OutputRecord = serde_json::from_value(record)
            .map_err(|e| Violation::invalid(location, e.to_string()))?;
        Ok(variant.build(OutputParameter::from_record(record, identifier)))
    }
}

/// Normalize a collection of parameter records.
///
/// Every record is attempted; all violations are returned together.
///
/// # Errors
///
/// Returns every violation found in the collection
pub fn normalize<F: ParameterFamily>(value: Value) -> Result<Vec<F::Parameter>, Vec<Violation>> {
    match value {
        Value::Object(map) => normalize_mapping::<F>(map),
        Value::Array(items) => normalize_sequence::<F>(items),
        other => Err(vec![Violation::invalid_shape(
            F::FIELD,
            format!(
                "a sequence or a mapping of parameters, found {}",
                shape_name(&other)
            ),
        )]),
    }
}

fn normalize_mapping<F: ParameterFamily>(
    map: Map<String, Value>,
) -> Result<Vec<F::Parameter>, Vec<Violation>> {
    tracing::debug!(field = F::FIELD, shape = "mapping", count = map.len(), "normalizing parameters");

    let mut parameters = Vec::with_capacity(map.len());
    let mut violations = Vec::new();

    for (identifier, record) in map {
        // `name: int` is shorthand for `name: {type: int}`
        let record = match record {
            Value::String(tag) => {
                let mut expanded = Map::new();
                expanded.insert("type".to_string(), Value::String(tag));
                Value::Object(expanded)
            }
            other => other,
        };
        let location = format!("{}.{}", F::FIELD, identifier);
        match F::construct(record, Some(identifier), &location) {
            Ok(parameter) => {
                tracing::trace!(%location, "constructed parameter");
                parameters.push(parameter);
            }
            Err(violation) => violations.push(violation),
        }
    }

    if violations.is_empty() {
        Ok(parameters)
    } else {
        Err(violations)
    }
}

fn normalize_sequence<F: ParameterFamily>(
    items: Vec<Value>,
) -> Result<Vec<F::Parameter>, Vec<Violation>> {
    tracing::debug!(field = F::FIELD, shape = "sequence", count = items.len(), "normalizing parameters");

    let mut parameters = Vec::with_capacity(items.len());
    let mut violations = Vec::new();

    for (index, record) in items.into_iter().enumerate() {
        let location = format!("{}[{}]", F::FIELD, index);
        match F::construct(record, None, &location) {
            Ok(parameter) => {
                tracing::trace!(%location, "constructed parameter");
                parameters.push(parameter);
            }
            Err(violation) => violations.push(violation),
        }
    }

    if violations.is_empty() {
        Ok(parameters)
    } else {
        Err(violations)
    }
}
