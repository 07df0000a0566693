//! Helpers over the decoded value tree.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A field that accepts either a single string or a sequence of strings
/// (`doc`, `baseCommand`).
///
/// Numeric and boolean items are taken in their textual form, so
/// `[head, -n, 5]` reads as three strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OneOrMany {
    /// A lone string
    One(String),
    /// An ordered sequence of strings
    Many(Vec<String>),
}

impl OneOrMany {
    /// The first string, if any
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::One(s) => Some(s),
            Self::Many(items) => items.first().map(String::as_str),
        }
    }

    /// All strings in order
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::One(s) => vec![s.clone()],
            Self::Many(items) => items.clone(),
        }
    }

    /// Read a scalar or a sequence of scalars
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(scalar_text)
                .collect::<Option<Vec<_>>>()
                .map(Self::Many),
            other => scalar_text(other).map(Self::One),
        }
    }
}

impl<'de> Deserialize<'de> for OneOrMany {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).ok_or_else(|| {
            de::Error::custom(format!(
                "invalid type: {}, expected a string or a sequence of strings",
                shape_name(&value)
            ))
        })
    }
}

impl From<&str> for OneOrMany {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<Vec<String>> for OneOrMany {
    fn from(value: Vec<String>) -> Self {
        Self::Many(value)
    }
}

/// Textual form of a value as it appears on a command line.
///
/// Strings are emitted verbatim and numbers in their canonical decimal
/// form. Booleans render as lowercase `true` / `false` and null as `null`
/// (not `True` / `False` / `None`). Sequences and mappings render as
/// compact JSON.
#[must_use]
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Text of a scalar written where a string is expected.
///
/// Numbers and booleans yield the text they were written as (`1.0` stays
/// `"1.0"`). Null, sequences and mappings have no text.
#[must_use]
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Deserialize an optional string field, accepting numeric and boolean
/// scalars in their textual form. Null reads as absent.
///
/// # Errors
///
/// Fails on sequences and mappings
pub fn text_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => scalar_text(&value).map(Some).ok_or_else(|| {
            de::Error::custom(format!(
                "invalid type: {}, expected a string",
                shape_name(&value)
            ))
        }),
    }
}

/// Deserialize an integer field that may also be written as a numeric
/// string (`"1"`) or an integral float (`1.0`).
///
/// # Errors
///
/// Fails on anything that does not denote an integer
pub fn integer_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let integer = match &value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    integer.ok_or_else(|| {
        de::Error::custom(format!(
            "invalid value: {}, expected an integer",
            render_value(&value)
        ))
    })
}

/// Truthiness of a value: `false`, `null`, zero, and empty strings,
/// sequences and mappings are falsy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Short name of a value's shape, used in violation messages
#[must_use]
pub fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&json!("shark")), "shark");
        assert_eq!(render_value(&json!(42)), "42");
        assert_eq!(render_value(&json!(12.3)), "12.3");
        assert_eq!(render_value(&json!(true)), "true");
        assert_eq!(render_value(&Value::Null), "null");
        assert_eq!(render_value(&json!([1, "a"])), r#"[1,"a"]"#);
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!([0])));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
        assert!(!is_truthy(&Value::Null));
    }

    #[test]
    fn test_one_or_many_deserialize() {
        let one: OneOrMany = serde_json::from_value(json!("cmd")).unwrap();
        assert_eq!(one, OneOrMany::One("cmd".to_string()));
        assert_eq!(one.first(), Some("cmd"));

        let many: OneOrMany = serde_json::from_value(json!(["cmd", "-a"])).unwrap();
        assert_eq!(many.first(), Some("cmd"));
        assert_eq!(many.to_vec(), vec!["cmd".to_string(), "-a".to_string()]);

        let empty: OneOrMany = serde_json::from_value(json!([])).unwrap();
        assert_eq!(empty.first(), None);

        assert!(serde_json::from_value::<OneOrMany>(json!({"cmd": 1})).is_err());
        assert!(serde_json::from_value::<OneOrMany>(json!(["cmd", ["-a"]])).is_err());
        assert!(serde_json::from_value::<OneOrMany>(json!(null)).is_err());
    }

    #[test]
    fn test_one_or_many_takes_scalar_text() {
        let many: OneOrMany = serde_json::from_value(json!(["head", "-n", 5])).unwrap();
        assert_eq!(many.to_vec(), vec!["head", "-n", "5"]);

        let one: OneOrMany = serde_json::from_value(json!(1.5)).unwrap();
        assert_eq!(one, OneOrMany::One("1.5".to_string()));

        let flags: OneOrMany = serde_json::from_value(json!([true, false])).unwrap();
        assert_eq!(flags.to_vec(), vec!["true", "false"]);
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&json!("v1.0")).as_deref(), Some("v1.0"));
        assert_eq!(scalar_text(&json!(1.0)).as_deref(), Some("1.0"));
        assert_eq!(scalar_text(&json!(5)).as_deref(), Some("5"));
        assert_eq!(scalar_text(&json!(false)).as_deref(), Some("false"));
        assert_eq!(scalar_text(&Value::Null), None);
        assert_eq!(scalar_text(&json!(["a"])), None);
        assert_eq!(scalar_text(&json!({"a": 1})), None);
    }

    #[derive(Debug, Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "text_field")]
        label: Option<String>,
        #[serde(default, deserialize_with = "integer_field")]
        position: i64,
    }

    #[test]
    fn test_text_field() {
        let fields: Fields = serde_json::from_value(json!({"label": 7})).unwrap();
        assert_eq!(fields.label.as_deref(), Some("7"));

        let fields: Fields = serde_json::from_value(json!({"label": null})).unwrap();
        assert_eq!(fields.label, None);

        let fields: Fields = serde_json::from_value(json!({})).unwrap();
        assert_eq!(fields.label, None);

        let err = serde_json::from_value::<Fields>(json!({"label": ["a"]})).unwrap_err();
        assert!(err.to_string().contains("expected a string"));
    }

    #[test]
    fn test_integer_field() {
        for (raw, expected) in [(json!(3), 3), (json!("1"), 1), (json!(" -2 "), -2), (json!(4.0), 4)] {
            let fields: Fields = serde_json::from_value(json!({ "position": raw })).unwrap();
            assert_eq!(fields.position, expected);
        }

        for raw in [json!("first"), json!(1.5), json!(true), json!([1])] {
            assert!(serde_json::from_value::<Fields>(json!({ "position": raw })).is_err());
        }
    }

    #[test]
    fn test_one_or_many_serialize() {
        assert_eq!(
            serde_json::to_value(OneOrMany::from("cmd")).unwrap(),
            json!("cmd")
        );
        assert_eq!(
            serde_json::to_value(OneOrMany::from(vec!["a".to_string()])).unwrap(),
            json!(["a"])
        );
    }

    proptest::proptest! {
        #[test]
        fn prop_render_string_is_verbatim(s: String) {
            proptest::prop_assert_eq!(render_value(&Value::String(s.clone())), s);
        }

        #[test]
        fn prop_render_integer_is_decimal(n: i64) {
            proptest::prop_assert_eq!(render_value(&json!(n)), n.to_string());
        }
    }
}
