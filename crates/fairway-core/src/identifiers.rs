//! Identifier codec
//!
//! Upstream identifiers are integers wider than the 53-bit mantissa of the
//! double-precision floats used by the JSON parser on the agent side. Inside
//! the core they are always held as strings; this module converts them at
//! the wire boundary in both directions.
//!
//! - [`Identifier`] is the canonical string form.
//! - [`to_wire`] places an identifier into an outgoing request.
//! - [`sanitize`] rewrites identifier-like fields of a decoded response.
//! - [`encode_body`] rewrites identifier-like fields of an outgoing body.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};
use crate::request::Verb;

/// Largest number of significant digits a double can carry exactly.
pub const MAX_SAFE_DIGITS: usize = 15;

/// A non-negative integer identifier of arbitrary width, held as ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    /// Create an identifier from its decimal string form.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(Error::InvalidIdentifier {
                value,
                reason: "identifier cannot be empty".to_string(),
            });
        }
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidIdentifier {
                value,
                reason: "identifier must be a non-negative integer".to_string(),
            });
        }
        Ok(Self(value))
    }

    /// Create an identifier from a JSON number, if it is a non-negative integer.
    pub fn from_number(number: &Number) -> Option<Self> {
        Self::new(number.to_string()).ok()
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0.bytes().any(|b| b != b'0')
    }

    /// Number of significant decimal digits.
    pub fn significant_digits(&self) -> usize {
        self.0.trim_start_matches('0').len()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl FromStr for Identifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    /// Accepts a JSON string or a JSON integer. Integers are read through
    /// `serde_json::Value` so that their digits are never routed through `f64`.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let text = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            other => {
                return Err(serde::de::Error::custom(format!(
                    "expected an identifier string or integer, found {}",
                    other
                )))
            }
        };
        Identifier::new(text).map_err(serde::de::Error::custom)
    }
}

/// An identifier prepared for a specific place in an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    /// Verbatim text for a URL path or query segment
    PathSegment(String),
    /// A JSON string for a request body
    Json(Value),
}

impl WireValue {
    /// Text form, usable in a URL whichever variant was produced.
    pub fn into_segment(self) -> String {
        match self {
            WireValue::PathSegment(s) => s,
            WireValue::Json(Value::String(s)) => s,
            WireValue::Json(other) => other.to_string(),
        }
    }

    /// JSON form, always a string value.
    pub fn into_json(self) -> Value {
        match self {
            WireValue::PathSegment(s) => Value::String(s),
            WireValue::Json(v) => v,
        }
    }
}

/// Place an identifier on the wire for the given verb.
///
/// GET requests carry identifiers in the URL, where text never loses precision.
/// Mutating verbs carry them in JSON bodies, where they must be strings.
pub fn to_wire(id: &Identifier, verb: Verb) -> WireValue {
    match verb {
        Verb::Get => WireValue::PathSegment(id.as_str().to_string()),
        Verb::Post | Verb::Put | Verb::Delete => WireValue::Json(Value::String(id.as_str().to_string())),
    }
}

/// Field-name heuristic used to recognize identifiers in untyped JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentifierPatterns {
    /// Field names that are identifiers as a whole (`id`)
    pub exact: Vec<String>,
    /// Field name suffixes that mark identifiers (`_id`, `_ids`)
    pub suffixes: Vec<String>,
    /// Suffix of a string twin carrying the upstream's own text form (`id_str`)
    pub twin_suffix: Option<String>,
    /// Integers with more significant digits than this are always stringified
    pub max_safe_digits: usize,
}

impl Default for IdentifierPatterns {
    fn default() -> Self {
        Self {
            exact: vec!["id".to_string()],
            suffixes: vec!["_id".to_string(), "_ids".to_string()],
            twin_suffix: Some("_str".to_string()),
            max_safe_digits: MAX_SAFE_DIGITS,
        }
    }
}

impl IdentifierPatterns {
    /// Whether a field name denotes an identifier.
    pub fn is_identifier_field(&self, name: &str) -> bool {
        self.exact.iter().any(|exact| exact == name)
            || self
                .suffixes
                .iter()
                .any(|suffix| name.len() > suffix.len() && name.ends_with(suffix.as_str()))
    }

    /// Whether an integer literal is too wide for a double.
    pub fn is_unsafe_integer(&self, number: &Number) -> bool {
        let text = number.to_string();
        let digits = text.strip_prefix('-').unwrap_or(&text);
        digits.bytes().all(|b| b.is_ascii_digit())
            && digits.trim_start_matches('0').len() > self.max_safe_digits
    }

    /// Text of the twin field for `name`, whether it arrived as a string or
    /// as an integer.
    fn twin(&self, object: &Map<String, Value>, name: &str) -> Option<String> {
        let suffix = self.twin_suffix.as_deref()?;
        match object.get(&format!("{}{}", name, suffix))? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => {
                let text = n.to_string();
                text.bytes().all(|b| b.is_ascii_digit()).then_some(text)
            }
            _ => None,
        }
    }
}

/// Rewrite identifier-like values of a decoded response body as strings.
///
/// Non-identifier numbers keep their type unless they are integers too wide
/// for a double. The result is a fixed point: sanitizing it again is a no-op.
pub fn sanitize(value: &Value, patterns: &IdentifierPatterns) -> Value {
    match value {
        Value::Object(object) => Value::Object(sanitize_object(object, patterns)),
        Value::Array(items) => Value::Array(items.iter().map(|item| sanitize(item, patterns)).collect()),
        Value::Number(n) if patterns.is_unsafe_integer(n) => Value::String(n.to_string()),
        other => other.clone(),
    }
}

fn sanitize_object(object: &Map<String, Value>, patterns: &IdentifierPatterns) -> Map<String, Value> {
    let mut shaped = Map::with_capacity(object.len());
    for (name, value) in object {
        let value = if patterns.is_identifier_field(name) {
            match (value, patterns.twin(object, name)) {
                (Value::Number(_) | Value::String(_), Some(twin)) => Value::String(twin),
                _ => stringify_identifiers(value, patterns),
            }
        } else {
            sanitize(value, patterns)
        };
        shaped.insert(name.clone(), value);
    }
    shaped
}

fn stringify_identifiers(value: &Value, patterns: &IdentifierPatterns) -> Value {
    match value {
        Value::Number(n) => Value::String(n.to_string()),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| stringify_identifiers(item, patterns))
                .collect(),
        ),
        other => sanitize(other, patterns),
    }
}

/// Rewrite identifier-like fields of an outgoing body through [`to_wire`].
pub fn encode_body(value: &Value, verb: Verb, patterns: &IdentifierPatterns) -> Value {
    match value {
        Value::Object(object) => Value::Object(
            object
                .iter()
                .map(|(name, value)| {
                    let encoded = if patterns.is_identifier_field(name) {
                        encode_identifier(value, verb, patterns)
                    } else {
                        encode_body(value, verb, patterns)
                    };
                    (name.clone(), encoded)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|item| encode_body(item, verb, patterns)).collect()),
        Value::Number(n) if patterns.is_unsafe_integer(n) => Value::String(n.to_string()),
        other => other.clone(),
    }
}

fn encode_identifier(value: &Value, verb: Verb, patterns: &IdentifierPatterns) -> Value {
    match value {
        Value::Number(n) => match Identifier::from_number(n) {
            Some(id) => to_wire(&id, verb).into_json(),
            None => Value::String(n.to_string()),
        },
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| encode_identifier(item, verb, patterns))
                .collect(),
        ),
        other => encode_body(other, verb, patterns),
    }
}
