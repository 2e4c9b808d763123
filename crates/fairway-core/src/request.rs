//! Request specifications
//!
//! A [`RequestSpec`] describes one logical API call independently of
//! authentication and transport. Tools build a fresh spec per invocation.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identifiers::{to_wire, Identifier};
use crate::shaper::Pagination;

/// HTTP verbs used by the upstream API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }

    pub fn is_mutating(&self) -> bool {
        !matches!(self, Verb::Get)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Verb> for reqwest::Method {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Get => reqwest::Method::GET,
            Verb::Post => reqwest::Method::POST,
            Verb::Put => reqwest::Method::PUT,
            Verb::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A path or query parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Id(Identifier),
    Text(String),
    Integer(i64),
    Bool(bool),
}

impl ParamValue {
    /// Text form for a URL
    pub fn render(&self, verb: Verb) -> String {
        match self {
            ParamValue::Id(id) => to_wire(id, verb).into_segment(),
            ParamValue::Text(s) => s.clone(),
            ParamValue::Integer(n) => n.to_string(),
            ParamValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<Identifier> for ParamValue {
    fn from(id: Identifier) -> Self {
        ParamValue::Id(id)
    }
}

impl From<&Identifier> for ParamValue {
    fn from(id: &Identifier) -> Self {
        ParamValue::Id(id.clone())
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Integer(n)
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        ParamValue::Integer(i64::from(n))
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

/// Representation requested from an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    /// HTML or XML, returned as opaque text
    Text,
}

/// One logical API call
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    verb: Verb,
    path: String,
    path_params: Vec<(String, ParamValue)>,
    query: Vec<(String, ParamValue)>,
    pagination: Option<Pagination>,
    body: Option<Value>,
}

impl RequestSpec {
    pub fn get(path: impl Into<String>) -> RequestSpecBuilder {
        RequestSpecBuilder::new(Verb::Get, path)
    }

    pub fn post(path: impl Into<String>) -> RequestSpecBuilder {
        RequestSpecBuilder::new(Verb::Post, path)
    }

    pub fn put(path: impl Into<String>) -> RequestSpecBuilder {
        RequestSpecBuilder::new(Verb::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> RequestSpecBuilder {
        RequestSpecBuilder::new(Verb::Delete, path)
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// The path template, e.g. `/events/{event_id}/rounds`
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn path_param(&self, name: &str) -> Option<&ParamValue> {
        self.path_params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.pagination
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Rendered query pairs in insertion order, pagination last
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .query
            .iter()
            .map(|(key, value)| (key.clone(), value.render(self.verb)))
            .collect();
        if let Some(pagination) = self.pagination {
            pairs.extend(pagination.query_pairs());
        }
        pairs
    }

    /// HTML and XML are requested through the `format` query parameter
    pub fn response_format(&self) -> ResponseFormat {
        let requested = self
            .query
            .iter()
            .find(|(key, _)| key == "format")
            .map(|(_, value)| value.render(self.verb).to_ascii_lowercase());
        match requested.as_deref() {
            Some("html") | Some("xml") => ResponseFormat::Text,
            _ => ResponseFormat::Json,
        }
    }
}

/// Builder for [`RequestSpec`]
#[derive(Debug, Clone)]
pub struct RequestSpecBuilder {
    spec: RequestSpec,
}

impl RequestSpecBuilder {
    fn new(verb: Verb, path: impl Into<String>) -> Self {
        Self {
            spec: RequestSpec {
                verb,
                path: path.into(),
                path_params: Vec::new(),
                query: Vec::new(),
                pagination: None,
                body: None,
            },
        }
    }

    /// Bind a `{name}` placeholder of the path template
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.spec.path_params.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.spec.query.push((name.into(), value.into()));
        self
    }

    /// Add a query parameter only when a value is present
    pub fn query_opt<V: Into<ParamValue>>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.spec.pagination = Some(pagination);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.spec.body = Some(body);
        self
    }

    pub fn build(self) -> RequestSpec {
        self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let spec = RequestSpec::get("/events/{event_id}/rounds")
            .path_param("event_id", Identifier::from(42))
            .query("archived", true)
            .query_opt("season_id", None::<Identifier>)
            .build();

        assert_eq!(spec.verb(), Verb::Get);
        assert_eq!(spec.path(), "/events/{event_id}/rounds");
        assert_eq!(spec.path_param("event_id"), Some(&ParamValue::Id(Identifier::from(42))));
        assert_eq!(spec.query_pairs(), vec![("archived".to_string(), "true".to_string())]);
        assert!(spec.body().is_none());
    }

    #[test]
    fn test_pagination_is_appended() {
        let spec = RequestSpec::get("/events")
            .query("season_id", Identifier::from(3))
            .paginate(Pagination::new(50, Some(100)))
            .build();

        assert_eq!(
            spec.query_pairs(),
            vec![
                ("season_id".to_string(), "3".to_string()),
                ("offset".to_string(), "50".to_string()),
                ("limit".to_string(), "100".to_string()),
            ]
        );
    }

    #[test]
    fn test_response_format() {
        let json_spec = RequestSpec::get("/results").query("format", "json").build();
        assert_eq!(json_spec.response_format(), ResponseFormat::Json);

        let html_spec = RequestSpec::get("/results").query("format", "HTML").build();
        assert_eq!(html_spec.response_format(), ResponseFormat::Text);

        let xml_spec = RequestSpec::get("/results").query("format", "xml").build();
        assert_eq!(xml_spec.response_format(), ResponseFormat::Text);

        assert_eq!(RequestSpec::get("/results").build().response_format(), ResponseFormat::Json);
    }

    #[test]
    fn test_verb_helpers() {
        assert!(!Verb::Get.is_mutating());
        assert!(Verb::Post.is_mutating());
        assert_eq!(Verb::Delete.to_string(), "DELETE");
        assert_eq!(reqwest::Method::from(Verb::Put), reqwest::Method::PUT);

        let spec = RequestSpec::post("/events").body(json!({"name": "Open"})).build();
        assert_eq!(spec.body(), Some(&json!({"name": "Open"})));
    }
}
