//! Response shaping
//!
//! Turns the raw body of a successful response into a [`ResponseBody`]:
//! JSON is decoded precision-preserving and sanitized, HTML/XML renderings
//! are passed through. Also owns the pagination parameters forwarded to
//! list endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identifiers::{sanitize, IdentifierPatterns};
use crate::request::ResponseFormat;
use crate::result::ResponseBody;
use crate::taxonomy::ErrorDescriptor;

/// Offset/limit paging, forwarded verbatim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub offset: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Pagination {
    pub fn new(offset: u64, limit: Option<u32>) -> Self {
        Self { offset, limit }
    }

    /// Query pairs in `offset`, `limit` order
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("offset".to_string(), self.offset.to_string())];
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

/// Decodes and sanitizes successful response bodies
#[derive(Debug, Clone, Default)]
pub struct ResponseShaper {
    patterns: IdentifierPatterns,
}

impl ResponseShaper {
    pub fn new(patterns: IdentifierPatterns) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &IdentifierPatterns {
        &self.patterns
    }

    /// Shape a 2xx body. Malformed JSON is reported as a generic failure.
    pub fn shape(&self, body: &str, format: ResponseFormat) -> Result<ResponseBody, ErrorDescriptor> {
        if format == ResponseFormat::Text {
            return Ok(ResponseBody::Text(body.to_string()));
        }

        if body.trim().is_empty() {
            return Ok(ResponseBody::Json(Value::Null));
        }

        let decoded: Value = serde_json::from_str(body)
            .map_err(|e| ErrorDescriptor::generic(format!("Failed to decode response body: {}", e)))?;

        Ok(ResponseBody::Json(sanitize(&decoded, &self.patterns)))
    }
}

/// Unwrap a list endpoint's collection.
///
/// Returns `body[key]` when the body is an object holding `key`, otherwise
/// the body unchanged.
pub fn extract_collection(body: ResponseBody, key: &str) -> ResponseBody {
    match body {
        ResponseBody::Json(Value::Object(mut object)) => match object.remove(key) {
            Some(inner) => ResponseBody::Json(inner),
            None => ResponseBody::Json(Value::Object(object)),
        },
        other => other,
    }
}
