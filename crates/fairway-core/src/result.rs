//! Call results as surfaced to tools

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::taxonomy::{ErrorDescriptor, ErrorKind};

/// Decoded body of a successful call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    /// HTML or XML rendering, passed through untouched
    Text(String),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            ResponseBody::Json(_) => None,
        }
    }
}

/// Outcome of one logical API call. Exactly one of success or failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "body", rename_all = "lowercase")]
pub enum ApiResult {
    Success(ResponseBody),
    Failure(ErrorDescriptor),
}

impl ApiResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResult::Success(_))
    }

    pub fn body(&self) -> Option<&ResponseBody> {
        match self {
            ApiResult::Success(body) => Some(body),
            ApiResult::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorDescriptor> {
        match self {
            ApiResult::Failure(descriptor) => Some(descriptor),
            ApiResult::Success(_) => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error().map(|descriptor| descriptor.kind)
    }

    /// Transform a successful body, leaving failures untouched
    pub fn map_body<F>(self, f: F) -> Self
    where
        F: FnOnce(ResponseBody) -> ResponseBody,
    {
        match self {
            ApiResult::Success(body) => ApiResult::Success(f(body)),
            failure => failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_serialization() {
        let result = ApiResult::Success(ResponseBody::Json(json!([{"id": "1"}])));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"status": "success", "body": [{"id": "1"}]})
        );

        let text = ApiResult::Success(ResponseBody::Text("<table/>".to_string()));
        assert_eq!(
            serde_json::to_value(&text).unwrap(),
            json!({"status": "success", "body": "<table/>"})
        );
    }

    #[test]
    fn test_failure_serialization() {
        let result = ApiResult::Failure(ErrorDescriptor::new(
            ErrorKind::AuthenticationError,
            Some(401),
            "Invalid or expired API key.",
        ));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["body"]["kind"], "AuthenticationError");
        assert_eq!(json["body"]["http_status"], 401);
        assert!(!result.is_success());
        assert_eq!(result.error_kind(), Some(ErrorKind::AuthenticationError));
    }

    #[test]
    fn test_map_body_skips_failures() {
        let failure = ApiResult::Failure(ErrorDescriptor::generic("boom"));
        let mapped = failure.clone().map_body(|_| ResponseBody::Json(Value::Null));
        assert_eq!(mapped, failure);

        let success = ApiResult::Success(ResponseBody::Json(json!(1)));
        let mapped = success.map_body(|_| ResponseBody::Json(json!(2)));
        assert_eq!(mapped.body().and_then(|b| b.as_json()), Some(&json!(2)));
    }
}
