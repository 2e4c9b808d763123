//! Authentication placement
//!
//! The upstream authenticates reads and writes differently:
//! - GET requests carry the API key as the first path segment after the base URL
//! - POST/PUT/DELETE requests carry it as a bearer token

use std::fmt;

use crate::error::{Error, Result};
use crate::request::Verb;

/// The upstream API key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create from a raw key, rejecting blank values and values that would
    /// not survive as a single path segment.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(Error::configuration("API key cannot be empty"));
        }
        if key.contains('/') || key.chars().any(char::is_whitespace) {
            return Err(Error::configuration(
                "API key must not contain slashes or whitespace",
            ));
        }
        Ok(Self(key))
    }

    /// The raw key, for placing on the wire
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Where the API key goes for a given request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPlacement {
    /// `{base}/{key}/{path}`
    PathEmbedded,
    /// `Authorization: Bearer {key}`
    BearerHeader,
}

impl AuthPlacement {
    pub fn for_verb(verb: Verb) -> Self {
        match verb {
            Verb::Get => AuthPlacement::PathEmbedded,
            Verb::Post | Verb::Put | Verb::Delete => AuthPlacement::BearerHeader,
        }
    }
}
