//! Wire request construction
//!
//! Renders a [`RequestSpec`] into a [`WireRequest`]: base URL, auth
//! placement, percent-encoded path segments, query string and the
//! identifier-encoded JSON body.

use tracing::debug;
use url::Url;

use crate::auth::{ApiKey, AuthPlacement};
use crate::connection::WireRequest;
use crate::identifiers::{encode_body, IdentifierPatterns};
use crate::request::RequestSpec;
use crate::taxonomy::ErrorDescriptor;

/// Builds wire requests for one upstream account
#[derive(Debug, Clone)]
pub struct WireRequestBuilder {
    base_url: Url,
    api_key: ApiKey,
    patterns: IdentifierPatterns,
}

impl WireRequestBuilder {
    pub fn new(base_url: Url, api_key: ApiKey, patterns: IdentifierPatterns) -> Self {
        Self {
            base_url,
            api_key,
            patterns,
        }
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Build the request for one spec. Fails without touching the network
    /// when the path template cannot be rendered.
    pub fn build(&self, spec: &RequestSpec) -> Result<WireRequest, ErrorDescriptor> {
        let placement = AuthPlacement::for_verb(spec.verb());
        let url = self.build_url(spec, placement)?;

        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if placement == AuthPlacement::BearerHeader {
            headers.push((
                "Authorization".to_string(),
                format!("Bearer {}", self.api_key.expose()),
            ));
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        let body = spec
            .body()
            .map(|body| encode_body(body, spec.verb(), &self.patterns));

        debug!(
            verb = %spec.verb(),
            path = spec.path(),
            placement = ?placement,
            has_body = body.is_some(),
            "Built wire request"
        );

        Ok(WireRequest {
            verb: spec.verb(),
            url,
            headers,
            body,
        })
    }

    fn build_url(&self, spec: &RequestSpec, placement: AuthPlacement) -> Result<Url, ErrorDescriptor> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ErrorDescriptor::generic("Base URL cannot carry a path"))?;
            segments.pop_if_empty();

            if placement == AuthPlacement::PathEmbedded {
                segments.push(self.api_key.expose());
            }

            // Empty pieces come from leading, trailing or repeated slashes
            for template in spec.path().split('/').filter(|s| !s.is_empty()) {
                let rendered = render_segment(template, spec)?;
                segments.push(&rendered);
            }
        }

        let pairs = spec.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(url)
    }
}

/// Substitute every `{name}` placeholder of one path segment.
fn render_segment(template: &str, spec: &RequestSpec) -> Result<String, ErrorDescriptor> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let close = rest[open..].find('}').map(|i| open + i).ok_or_else(|| {
            ErrorDescriptor::generic(format!("Unterminated placeholder in path '{}'", spec.path()))
        })?;
        let name = &rest[open + 1..close];
        let value = spec.path_param(name).ok_or_else(|| {
            ErrorDescriptor::generic(format!(
                "Missing path parameter '{}' for '{}'",
                name,
                spec.path()
            ))
        })?;

        rendered.push_str(&rest[..open]);
        rendered.push_str(&value.render(spec.verb()));
        rest = &rest[close + 1..];
    }
    rendered.push_str(rest);

    if rendered.is_empty() {
        return Err(ErrorDescriptor::generic(format!(
            "Empty path segment rendered for '{}'",
            spec.path()
        )));
    }
    Ok(rendered)
}
