use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    OpenRouter,
    Tmdb,
}

/// Non-success response from an outbound dependency, with the raw body kept
/// for server-side diagnostics.
#[derive(Debug, Clone)]
pub struct UpstreamError {
    pub upstream: Upstream,
    pub stage: &'static str,
    pub detail: String,
    pub raw_body: Option<String>,
    pub raw_body_json: Option<Value>,
}

impl UpstreamError {
    pub fn from_status(
        upstream: Upstream,
        stage: &'static str,
        status: reqwest::StatusCode,
        body: String,
    ) -> Self {
        let raw_body_json = serde_json::from_str::<Value>(&body).ok();
        Self {
            upstream,
            stage,
            detail: format!("status={status}"),
            raw_body: (!body.is_empty()).then_some(body),
            raw_body_json,
        }
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "upstream error (upstream={:?}, stage={}): {}",
            self.upstream, self.stage, self.detail
        )
    }
}

impl std::error::Error for UpstreamError {}

/// Diagnostic text for a failed outbound call: the upstream response body when
/// one was received, otherwise the error chain.
pub fn diagnostic(err: &anyhow::Error) -> String {
    if let Some(upstream) = err.downcast_ref::<UpstreamError>() {
        if let Some(json) = &upstream.raw_body_json {
            return json.to_string();
        }
        if let Some(body) = &upstream.raw_body {
            return body.clone();
        }
    }
    format!("{err:#}")
}
