//! Request execution descriptor and outcome model.
//!
//! A [`RequestDescriptor`] is the user-supplied shape of an outbound HTTP
//! call; an [`ExecutionOutcome`] is its classified result. Any response
//! received from the remote server -- including 4xx/5xx -- is a
//! `Completed` outcome; only transport-level failures (DNS, connect, TLS,
//! timeout) become `Failed`. Downstream code branches on the variant tag,
//! never on exception-vs-return.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::CoreError;

/// HTTP methods the execution proxy will forward.
pub const ALLOWED_METHODS: &[&str] = &[
    "GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS",
];

/// Methods that conventionally carry a request body.
pub const METHODS_WITH_BODY: &[&str] = &["POST", "PUT", "PATCH"];

/// Lower clamp for the per-execution timeout.
pub const MIN_TIMEOUT_MS: u64 = 1_000;

/// Upper clamp for the per-execution timeout.
pub const MAX_TIMEOUT_MS: u64 = 60_000;

/// Timeout applied when the descriptor does not specify one.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// User-specified description of an outbound HTTP call.
///
/// Ephemeral -- never persisted as such, but it shapes the history row
/// written for the execution attempt.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestDescriptor {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<serde_json::Value>,
    /// Requested timeout in milliseconds; clamped via [`clamp_timeout_ms`].
    #[serde(rename = "timeout")]
    pub timeout_ms: Option<u64>,
    /// Saved request this execution originated from, if any.
    #[serde(rename = "requestId")]
    pub request_id: Option<crate::types::DbId>,
}

impl RequestDescriptor {
    /// The HTTP method in canonical uppercase form.
    pub fn normalized_method(&self) -> String {
        self.method.to_ascii_uppercase()
    }

    /// Whether the normalized method conventionally carries a body.
    pub fn allows_body(&self) -> bool {
        METHODS_WITH_BODY.contains(&self.normalized_method().as_str())
    }

    /// The effective timeout after clamping to the configured range.
    pub fn effective_timeout_ms(&self) -> u64 {
        clamp_timeout_ms(self.timeout_ms)
    }

    /// Validate the descriptor schema: known method, absolute http(s) URL.
    ///
    /// This is deliberately the only destination check the proxy performs --
    /// it forwards to arbitrary user-chosen endpoints, so egress control is
    /// a deployment concern, not a descriptor concern.
    pub fn validate(&self) -> Result<(), CoreError> {
        let method = self.normalized_method();
        if !ALLOWED_METHODS.contains(&method.as_str()) {
            return Err(CoreError::Validation(format!(
                "Method must be one of: {}",
                ALLOWED_METHODS.join(", ")
            )));
        }
        validate_absolute_http_url(&self.url)?;
        Ok(())
    }
}

/// Clamp a requested timeout into `[MIN_TIMEOUT_MS, MAX_TIMEOUT_MS]`.
pub fn clamp_timeout_ms(requested: Option<u64>) -> u64 {
    requested
        .unwrap_or(DEFAULT_TIMEOUT_MS)
        .clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS)
}

/// Validate that a URL is absolute with an http or https scheme and a
/// non-empty authority.
pub fn validate_absolute_http_url(url: &str) -> Result<(), CoreError> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or_else(|| {
            CoreError::Validation("URL must be an absolute http:// or https:// URI".to_string())
        })?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    if host.is_empty() {
        return Err(CoreError::Validation(
            "URL must include a host".to_string(),
        ));
    }
    Ok(())
}

/// The classified result of one execution attempt. Produced exactly once
/// per attempt.
#[derive(Debug, Clone)]
pub enum ExecutionOutcome {
    /// The remote server answered with an HTTP response (any status).
    Completed {
        status: u16,
        status_text: String,
        headers: HashMap<String, String>,
        body: serde_json::Value,
        /// Wall-clock time from dispatch to full body receipt.
        elapsed_ms: i64,
        /// Serialized size of the received body in bytes.
        size_bytes: i64,
    },
    /// The call could not complete at the transport level.
    Failed {
        message: String,
        code: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(method: &str, url: &str) -> RequestDescriptor {
        RequestDescriptor {
            method: method.to_string(),
            url: url.to_string(),
            headers: HashMap::new(),
            body: None,
            timeout_ms: None,
            request_id: None,
        }
    }

    #[test]
    fn test_method_is_case_normalized() {
        let desc = descriptor("get", "http://example.com");
        assert_eq!(desc.normalized_method(), "GET");
        assert!(desc.validate().is_ok());
    }

    #[test]
    fn test_unknown_method_rejected() {
        let desc = descriptor("BREW", "http://example.com");
        let err = desc.validate().unwrap_err();
        assert!(err.to_string().contains("Method must be one of"));
    }

    #[test]
    fn test_body_only_for_mutating_methods() {
        assert!(descriptor("post", "http://x.test").allows_body());
        assert!(descriptor("PUT", "http://x.test").allows_body());
        assert!(descriptor("patch", "http://x.test").allows_body());
        assert!(!descriptor("GET", "http://x.test").allows_body());
        assert!(!descriptor("DELETE", "http://x.test").allows_body());
    }

    #[test]
    fn test_timeout_clamping() {
        assert_eq!(clamp_timeout_ms(None), DEFAULT_TIMEOUT_MS);
        assert_eq!(clamp_timeout_ms(Some(0)), MIN_TIMEOUT_MS);
        assert_eq!(clamp_timeout_ms(Some(500)), MIN_TIMEOUT_MS);
        assert_eq!(clamp_timeout_ms(Some(5_000)), 5_000);
        assert_eq!(clamp_timeout_ms(Some(600_000)), MAX_TIMEOUT_MS);
    }

    #[test]
    fn test_url_scheme_enforced() {
        assert!(validate_absolute_http_url("http://example.com/path").is_ok());
        assert!(validate_absolute_http_url("https://example.com").is_ok());
        assert!(validate_absolute_http_url("ftp://example.com").is_err());
        assert!(validate_absolute_http_url("example.com").is_err());
        assert!(validate_absolute_http_url("http://").is_err());
    }
}
