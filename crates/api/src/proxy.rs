//! Request execution proxy.
//!
//! Issues a user-specified HTTP request against an arbitrary remote
//! endpoint under an enforced deadline and classifies the result into one
//! [`ExecutionOutcome`]. Any received HTTP response -- 4xx and 5xx
//! included -- is a `Completed` outcome; only transport-level failures
//! become `Failed`. The proxy validates nothing about the destination
//! beyond descriptor schema: it is an explicit pass-through, and egress
//! control belongs outside this crate.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use apiforge_core::execution::{ExecutionOutcome, RequestDescriptor};

/// Error code attached to `Failed` outcomes produced by deadline expiry.
const CODE_TIMEOUT: &str = "timeout";

/// Execute a validated descriptor and classify the result.
///
/// The caller is expected to have run [`RequestDescriptor::validate`]
/// first; an unparseable URL or method still degrades safely into a
/// `Failed` outcome rather than a panic.
pub async fn execute(client: &reqwest::Client, descriptor: &RequestDescriptor) -> ExecutionOutcome {
    let method = descriptor.normalized_method();
    let timeout = Duration::from_millis(descriptor.effective_timeout_ms());
    let started = Instant::now();

    let method = match reqwest::Method::from_bytes(method.as_bytes()) {
        Ok(method) => method,
        Err(e) => {
            return ExecutionOutcome::Failed {
                message: format!("invalid method: {e}"),
                code: None,
            }
        }
    };

    let mut request = client
        .request(method, &descriptor.url)
        .timeout(timeout);

    for (name, value) in &descriptor.headers {
        request = request.header(name, value);
    }

    if descriptor.allows_body() {
        if let Some(body) = &descriptor.body {
            request = request.json(body);
        }
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => return classify_transport_error(&e),
    };

    let status = response.status();
    let headers = header_map(&response);

    // The per-request timeout covers body receipt too, so a stalled body
    // stream still resolves as a timeout failure.
    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => return classify_transport_error(&e),
    };

    let elapsed_ms = started.elapsed().as_millis() as i64;
    let size_bytes = bytes.len() as i64;
    let body = parse_body(&bytes);

    ExecutionOutcome::Completed {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or("").to_string(),
        headers,
        body,
        elapsed_ms,
        size_bytes,
    }
}

/// Map a reqwest transport error onto a `Failed` outcome.
fn classify_transport_error(err: &reqwest::Error) -> ExecutionOutcome {
    if err.is_timeout() {
        return ExecutionOutcome::Failed {
            message: "timeout".to_string(),
            code: Some(CODE_TIMEOUT.to_string()),
        };
    }

    let code = if err.is_connect() {
        Some("connect".to_string())
    } else if err.is_request() {
        Some("request".to_string())
    } else {
        None
    };

    // Include the source chain; reqwest's top-level message alone is often
    // just "error sending request".
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    ExecutionOutcome::Failed {
        message,
        code,
    }
}

/// Flatten response headers into a string map. Non-UTF-8 values are
/// dropped; duplicate names keep the last value.
fn header_map(response: &reqwest::Response) -> HashMap<String, String> {
    response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

/// Parse a response body as JSON when possible, falling back to a string
/// (lossily decoded) so non-JSON responses still round-trip to the client
/// and into history.
fn parse_body(bytes: &[u8]) -> serde_json::Value {
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
