//! Shared HTTP response helpers for the speech client.
//!
//! Centralizes status-code checks so the client stays focused on request
//! construction: every non-success status becomes
//! [`SynthesisError::Cancelled`] with a reason code and the response body as
//! detail.

use crate::error::{CancellationReason, SynthesisError};

/// Check an HTTP response for error conditions.
///
/// Returns the response unchanged on success. For 429 the `Retry-After`
/// header, when present, is folded into the detail.
pub async fn check_response(
    resp: reqwest::Response,
) -> Result<reqwest::Response, SynthesisError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let reason = CancellationReason::from_status(status.as_u16());
    let retry_after = parse_retry_after(&resp);
    let body = resp.text().await.unwrap_or_default();
    let body = body.trim();

    let detail = match (retry_after, body.is_empty()) {
        (Some(secs), true) => Some(format!("retry after {secs}s")),
        (Some(secs), false) => Some(format!("{body} (retry after {secs}s)")),
        (None, false) => Some(body.to_string()),
        (None, true) => None,
    };

    Err(SynthesisError::Cancelled { reason, detail })
}

/// Parse the `Retry-After` header as seconds.
fn parse_retry_after(resp: &reqwest::Response) -> Option<u64> {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}
