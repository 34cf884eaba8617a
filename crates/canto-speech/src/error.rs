//! Synthesis error types.

use std::fmt;

use thiserror::Error;

/// Reason code attached to a cancelled synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancellationReason {
    /// 401: subscription key rejected.
    AuthenticationFailure,
    /// 403: key valid but not allowed (quota, region, tier).
    Forbidden,
    /// 400: malformed SSML or unsupported voice/format.
    BadRequest,
    /// 429: rate limit exceeded.
    TooManyRequests,
    /// 408/504
    ServiceTimeout,
    /// Other 5xx.
    ServiceError,
    /// 2xx without audio.
    EmptyAudio,
    Unknown,
}

impl CancellationReason {
    /// Map a non-success HTTP status to a reason code.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::AuthenticationFailure,
            403 => Self::Forbidden,
            429 => Self::TooManyRequests,
            408 | 504 => Self::ServiceTimeout,
            500..=599 => Self::ServiceError,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthenticationFailure => "AuthenticationFailure",
            Self::Forbidden => "Forbidden",
            Self::BadRequest => "BadRequest",
            Self::TooManyRequests => "TooManyRequests",
            Self::ServiceTimeout => "ServiceTimeout",
            Self::ServiceError => "ServiceError",
            Self::EmptyAudio => "EmptyAudio",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for CancellationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by a [`crate::Synthesizer`].
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// The service answered but refused or failed to synthesize.
    #[error("synthesis cancelled: {reason}")]
    Cancelled {
        reason: CancellationReason,
        /// Response body or header detail, when the service sent one.
        detail: Option<String>,
    },

    /// HTTP transport error (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The client cannot be built from the current configuration.
    #[error("speech service is not configured: {0}")]
    Configuration(String),
}

impl SynthesisError {
    /// Detail string of a cancellation, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Cancelled { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_reasons() {
        assert_eq!(CancellationReason::from_status(400), CancellationReason::BadRequest);
        assert_eq!(
            CancellationReason::from_status(401),
            CancellationReason::AuthenticationFailure
        );
        assert_eq!(CancellationReason::from_status(403), CancellationReason::Forbidden);
        assert_eq!(
            CancellationReason::from_status(429),
            CancellationReason::TooManyRequests
        );
        assert_eq!(
            CancellationReason::from_status(504),
            CancellationReason::ServiceTimeout
        );
        assert_eq!(
            CancellationReason::from_status(503),
            CancellationReason::ServiceError
        );
        assert_eq!(CancellationReason::from_status(302), CancellationReason::Unknown);
    }

    #[test]
    fn cancelled_error_displays_reason() {
        let err = SynthesisError::Cancelled {
            reason: CancellationReason::AuthenticationFailure,
            detail: Some("invalid key".into()),
        };
        assert_eq!(err.to_string(), "synthesis cancelled: AuthenticationFailure");
        assert_eq!(err.detail(), Some("invalid key"));
    }
}
