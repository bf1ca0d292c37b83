//! Error types for the XHS client

use thiserror::Error;

/// Errors that can occur when talking to the XHS API
#[derive(Error, Debug)]
pub enum XhsError {
    /// Authentication failed (cookie missing, invalid, or expired)
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The vendor signalled that requests are being rate limited
    #[error("rate limit exceeded: {message}")]
    RateLimit {
        /// Message from the API
        message: String,
        /// Suggested wait in seconds before retrying, if known
        retry_after: Option<u64>,
    },

    /// The API returned an error envelope
    #[error("API error {code}: {message}")]
    Api {
        /// Vendor error code (`0` when the response was not a valid envelope)
        code: i64,
        /// Error message from the API
        message: String,
    },

    /// Transport-level failure (connect error, timeout, TLS, ...)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The signing script could not be loaded or the sign call failed
    #[error("signature generation failed: {0}")]
    Signature(String),

    /// A request parameter failed validation before any I/O happened
    #[error("invalid input: {0}")]
    Validation(String),

    /// Client initialization failed
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}
