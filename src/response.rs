//! Response envelope handling and vendor error-code mapping

use crate::error::XhsError;
use serde_json::Value;

/// Vendor codes that indicate a missing or expired session.
const AUTH_CODES: [i64; 2] = [10001, 10002];
/// Vendor code that indicates rate limiting.
const RATE_LIMIT_CODE: i64 = 10003;
/// Wait hint returned with rate-limit errors, in seconds. The vendor does
/// not send one, so the web client's observed cool-down is used.
const RATE_LIMIT_RETRY_AFTER: u64 = 60;

/// Parse a response body into JSON, mapping garbage to an API error.
pub(crate) fn parse_body(text: &str) -> Result<Value, XhsError> {
    serde_json::from_str(text).map_err(|_| XhsError::Api {
        code: 0,
        message: format!("invalid JSON response: {}", truncate(text, 200)),
    })
}

/// Apply the envelope: `{success, code, msg|message, data}`.
///
/// On a vendor error the code is mapped through the fixed taxonomy table;
/// on success the `data` member is returned, or the whole document when the
/// endpoint does not wrap its payload.
pub(crate) fn unwrap_envelope(body: Value) -> Result<Value, XhsError> {
    let success = body.get("success").and_then(Value::as_bool).unwrap_or(true);
    let code = body.get("code").and_then(Value::as_i64).unwrap_or(0);

    if !success || code != 0 {
        let message = body
            .get("msg")
            .or_else(|| body.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(map_error_code(code, message));
    }

    match body.get("data") {
        Some(data) => Ok(data.clone()),
        None => Ok(body),
    }
}

/// Fixed lookup from vendor error codes to the error taxonomy.
pub(crate) fn map_error_code(code: i64, message: String) -> XhsError {
    if AUTH_CODES.contains(&code) {
        XhsError::Auth(message)
    } else if code == RATE_LIMIT_CODE {
        XhsError::RateLimit {
            message,
            retry_after: Some(RATE_LIMIT_RETRY_AFTER),
        }
    } else {
        XhsError::Api { code, message }
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
