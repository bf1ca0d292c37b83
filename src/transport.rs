//! HTTP transports shared by the blocking and async clients.
//!
//! A transport owns the underlying HTTP client, the session cookie, and the
//! retry policy. It executes [`PreparedRequest`]s and applies the response
//! envelope, so the client facades only deal in domain models.

use crate::constants;
use crate::error::XhsError;
use crate::requests::{HttpMethod, PreparedRequest};
use crate::response::{parse_body, unwrap_envelope};
use reqwest::Url;
use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use std::time::Duration;
use zeroize::Zeroize;

/// Fixed-delay retry policy for transient network failures.
///
/// Only connection and timeout errors are retried. HTTP error statuses and
/// vendor error codes are never retried; they are not transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: constants::DEFAULT_MAX_RETRIES,
            delay: Duration::from_millis(constants::DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

/// Network-level failures worth retrying: failure to connect, timeouts,
/// and connections dropped mid-exchange (reset, aborted, server closed
/// before the response completed). HTTP statuses and malformed payloads
/// are not transient.
fn is_transient(err: &reqwest::Error) -> bool {
    if err.is_connect() || err.is_timeout() {
        return true;
    }
    // A dropped connection surfaces as a send error or a body read error.
    err.is_request() || err.is_body()
}

/// Cookie header that never shows up in logs or debug output.
fn cookie_header(cookie: &str) -> Result<HeaderValue, XhsError> {
    let mut cookie_string = cookie.to_string();
    let result = HeaderValue::from_str(&cookie_string);
    cookie_string.zeroize();
    let mut value = result.map_err(|_| {
        XhsError::Validation("cookie contains characters not valid in a header".to_string())
    })?;
    value.set_sensitive(true);
    Ok(value)
}

fn base_headers(cookie: &str, extra: &HeaderMap) -> Result<HeaderMap, XhsError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static(constants::CONTENT_TYPE),
    );
    headers.insert(USER_AGENT, HeaderValue::from_static(constants::USER_AGENT));
    headers.insert(COOKIE, cookie_header(cookie)?);
    for (name, value) in extra {
        headers.insert(name.clone(), value.clone());
    }
    Ok(headers)
}

/// Map an HTTP error status, preferring the vendor envelope when the body
/// still carries one. Captcha and gateway pages often come back as HTML.
fn status_error(status: reqwest::StatusCode, text: &str) -> XhsError {
    match parse_body(text).and_then(unwrap_envelope) {
        Ok(_) | Err(XhsError::Api { code: 0, .. }) => XhsError::Api {
            code: i64::from(status.as_u16()),
            message: format!("HTTP {status}"),
        },
        Err(err) => err,
    }
}

/// Blocking transport.
#[derive(Clone)]
pub(crate) struct Transport {
    client: reqwest::blocking::Client,
    base_url: Url,
    cookie: String,
    retry: RetryPolicy,
}

// The cookie is a credential; keep it out of debug output.
impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Transport {
    pub fn new(
        base_url: Url,
        cookie: String,
        timeout: Duration,
        proxy: Option<&str>,
        retry: RetryPolicy,
    ) -> Result<Self, XhsError> {
        let mut builder = reqwest::blocking::Client::builder().timeout(timeout);
        if let Some(proxy) = proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|err| XhsError::ClientInit(format!("invalid proxy: {err}")))?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|err| XhsError::ClientInit(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            base_url,
            cookie,
            retry,
        })
    }

    /// Execute a request, retrying transient network failures, and return
    /// the unwrapped `data` payload.
    pub fn execute(
        &self,
        request: &PreparedRequest,
        extra: &HeaderMap,
    ) -> Result<Value, XhsError> {
        let url = self
            .base_url
            .join(request.path)
            .map_err(|err| XhsError::ClientInit(format!("invalid request path: {err}")))?;
        let mut attempt = 0;
        loop {
            match self.send_once(request, &url, extra) {
                Err(XhsError::Network(err))
                    if is_transient(&err) && self.retry.should_retry(attempt) =>
                {
                    attempt += 1;
                    tracing::warn!(attempt, error = %err, "transient network failure, retrying");
                    std::thread::sleep(self.retry.delay);
                }
                other => return other,
            }
        }
    }

    fn send_once(
        &self,
        request: &PreparedRequest,
        url: &Url,
        extra: &HeaderMap,
    ) -> Result<Value, XhsError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(url.clone()),
            HttpMethod::Post => self.client.post(url.clone()),
        };
        builder = builder.headers(base_headers(&self.cookie, extra)?);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        tracing::debug!(method = ?request.method, path = request.path, "sending API request");
        let response = builder.send()?;
        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(status_error(status, &text));
        }
        parse_body(&text).and_then(unwrap_envelope)
    }
}

/// Async transport. Identical semantics to [`Transport`] with non-blocking
/// sends and sleeps.
#[derive(Clone)]
pub(crate) struct AsyncTransport {
    client: reqwest::Client,
    base_url: Url,
    cookie: String,
    retry: RetryPolicy,
}

impl std::fmt::Debug for AsyncTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncTransport")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl AsyncTransport {
    pub fn new(
        base_url: Url,
        cookie: String,
        timeout: Duration,
        proxy: Option<&str>,
        retry: RetryPolicy,
    ) -> Result<Self, XhsError> {
        let mut builder = reqwest::Client::builder().timeout(timeout);
        if let Some(proxy) = proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|err| XhsError::ClientInit(format!("invalid proxy: {err}")))?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|err| XhsError::ClientInit(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            base_url,
            cookie,
            retry,
        })
    }

    pub async fn execute(
        &self,
        request: &PreparedRequest,
        extra: &HeaderMap,
    ) -> Result<Value, XhsError> {
        let url = self
            .base_url
            .join(request.path)
            .map_err(|err| XhsError::ClientInit(format!("invalid request path: {err}")))?;
        let mut attempt = 0;
        loop {
            match self.send_once(request, &url, extra).await {
                Err(XhsError::Network(err))
                    if is_transient(&err) && self.retry.should_retry(attempt) =>
                {
                    attempt += 1;
                    tracing::warn!(attempt, error = %err, "transient network failure, retrying");
                    tokio::time::sleep(self.retry.delay).await;
                }
                other => return other,
            }
        }
    }

    async fn send_once(
        &self,
        request: &PreparedRequest,
        url: &Url,
        extra: &HeaderMap,
    ) -> Result<Value, XhsError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(url.clone()),
            HttpMethod::Post => self.client.post(url.clone()),
        };
        builder = builder.headers(base_headers(&self.cookie, extra)?);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        tracing::debug!(method = ?request.method, path = request.path, "sending API request");
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(status_error(status, &text));
        }
        parse_body(&text).and_then(unwrap_envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests;

    fn transport(base: &str) -> Transport {
        Transport::new(
            Url::parse(base).unwrap(),
            "a1=test; web_session=s".to_string(),
            Duration::from_secs(5),
            None,
            RetryPolicy {
                max_retries: 2,
                delay: Duration::from_millis(1),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_retry_policy_counts_attempts() {
        let policy = RetryPolicy {
            max_retries: 3,
            delay: Duration::from_millis(1),
        };
        assert!(policy.should_retry(0));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));

        let none = RetryPolicy {
            max_retries: 0,
            delay: Duration::from_millis(1),
        };
        assert!(!none.should_retry(0));
    }

    #[test]
    fn test_cookie_header_is_sensitive() {
        let value = cookie_header("a1=secret").unwrap();
        assert!(value.is_sensitive());
        assert!(cookie_header("bad\nvalue").is_err());
    }

    #[test]
    fn test_execute_unwraps_envelope() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/sns/web/v2/user/me")
            .with_body(r#"{"success": true, "code": 0, "data": {"user_id": "u1"}}"#)
            .expect(1)
            .create();

        let data = transport(&server.url())
            .execute(&requests::current_user(), &HeaderMap::new())
            .unwrap();
        assert_eq!(data["user_id"], "u1");
        mock.assert();
    }

    #[test]
    fn test_http_error_status_not_retried() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/sns/web/v2/user/me")
            .with_status(500)
            .with_body("internal error")
            .expect(1)
            .create();

        match transport(&server.url()).execute(&requests::current_user(), &HeaderMap::new()) {
            Err(XhsError::Api { code: 500, .. }) => {}
            other => panic!("expected Api error, got {other:?}"),
        }
        mock.assert();
    }

    #[test]
    fn test_http_error_with_vendor_envelope() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/api/sns/web/v2/user/me")
            .with_status(401)
            .with_body(r#"{"success": false, "code": 10001, "msg": "请先登录"}"#)
            .create();

        match transport(&server.url()).execute(&requests::current_user(), &HeaderMap::new()) {
            Err(XhsError::Auth(msg)) => assert_eq!(msg, "请先登录"),
            other => panic!("expected Auth error, got {other:?}"),
        }
    }

    #[test]
    fn test_unreachable_server_is_network_error() {
        // Nothing listens on this port; connect errors exhaust the retry
        // budget and surface as Network.
        let transport = Transport::new(
            Url::parse("http://127.0.0.1:9").unwrap(),
            "a1=test".to_string(),
            Duration::from_secs(1),
            None,
            RetryPolicy {
                max_retries: 1,
                delay: Duration::from_millis(1),
            },
        )
        .unwrap();
        assert!(matches!(
            transport.execute(&requests::current_user(), &HeaderMap::new()),
            Err(XhsError::Network(_))
        ));
    }

    #[test]
    fn test_connection_reset_retried_until_budget_exhausted() {
        use std::net::TcpListener;
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        // Accept each connection and close it immediately, so every attempt
        // dies mid-exchange rather than at connect time.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let attempts = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&attempts);
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                seen.fetch_add(1, Ordering::SeqCst);
                drop(stream);
            }
        });

        let transport = Transport::new(
            Url::parse(&format!("http://{addr}")).unwrap(),
            "a1=test".to_string(),
            Duration::from_secs(5),
            None,
            RetryPolicy {
                max_retries: 2,
                delay: Duration::from_millis(1),
            },
        )
        .unwrap();
        let result = transport.execute(&requests::current_user(), &HeaderMap::new());
        assert!(matches!(result, Err(XhsError::Network(_))));
        // One initial attempt plus two retries.
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_async_execute_unwraps_envelope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/sns/web/v2/user/me")
            .with_body(r#"{"success": true, "code": 0, "data": {"user_id": "u1"}}"#)
            .create_async()
            .await;

        let transport = AsyncTransport::new(
            Url::parse(&server.url()).unwrap(),
            "a1=test".to_string(),
            Duration::from_secs(5),
            None,
            RetryPolicy::default(),
        )
        .unwrap();
        let data = transport
            .execute(&requests::current_user(), &HeaderMap::new())
            .await
            .unwrap();
        assert_eq!(data["user_id"], "u1");
        mock.assert_async().await;
    }
}
