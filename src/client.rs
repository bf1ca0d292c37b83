//! Blocking client and the builder shared with the async client.

use crate::constants;
use crate::error::XhsError;
use crate::models::{Comment, CommentPage, Note, NoteDetail, SearchResult, User};
use crate::requests::{self, NoteType, PreparedRequest, SearchSort, SignMode};
use crate::sign::{SignHeaders, Signer};
use crate::transport::{RetryPolicy, Transport};
use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

/// Builder for [`XhsClient`] and [`crate::AsyncXhsClient`].
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use xhs_client::XhsClient;
///
/// let client = XhsClient::builder("a1=abc; web_session=xyz")
///     .timeout(Duration::from_secs(10))
///     .max_retries(2)
///     .build()?;
/// # Ok::<(), xhs_client::XhsError>(())
/// ```
#[derive(Clone)]
pub struct XhsClientBuilder {
    cookie: String,
    base_url: Url,
    timeout: Duration,
    max_retries: u32,
    retry_delay: Duration,
    proxy: Option<String>,
    script_path: Option<PathBuf>,
}

// The cookie is a credential; keep it out of debug output.
impl std::fmt::Debug for XhsClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XhsClientBuilder")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .field("proxy", &self.proxy)
            .field("script_path", &self.script_path)
            .finish_non_exhaustive()
    }
}

impl XhsClientBuilder {
    /// Start a builder from a browser session cookie string.
    pub fn new(cookie: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
            base_url: Url::parse(constants::API_BASE_URL)
                .expect("Default base URL should always be valid"),
            timeout: Duration::from_secs(constants::DEFAULT_TIMEOUT_SECS),
            max_retries: constants::DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(constants::DEFAULT_RETRY_DELAY_MS),
            proxy: None,
            script_path: None,
        }
    }

    /// Override the API base URL. Mainly useful for tests.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::ClientInit`] if the URL does not parse.
    pub fn base_url(mut self, url: impl reqwest::IntoUrl) -> Result<Self, XhsError> {
        self.base_url = url
            .into_url()
            .map_err(|err| XhsError::ClientInit(format!("invalid base URL: {err}")))?;
        Ok(self)
    }

    /// Per-request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Retry attempts for transient network failures. Defaults to 3; zero
    /// disables retries.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Delay between retry attempts. Defaults to 1 second.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Route requests through an HTTP or SOCKS proxy.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Use a signature script from disk instead of the bundled one.
    pub fn signature_script(mut self, path: impl Into<PathBuf>) -> Self {
        self.script_path = Some(path.into());
        self
    }

    /// Build a blocking client.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::Validation`] if the cookie is empty and
    /// [`XhsError::ClientInit`] or [`XhsError::Signature`] if the HTTP
    /// client or signature engine fails to start.
    pub fn build(self) -> Result<XhsClient, XhsError> {
        let (cookie, signer, retry) = self.prepare()?;
        let transport = Transport::new(
            self.base_url,
            cookie.clone(),
            self.timeout,
            self.proxy.as_deref(),
            retry,
        )?;
        Ok(XhsClient {
            transport,
            signer,
            cookie,
        })
    }

    /// Build an async client.
    ///
    /// # Errors
    ///
    /// Same as [`XhsClientBuilder::build`].
    pub fn build_async(self) -> Result<crate::AsyncXhsClient, XhsError> {
        let (cookie, signer, retry) = self.prepare()?;
        let transport = crate::transport::AsyncTransport::new(
            self.base_url.clone(),
            cookie.clone(),
            self.timeout,
            self.proxy.as_deref(),
            retry,
        )?;
        Ok(crate::AsyncXhsClient::from_parts(transport, signer, cookie))
    }

    fn prepare(&self) -> Result<(String, Signer, RetryPolicy), XhsError> {
        if self.cookie.trim().is_empty() {
            return Err(XhsError::Validation("cookie must not be empty".to_string()));
        }
        let signer = match &self.script_path {
            Some(path) => Signer::from_script_file(path)?,
            None => Signer::shared()?.clone(),
        };
        let retry = RetryPolicy {
            max_retries: self.max_retries,
            delay: self.retry_delay,
        };
        Ok((self.cookie.clone(), signer, retry))
    }
}

/// Blocking client for the private web API.
///
/// Authenticates with a browser session cookie; request signatures are
/// generated locally. Do not use from inside an async runtime; use
/// [`crate::AsyncXhsClient`] there.
///
/// # Example
///
/// ```no_run
/// use xhs_client::XhsClient;
///
/// let client = XhsClient::new("a1=abc; web_session=xyz")?;
/// let me = client.current_user()?;
/// println!("logged in as {}", me.nickname);
/// # Ok::<(), xhs_client::XhsError>(())
/// ```
#[derive(Clone)]
pub struct XhsClient {
    transport: Transport,
    signer: Signer,
    cookie: String,
}

impl std::fmt::Debug for XhsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XhsClient")
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl XhsClient {
    /// Build a client with default settings.
    ///
    /// # Errors
    ///
    /// Same as [`XhsClientBuilder::build`].
    pub fn new(cookie: impl Into<String>) -> Result<Self, XhsError> {
        XhsClientBuilder::new(cookie).build()
    }

    /// Start a builder for non-default settings.
    pub fn builder(cookie: impl Into<String>) -> XhsClientBuilder {
        XhsClientBuilder::new(cookie)
    }

    /// Fetch the profile of the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::Auth`] when the session cookie is missing or
    /// expired.
    pub fn current_user(&self) -> Result<User, XhsError> {
        let data = self.call(&requests::current_user())?;
        Ok(User::from_api(&data))
    }

    /// Fetch another user's public profile.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::Validation`] if `user_id` is empty.
    pub fn user_profile(&self, user_id: &str) -> Result<User, XhsError> {
        non_empty(user_id, "user_id")?;
        let data = self.call(&requests::user_profile(user_id))?;
        Ok(User::from_api(&data))
    }

    /// Search notes by keyword.
    ///
    /// `limit` is the page size, between 1 and 100.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::Validation`] if the keyword is empty or the
    /// limit is out of range.
    pub fn search_notes(
        &self,
        keyword: &str,
        limit: u32,
        sort: SearchSort,
        note_type: NoteType,
    ) -> Result<Vec<Note>, XhsError> {
        non_empty(keyword, "keyword")?;
        validate_limit(limit)?;
        let search_id = requests::generate_search_id();
        let data = self.call(&requests::search_notes(
            keyword, &search_id, limit, sort, note_type,
        ))?;
        Ok(SearchResult::from_api(&data).notes)
    }

    /// Fetch one page of the personalized home feed.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::Auth`] when the session cookie is missing or
    /// expired.
    pub fn home_feed(&self) -> Result<Vec<Note>, XhsError> {
        let data = self.call(&requests::home_feed())?;
        Ok(SearchResult::from_api(&data).notes)
    }

    /// Fetch a single note with full content.
    ///
    /// `xsec_token` is the security token returned alongside the note by
    /// search and feed responses.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::Validation`] if either argument is empty.
    pub fn note_detail(&self, note_id: &str, xsec_token: &str) -> Result<NoteDetail, XhsError> {
        non_empty(note_id, "note_id")?;
        non_empty(xsec_token, "xsec_token")?;
        let data = self.call(&requests::note_detail(note_id, xsec_token))?;
        Ok(NoteDetail::from_api(&data))
    }

    /// Fetch one page of comments on a note.
    ///
    /// Pass `None` for the first page, then the cursor from the previous
    /// page until `has_more` is false.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::Validation`] if `note_id` or `xsec_token` is
    /// empty.
    pub fn note_comments(
        &self,
        note_id: &str,
        xsec_token: &str,
        cursor: Option<&str>,
    ) -> Result<CommentPage, XhsError> {
        non_empty(note_id, "note_id")?;
        non_empty(xsec_token, "xsec_token")?;
        let data = self.call(&requests::comment_page(
            note_id,
            xsec_token,
            cursor.unwrap_or(""),
        ))?;
        Ok(CommentPage::from_api(&data))
    }

    /// Post a comment on a note, or a reply when `reply_to` names an
    /// existing comment id.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::Validation`] if `note_id` is empty or the
    /// content is empty or longer than 500 characters.
    pub fn post_comment(
        &self,
        note_id: &str,
        content: &str,
        reply_to: Option<&str>,
    ) -> Result<Comment, XhsError> {
        non_empty(note_id, "note_id")?;
        validate_comment_content(content)?;
        let data = self.call(&requests::post_comment(note_id, content, reply_to))?;
        Ok(Comment::from_api(data.get("comment").unwrap_or(&data)))
    }

    fn call(&self, request: &PreparedRequest) -> Result<Value, XhsError> {
        let headers = match request.sign {
            SignMode::None => HeaderMap::new(),
            mode => {
                let signed =
                    self.signer
                        .sign(request.path, request.body.as_ref(), &self.cookie)?;
                signed_header_map(mode, &signed)?
            }
        };
        self.transport.execute(request, &headers)
    }
}

pub(crate) fn non_empty(value: &str, what: &str) -> Result<(), XhsError> {
    if value.trim().is_empty() {
        Err(XhsError::Validation(format!("{what} must not be empty")))
    } else {
        Ok(())
    }
}

pub(crate) fn validate_limit(limit: u32) -> Result<(), XhsError> {
    if limit == 0 || limit > constants::MAX_SEARCH_LIMIT {
        Err(XhsError::Validation(format!(
            "limit must be between 1 and {}, got {limit}",
            constants::MAX_SEARCH_LIMIT
        )))
    } else {
        Ok(())
    }
}

pub(crate) fn validate_comment_content(content: &str) -> Result<(), XhsError> {
    non_empty(content, "content")?;
    let length = content.chars().count();
    if length > constants::MAX_COMMENT_LEN {
        return Err(XhsError::Validation(format!(
            "content must be at most {} characters, got {length}",
            constants::MAX_COMMENT_LEN
        )));
    }
    Ok(())
}

/// Turn signature output into the header map a signed request carries.
pub(crate) fn signed_header_map(
    mode: SignMode,
    signed: &SignHeaders,
) -> Result<HeaderMap, XhsError> {
    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static("x-s"), header_value(&signed.x_s)?);
    headers.insert(HeaderName::from_static("x-t"), header_value(&signed.x_t)?);
    if mode == SignMode::SignWithCommon {
        headers.insert(
            HeaderName::from_static("x-s-common"),
            HeaderValue::from_static(constants::XS_COMMON_HEADER),
        );
    }
    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue, XhsError> {
    HeaderValue::from_str(value).map_err(|_| {
        XhsError::Signature("signature contains characters not valid in a header".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cookie_rejected() {
        assert!(matches!(
            XhsClient::new(""),
            Err(XhsError::Validation(_))
        ));
        assert!(matches!(
            XhsClient::new("   "),
            Err(XhsError::Validation(_))
        ));
    }

    #[test]
    fn test_limit_bounds() {
        assert!(validate_limit(1).is_ok());
        assert!(validate_limit(100).is_ok());
        assert!(validate_limit(0).is_err());
        assert!(validate_limit(101).is_err());
    }

    #[test]
    fn test_comment_content_bounds() {
        assert!(validate_comment_content("好").is_ok());
        assert!(validate_comment_content("").is_err());
        assert!(validate_comment_content("  ").is_err());
        // 500 CJK characters pass, 501 fail; the bound counts characters,
        // not bytes.
        assert!(validate_comment_content(&"赞".repeat(500)).is_ok());
        assert!(validate_comment_content(&"赞".repeat(501)).is_err());
    }

    #[test]
    fn test_signed_header_map_modes() {
        let signed = SignHeaders {
            x_s: "XYW_abc".to_string(),
            x_t: "1700000000000".to_string(),
        };
        let plain = signed_header_map(SignMode::Sign, &signed).unwrap();
        assert_eq!(plain.get("x-s").unwrap(), "XYW_abc");
        assert_eq!(plain.get("x-t").unwrap(), "1700000000000");
        assert!(plain.get("x-s-common").is_none());

        let with_common = signed_header_map(SignMode::SignWithCommon, &signed).unwrap();
        assert!(with_common.get("x-s-common").is_some());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(matches!(
            XhsClient::builder("a1=x").base_url("not a url"),
            Err(XhsError::ClientInit(_))
        ));
    }
}
