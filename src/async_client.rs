//! Async client. Same surface as the blocking [`crate::XhsClient`].

use crate::client::{
    non_empty, signed_header_map, validate_comment_content, validate_limit, XhsClientBuilder,
};
use crate::error::XhsError;
use crate::models::{Comment, CommentPage, Note, NoteDetail, SearchResult, User};
use crate::requests::{self, NoteType, PreparedRequest, SearchSort, SignMode};
use crate::sign::Signer;
use crate::transport::AsyncTransport;
use reqwest::header::HeaderMap;
use serde_json::Value;

/// Async client for the private web API.
///
/// Built through [`XhsClientBuilder::build_async`]; takes the same options
/// as the blocking client.
///
/// # Example
///
/// ```no_run
/// use xhs_client::AsyncXhsClient;
///
/// # async fn run() -> Result<(), xhs_client::XhsError> {
/// let client = AsyncXhsClient::new("a1=abc; web_session=xyz")?;
/// let me = client.current_user().await?;
/// println!("logged in as {}", me.nickname);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AsyncXhsClient {
    transport: AsyncTransport,
    signer: Signer,
    cookie: String,
}

impl std::fmt::Debug for AsyncXhsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncXhsClient")
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl AsyncXhsClient {
    /// Build a client with default settings.
    ///
    /// # Errors
    ///
    /// Same as [`XhsClientBuilder::build`].
    pub fn new(cookie: impl Into<String>) -> Result<Self, XhsError> {
        XhsClientBuilder::new(cookie).build_async()
    }

    /// Start a builder for non-default settings.
    pub fn builder(cookie: impl Into<String>) -> XhsClientBuilder {
        XhsClientBuilder::new(cookie)
    }

    pub(crate) fn from_parts(transport: AsyncTransport, signer: Signer, cookie: String) -> Self {
        Self {
            transport,
            signer,
            cookie,
        }
    }

    /// Fetch the profile of the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::Auth`] when the session cookie is missing or
    /// expired.
    pub async fn current_user(&self) -> Result<User, XhsError> {
        let data = self.call(&requests::current_user()).await?;
        Ok(User::from_api(&data))
    }

    /// Fetch another user's public profile.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::Validation`] if `user_id` is empty.
    pub async fn user_profile(&self, user_id: &str) -> Result<User, XhsError> {
        non_empty(user_id, "user_id")?;
        let data = self.call(&requests::user_profile(user_id)).await?;
        Ok(User::from_api(&data))
    }

    /// Search notes by keyword.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::Validation`] if the keyword is empty or the
    /// limit is out of range.
    pub async fn search_notes(
        &self,
        keyword: &str,
        limit: u32,
        sort: SearchSort,
        note_type: NoteType,
    ) -> Result<Vec<Note>, XhsError> {
        non_empty(keyword, "keyword")?;
        validate_limit(limit)?;
        let search_id = requests::generate_search_id();
        let data = self
            .call(&requests::search_notes(
                keyword, &search_id, limit, sort, note_type,
            ))
            .await?;
        Ok(SearchResult::from_api(&data).notes)
    }

    /// Fetch one page of the personalized home feed.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::Auth`] when the session cookie is missing or
    /// expired.
    pub async fn home_feed(&self) -> Result<Vec<Note>, XhsError> {
        let data = self.call(&requests::home_feed()).await?;
        Ok(SearchResult::from_api(&data).notes)
    }

    /// Fetch a single note with full content.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::Validation`] if either argument is empty.
    pub async fn note_detail(
        &self,
        note_id: &str,
        xsec_token: &str,
    ) -> Result<NoteDetail, XhsError> {
        non_empty(note_id, "note_id")?;
        non_empty(xsec_token, "xsec_token")?;
        let data = self.call(&requests::note_detail(note_id, xsec_token)).await?;
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
    pub async fn note_comments(
        &self,
        note_id: &str,
        xsec_token: &str,
        cursor: Option<&str>,
    ) -> Result<CommentPage, XhsError> {
        non_empty(note_id, "note_id")?;
        non_empty(xsec_token, "xsec_token")?;
        let data = self
            .call(&requests::comment_page(
                note_id,
                xsec_token,
                cursor.unwrap_or(""),
            ))
            .await?;
        Ok(CommentPage::from_api(&data))
    }

    /// Post a comment on a note, or a reply when `reply_to` names an
    /// existing comment id.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::Validation`] if `note_id` is empty or the
    /// content is empty or longer than 500 characters.
    pub async fn post_comment(
        &self,
        note_id: &str,
        content: &str,
        reply_to: Option<&str>,
    ) -> Result<Comment, XhsError> {
        non_empty(note_id, "note_id")?;
        validate_comment_content(content)?;
        let data = self
            .call(&requests::post_comment(note_id, content, reply_to))
            .await?;
        Ok(Comment::from_api(data.get("comment").unwrap_or(&data)))
    }

    async fn call(&self, request: &PreparedRequest) -> Result<Value, XhsError> {
        let headers = match request.sign {
            SignMode::None => HeaderMap::new(),
            mode => {
                let signed = self
                    .signer
                    .sign_async(request.path, request.body.as_ref(), &self.cookie)
                    .await?;
                signed_header_map(mode, &signed)?
            }
        };
        self.transport.execute(request, &headers).await
    }
}
