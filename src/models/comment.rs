//! Comment models and pagination

use super::{User, count_at, string_at, timestamp_at};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// A single comment on a note.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    /// Unique comment identifier
    pub comment_id: String,
    /// Comment text
    pub content: String,
    /// Comment author
    pub user: User,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Like count
    pub likes: u64,
    /// Replies to this comment
    pub sub_comments: Vec<Comment>,
    /// Whether the commenter is the note author
    pub is_author: bool,
    /// Whether the current user liked this comment
    pub is_liked: bool,
}

impl Comment {
    /// Build a comment (and its replies, recursively) from a raw payload.
    pub fn from_api(data: &Value) -> Self {
        let user_data = data
            .get("user_info")
            .or_else(|| data.get("user"))
            .unwrap_or(&Value::Null);

        let sub_comments = data
            .get("sub_comments")
            .and_then(Value::as_array)
            .map(|subs| subs.iter().map(Comment::from_api).collect())
            .unwrap_or_default();

        Self {
            comment_id: string_at(data, &["id", "comment_id"]),
            content: string_at(data, &["content"]),
            user: User::from_api(user_data),
            created_at: timestamp_at(data, "create_time"),
            likes: count_at(data, &["like_count", "likes"]),
            sub_comments,
            is_author: data
                .get("is_author")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            is_liked: data.get("liked").and_then(Value::as_bool).unwrap_or(false),
        }
    }
}

/// One page of comments plus the cursor to fetch the next one.
///
/// The cursor is opaque; pass it back verbatim until `has_more` is false.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentPage {
    /// Comments on this page, in server order
    pub comments: Vec<Comment>,
    /// Cursor for the next page (empty on the last page)
    pub cursor: String,
    /// Whether another page is available
    pub has_more: bool,
    /// Total comment count reported by the API
    pub total: u64,
}

impl CommentPage {
    /// Build a comment page from the comment endpoint payload.
    pub fn from_api(data: &Value) -> Self {
        let comments: Vec<Comment> = data
            .get("comments")
            .and_then(Value::as_array)
            .map(|list| list.iter().map(Comment::from_api).collect())
            .unwrap_or_default();

        Self {
            cursor: string_at(data, &["cursor"]),
            has_more: data
                .get("has_more")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            total: data
                .get("total")
                .and_then(Value::as_u64)
                .unwrap_or(comments.len() as u64),
            comments,
        }
    }
}
