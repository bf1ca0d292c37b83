//! User model

use super::{count_at, string_at};
use serde::Serialize;
use serde_json::Value;

/// Profile snapshot of an XHS user.
///
/// Built from a single `user/me`, `user/otherinfo`, or embedded author
/// payload; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique user identifier
    pub user_id: String,
    /// Display name
    pub nickname: String,
    /// Avatar image URL, if present
    pub avatar: Option<String>,
    /// Bio text
    pub description: String,
    /// 0 = unknown, 1 = male, 2 = female
    pub gender: u8,
    /// Follower count
    pub followers: u64,
    /// Following count
    pub following: u64,
    /// Published note count
    pub notes_count: u64,
    /// Total likes received
    pub liked_count: u64,
    /// Total collections received
    pub collected_count: u64,
    /// Whether the account is verified
    pub is_verified: bool,
}

impl User {
    /// Build a user from a raw API payload, tolerating the alternate key
    /// names different endpoints use for the same field.
    pub fn from_api(data: &Value) -> Self {
        Self {
            user_id: string_at(data, &["user_id", "id"]),
            nickname: string_at(data, &["nickname"]),
            avatar: data
                .get("avatar")
                .or_else(|| data.get("images"))
                .and_then(Value::as_str)
                .map(str::to_string),
            description: string_at(data, &["desc", "description"]),
            gender: data
                .get("gender")
                .and_then(Value::as_u64)
                .and_then(|gender| u8::try_from(gender).ok())
                .unwrap_or(0),
            followers: count_at(data, &["fans", "followers"]),
            following: count_at(data, &["follows", "following"]),
            notes_count: count_at(data, &["notes", "notes_count"]),
            liked_count: count_at(data, &["liked", "liked_count"]),
            collected_count: count_at(data, &["collected", "collected_count"]),
            is_verified: data
                .get("verified")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }
}
