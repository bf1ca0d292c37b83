//! Note models: feed/search entries, note detail, and search results

use super::{User, count_at, string_at, timestamp_at};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// A note as it appears in search results and feeds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    /// Unique note identifier
    pub note_id: String,
    /// Title
    pub title: String,
    /// Description / preview text
    pub description: String,
    /// Author
    pub author: User,
    /// Image URLs
    pub images: Vec<String>,
    /// Raw video metadata, when the note is a video
    pub video: Option<Value>,
    /// Like count
    pub likes: u64,
    /// Comment count
    pub comments: u64,
    /// Collection count
    pub collects: u64,
    /// Share count
    pub shares: u64,
    /// Tag names
    pub tags: Vec<String>,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Note type (`normal` or `video`)
    pub note_type: String,
}

impl Note {
    /// Build a note from a raw API payload.
    ///
    /// Image lists, interaction counts, and titles are spelled differently
    /// between the search, feed, and detail endpoints; every known spelling
    /// is accepted.
    pub fn from_api(data: &Value) -> Self {
        let author = User::from_api(data.get("user").unwrap_or(&Value::Null));

        let interact = data.get("interact_info").cloned().unwrap_or(Value::Null);
        let likes = if interact.get("liked_count").is_some() {
            count_at(&interact, &["liked_count"])
        } else {
            count_at(data, &["likes_count"])
        };
        let comments = if interact.get("comment_count").is_some() {
            count_at(&interact, &["comment_count"])
        } else {
            count_at(data, &["comments_count"])
        };
        let collects = if interact.get("collected_count").is_some() {
            count_at(&interact, &["collected_count"])
        } else {
            count_at(data, &["collected_count"])
        };
        let shares = if interact.get("shared_count").is_some() {
            count_at(&interact, &["shared_count"])
        } else {
            count_at(data, &["share_count"])
        };

        let tags = data
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .map(|t| string_at(t, &["name"]))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        Self {
            note_id: string_at(data, &["note_id", "id"]),
            title: string_at(data, &["title", "display_title"]),
            description: string_at(data, &["desc", "description"]),
            author,
            images: extract_images(data),
            video: data.get("video").filter(|v| !v.is_null()).cloned(),
            likes,
            comments,
            collects,
            shares,
            tags,
            created_at: timestamp_at(data, "time"),
            note_type: {
                let t = string_at(data, &["type"]);
                if t.is_empty() { "normal".to_string() } else { t }
            },
        }
    }
}

/// Pull image URLs out of whichever of the vendor's list shapes is present.
fn extract_images(data: &Value) -> Vec<String> {
    if let Some(list) = data.get("image_list").and_then(Value::as_array) {
        return list
            .iter()
            .map(|img| string_at(img, &["url_default", "url"]))
            .collect();
    }
    if let Some(list) = data.get("images_list").and_then(Value::as_array) {
        return list.iter().map(|img| string_at(img, &["url"])).collect();
    }
    if let Some(list) = data.get("images").and_then(Value::as_array) {
        return list
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
    }
    if let Some(cover) = data.get("cover") {
        let url = string_at(cover, &["url_default", "url"]);
        if !url.is_empty() {
            return vec![url];
        }
    }
    Vec::new()
}

/// A note fetched individually, with fields only the detail endpoint returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteDetail {
    /// The base note fields
    #[serde(flatten)]
    pub note: Note,
    /// Full body text
    pub content: String,
    /// Raw location metadata, if the note is geotagged
    pub location: Option<Value>,
    /// Whether the current user liked this note
    pub is_liked: bool,
    /// Whether the current user collected this note
    pub is_collected: bool,
    /// Last edit time
    pub updated_at: Option<DateTime<Utc>>,
}

impl NoteDetail {
    /// Build note detail from a feed response (`items[0]`) or a bare payload.
    pub fn from_api(data: &Value) -> Self {
        let note_data = data
            .get("items")
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .unwrap_or(data);

        Self {
            note: Note::from_api(note_data),
            content: string_at(note_data, &["desc"]),
            location: note_data.get("location").filter(|v| !v.is_null()).cloned(),
            is_liked: note_data
                .get("liked")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            is_collected: note_data
                .get("collected")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            updated_at: timestamp_at(note_data, "last_update_time"),
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Matching notes
    pub notes: Vec<Note>,
    /// Total result count reported by the API
    pub total: u64,
    /// Whether more results are available
    pub has_more: bool,
}

impl SearchResult {
    /// Build search results from the search endpoint payload.
    ///
    /// Search items wrap the note under `note_card` with the id and security
    /// token held at the outer level.
    pub fn from_api(data: &Value) -> Self {
        let items = data.get("items").and_then(Value::as_array);
        let notes: Vec<Note> = items
            .map(|items| {
                items
                    .iter()
                    .map(|item| match item.get("note_card") {
                        Some(card) => {
                            let mut card = card.clone();
                            if let Some(obj) = card.as_object_mut() {
                                obj.insert("note_id".into(), item["id"].clone());
                                if let Some(title) = obj.get("display_title").cloned() {
                                    obj.insert("title".into(), title);
                                }
                            }
                            Note::from_api(&card)
                        }
                        None => Note::from_api(item),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            total: data
                .get("total")
                .and_then(Value::as_u64)
                .unwrap_or(notes.len() as u64),
            has_more: data
                .get("has_more")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            notes,
        }
    }
}
