//! Request descriptions shared by the blocking and async clients.
//!
//! Each API operation is described once as a [`PreparedRequest`]; the two
//! transports only differ in how they execute it.

use crate::constants::{IMAGE_FORMATS, endpoints};
use rand::Rng;
use serde_json::{Value, json};

/// Sort order for note search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchSort {
    /// Relevance ranking (the web default)
    #[default]
    General,
    /// Most liked
    Hot,
    /// Most recent
    Time,
}

impl SearchSort {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            SearchSort::General => "general",
            SearchSort::Hot => "hot",
            SearchSort::Time => "time",
        }
    }
}

/// Note type filter for search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteType {
    /// All notes
    #[default]
    All,
    /// Image notes only
    Normal,
    /// Video notes only
    Video,
}

impl NoteType {
    pub(crate) fn api_code(self) -> u8 {
        match self {
            NoteType::All => 0,
            NoteType::Normal => 1,
            NoteType::Video => 2,
        }
    }
}

/// Which signature headers a request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SignMode {
    /// No signature headers
    None,
    /// `x-s` and `x-t`
    Sign,
    /// `x-s`, `x-t`, and the fixed `x-s-common` value
    SignWithCommon,
}

/// HTTP method for a prepared request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HttpMethod {
    Get,
    Post,
}

/// Everything needed to execute one API call, minus the transport.
#[derive(Debug, Clone)]
pub(crate) struct PreparedRequest {
    pub method: HttpMethod,
    pub path: &'static str,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
    pub sign: SignMode,
}

impl PreparedRequest {
    fn get(path: &'static str, query: Vec<(&'static str, String)>) -> Self {
        Self {
            method: HttpMethod::Get,
            path,
            query,
            body: None,
            sign: SignMode::None,
        }
    }

    fn post(path: &'static str, body: Value, sign: SignMode) -> Self {
        Self {
            method: HttpMethod::Post,
            path,
            query: Vec::new(),
            body: Some(body),
            sign,
        }
    }
}

pub(crate) fn current_user() -> PreparedRequest {
    PreparedRequest::get(endpoints::USER_ME, Vec::new())
}

pub(crate) fn user_profile(user_id: &str) -> PreparedRequest {
    PreparedRequest::get(
        endpoints::USER_PROFILE,
        vec![("target_user_id", user_id.to_string())],
    )
}

pub(crate) fn search_notes(
    keyword: &str,
    search_id: &str,
    limit: u32,
    sort: SearchSort,
    note_type: NoteType,
) -> PreparedRequest {
    PreparedRequest::post(
        endpoints::SEARCH_NOTES,
        json!({
            "keyword": keyword,
            "page": 1,
            "page_size": limit,
            "search_id": search_id,
            "sort": sort.as_str(),
            "note_type": note_type.api_code(),
            "ext_flags": [],
            "geo": "",
            "image_formats": compact_image_formats(),
        }),
        SignMode::Sign,
    )
}

pub(crate) fn home_feed() -> PreparedRequest {
    // Fixed fields captured from the web client; the API rejects requests
    // that omit them.
    PreparedRequest::post(
        endpoints::HOME_FEED,
        json!({
            "category": "homefeed_recommend",
            "cursor_score": "",
            "image_formats": compact_image_formats(),
            "need_filter_image": false,
            "need_num": 8,
            "num": 18,
            "note_index": 33,
            "refresh_type": 1,
            "search_key": "",
            "unread_begin_note_id": "",
            "unread_end_note_id": "",
            "unread_note_count": 0,
        }),
        SignMode::Sign,
    )
}

pub(crate) fn note_detail(note_id: &str, xsec_token: &str) -> PreparedRequest {
    PreparedRequest::post(
        endpoints::NOTE_FEED,
        json!({
            "source_note_id": note_id,
            "image_formats": IMAGE_FORMATS,
            "extra": {"need_body_topic": "1"},
            "xsec_source": "pc_feed",
            "xsec_token": xsec_token,
        }),
        SignMode::SignWithCommon,
    )
}

pub(crate) fn comment_page(note_id: &str, xsec_token: &str, cursor: &str) -> PreparedRequest {
    PreparedRequest::get(
        endpoints::COMMENT_PAGE,
        vec![
            ("note_id", note_id.to_string()),
            ("cursor", cursor.to_string()),
            ("top_comment_id", String::new()),
            ("image_formats", IMAGE_FORMATS.join(",")),
            ("xsec_token", xsec_token.to_string()),
        ],
    )
}

pub(crate) fn post_comment(
    note_id: &str,
    content: &str,
    reply_to: Option<&str>,
) -> PreparedRequest {
    let mut body = json!({
        "note_id": note_id,
        "content": content,
        "at_users": [],
    });
    if let Some(target) = reply_to {
        body["target_comment_id"] = json!(target);
    }
    PreparedRequest::post(endpoints::COMMENT_POST, body, SignMode::Sign)
}

/// The search body carries the image format list pre-serialized as a compact
/// JSON string rather than an array.
fn compact_image_formats() -> String {
    serde_json::to_string(&IMAGE_FORMATS).unwrap_or_default()
}

/// Generate a unique search id: millisecond timestamp shifted left 64 bits
/// plus a random 31-bit component, base-36 encoded.
pub(crate) fn generate_search_id() -> String {
    let ts = chrono::Utc::now().timestamp_millis() as u128;
    let random: u128 = rand::thread_rng().gen_range(0..2147483646u64) as u128;
    to_base36((ts << 64) + random)
}

fn to_base36(mut number: u128) -> String {
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if number == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while number > 0 {
        out.push(ALPHABET[(number % 36) as usize]);
        number /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
