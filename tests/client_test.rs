//! End-to-end tests against a local mock server.

use mockito::Matcher;
use xhs_client::{AsyncXhsClient, NoteType, SearchSort, XhsClient, XhsError};

fn client(server: &mockito::Server) -> XhsClient {
    XhsClient::builder("a1=abc123; web_session=040069b2")
        .base_url(server.url())
        .unwrap()
        .max_retries(0)
        .build()
        .unwrap()
}

#[test]
fn test_current_user() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/sns/web/v2/user/me")
        .with_body(
            r#"{"success": true, "code": 0, "data": {
                "user_id": "5ff0e6410000000001008400",
                "nickname": "小红薯",
                "desc": "hello",
                "gender": 2
            }}"#,
        )
        .expect(1)
        .create();

    let me = client(&server).current_user().unwrap();
    assert_eq!(me.user_id, "5ff0e6410000000001008400");
    assert_eq!(me.nickname, "小红薯");
    assert_eq!(me.gender, 2);
    mock.assert();
}

#[test]
fn test_expired_session_maps_to_auth_error() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/sns/web/v2/user/me")
        .with_body(r#"{"success": false, "code": 10001, "msg": "登录已过期"}"#)
        .create();

    match client(&server).current_user() {
        Err(XhsError::Auth(msg)) => assert_eq!(msg, "登录已过期"),
        other => panic!("expected Auth error, got {other:?}"),
    }
}

#[test]
fn test_rate_limit_carries_wait_hint() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/sns/web/v1/user/otherinfo")
        .match_query(Matcher::UrlEncoded(
            "target_user_id".into(),
            "u1".into(),
        ))
        .with_body(r#"{"success": false, "code": 10003, "msg": "访问频次异常"}"#)
        .create();

    match client(&server).user_profile("u1") {
        Err(XhsError::RateLimit { retry_after, .. }) => assert_eq!(retry_after, Some(60)),
        other => panic!("expected RateLimit error, got {other:?}"),
    }
}

#[test]
fn test_search_request_is_signed() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/sns/web/v1/search/notes")
        .match_header("x-s", Matcher::Regex("^XYW_".into()))
        .match_header("x-t", Matcher::Regex(r"^\d+$".into()))
        .match_body(Matcher::PartialJson(serde_json::json!({
            "keyword": "咖啡",
            "page_size": 10,
            "sort": "general",
            "note_type": 0,
        })))
        .with_body(
            r#"{"success": true, "code": 0, "data": {
                "items": [
                    {"id": "note-1", "xsec_token": "tok-1", "note_card": {
                        "display_title": "第一篇",
                        "user": {"user_id": "u9", "nickname": "作者九"},
                        "interact_info": {"liked_count": "1.2k"}
                    }}
                ],
                "has_more": false
            }}"#,
        )
        .expect(1)
        .create();

    let notes = client(&server)
        .search_notes("咖啡", 10, SearchSort::General, NoteType::All)
        .unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].note_id, "note-1");
    assert_eq!(notes[0].title, "第一篇");
    assert_eq!(notes[0].likes, 1200);
    mock.assert();
}

#[test]
fn test_note_detail_sends_common_header() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/sns/web/v1/feed")
        .match_header("x-s", Matcher::Regex("^XYW_".into()))
        .match_header("x-s-common", Matcher::Regex("^2UQAP".into()))
        .match_body(Matcher::PartialJson(serde_json::json!({
            "source_note_id": "64b1f0a2000000001e02d9c1",
            "xsec_token": "tok",
        })))
        .with_body(
            r#"{"success": true, "code": 0, "data": {
                "items": [{
                    "note_id": "64b1f0a2000000001e02d9c1",
                    "title": "咖啡店打卡",
                    "desc": "周末的好去处",
                    "liked": true
                }]
            }}"#,
        )
        .expect(1)
        .create();

    let detail = client(&server)
        .note_detail("64b1f0a2000000001e02d9c1", "tok")
        .unwrap();
    assert_eq!(detail.note.note_id, "64b1f0a2000000001e02d9c1");
    assert_eq!(detail.content, "周末的好去处");
    assert!(detail.is_liked);
    mock.assert();
}

#[test]
fn test_comment_pagination_follows_cursor() {
    let mut server = mockito::Server::new();
    let first = server
        .mock("GET", "/api/sns/web/v2/comment/page")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("note_id".into(), "n1".into()),
            Matcher::UrlEncoded("cursor".into(), "".into()),
        ]))
        .with_body(
            r#"{"success": true, "code": 0, "data": {
                "comments": [{"id": "c1", "content": "a", "user": {}}],
                "cursor": "page2",
                "has_more": true
            }}"#,
        )
        .expect(1)
        .create();
    let second = server
        .mock("GET", "/api/sns/web/v2/comment/page")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("note_id".into(), "n1".into()),
            Matcher::UrlEncoded("cursor".into(), "page2".into()),
        ]))
        .with_body(
            r#"{"success": true, "code": 0, "data": {
                "comments": [{"id": "c2", "content": "b", "user": {}}],
                "cursor": "",
                "has_more": false
            }}"#,
        )
        .expect(1)
        .create();

    let client = client(&server);
    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = client
            .note_comments("n1", "tok", cursor.as_deref())
            .unwrap();
        seen.extend(page.comments.iter().map(|c| c.comment_id.clone()));
        if !page.has_more {
            break;
        }
        cursor = Some(page.cursor);
    }
    assert_eq!(seen, vec!["c1", "c2"]);
    first.assert();
    second.assert();
}

#[test]
fn test_post_comment_reply() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/sns/web/v1/comment/post")
        .match_header("x-s", Matcher::Regex("^XYW_".into()))
        .match_body(Matcher::PartialJson(serde_json::json!({
            "note_id": "n1",
            "content": "说得好",
            "target_comment_id": "c7",
        })))
        .with_body(
            r#"{"success": true, "code": 0, "data": {
                "comment": {
                    "id": "c99",
                    "content": "说得好",
                    "user_info": {"user_id": "me", "nickname": "我"}
                }
            }}"#,
        )
        .expect(1)
        .create();

    let comment = client(&server)
        .post_comment("n1", "说得好", Some("c7"))
        .unwrap();
    assert_eq!(comment.comment_id, "c99");
    assert_eq!(comment.user.user_id, "me");
    mock.assert();
}

#[test]
fn test_validation_rejects_before_any_request() {
    let server = mockito::Server::new();
    // No mocks are registered; a request reaching the server would fail
    // the test through the error path below.
    let client = client(&server);

    assert!(matches!(
        client.search_notes("", 10, SearchSort::General, NoteType::All),
        Err(XhsError::Validation(_))
    ));
    assert!(matches!(
        client.search_notes("咖啡", 0, SearchSort::General, NoteType::All),
        Err(XhsError::Validation(_))
    ));
    assert!(matches!(
        client.search_notes("咖啡", 101, SearchSort::General, NoteType::All),
        Err(XhsError::Validation(_))
    ));
    assert!(matches!(
        client.note_detail("", "tok"),
        Err(XhsError::Validation(_))
    ));
    assert!(matches!(
        client.note_detail("n1", ""),
        Err(XhsError::Validation(_))
    ));
    assert!(matches!(
        client.post_comment("n1", "", None),
        Err(XhsError::Validation(_))
    ));
    assert!(matches!(
        client.post_comment("n1", &"赞".repeat(501), None),
        Err(XhsError::Validation(_))
    ));
    assert!(matches!(
        client.user_profile(""),
        Err(XhsError::Validation(_))
    ));
}

#[tokio::test]
async fn test_async_current_user() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/sns/web/v2/user/me")
        .with_body(r#"{"success": true, "code": 0, "data": {"user_id": "u1", "nickname": "n"}}"#)
        .expect(1)
        .create_async()
        .await;

    let client = AsyncXhsClient::builder("a1=abc123; web_session=040069b2")
        .base_url(server.url())
        .unwrap()
        .build_async()
        .unwrap();
    let me = client.current_user().await.unwrap();
    assert_eq!(me.user_id, "u1");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_async_signed_home_feed() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/sns/web/v1/homefeed")
        .match_header("x-s", Matcher::Regex("^XYW_".into()))
        .match_body(Matcher::PartialJson(serde_json::json!({
            "category": "homefeed_recommend",
        })))
        .with_body(
            r#"{"success": true, "code": 0, "data": {
                "items": [
                    {"id": "note-7", "note_card": {"display_title": "推荐", "user": {}}}
                ]
            }}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let client = AsyncXhsClient::builder("a1=abc123; web_session=040069b2")
        .base_url(server.url())
        .unwrap()
        .build_async()
        .unwrap();
    let notes = client.home_feed().await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].note_id, "note-7");
    mock.assert_async().await;
}
