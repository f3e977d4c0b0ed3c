//! REST client tests
//!
//! Exercise the real `RestClient` against a fake server on a local port.
//!
//! Run with: cargo test -p integration-tests --test rest_client_tests

use anyhow::Result;
use axum::extract::{Path, Query};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chat_core::{
    CategoryClient, CategoryType, ChannelClient, ChannelCategory, ChannelUnread,
    OrderedChannelCategories, Post, PostClient, PostList, Preference, PreferenceClient,
    StatusClient, StatusKind, UserStatus,
};
use integration_tests::TestServer;
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::net::TcpListener;

const TOKEN: &str = "secret-token";

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "id": "api.context.session_expired.app_error",
            "message": "Invalid or expired session, please login again.",
            "status_code": 401,
        })),
    )
        .into_response()
}

fn is_authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

async fn get_post(Path(post_id): Path<String>, headers: HeaderMap) -> Response {
    if !is_authorized(&headers) {
        return unauthorized();
    }
    let mut post = Post::new(post_id, "town", 1_700_000_000_000);
    post.message = "hello".to_string();
    Json(post).into_response()
}

async fn channel_posts(
    Path(channel_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<PostList> {
    // Two posts, newest first; the page number comes back as the older cursor
    let newer = Post::new("p2", channel_id.clone(), 2);
    let older = Post::new("p1", channel_id, 1);
    let page = query.get("page").cloned().unwrap_or_default();
    Json(PostList::from_posts(vec![newer, older]).with_cursors("", &page))
}

async fn patch_post(Path(post_id): Path<String>, Json(body): Json<Value>) -> Json<Post> {
    let mut post = Post::new(post_id, "town", 1);
    post.message = body["message"].as_str().unwrap_or_default().to_string();
    post.edit_at = 2;
    Json(post)
}

async fn delete_post() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "id": "api.context.permissions.app_error",
            "message": "You do not have the appropriate permissions.",
            "status_code": 500,
        })),
    )
        .into_response()
}

async fn no_reactions() -> Json<Value> {
    Json(Value::Null)
}

async fn broken_channel() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
}

async fn categories(Path((user_id, team_id)): Path<(String, String)>) -> Json<OrderedChannelCategories> {
    let mut favorites =
        ChannelCategory::new("fav", team_id.as_str(), CategoryType::Favorites, "Favorites");
    favorites.user_id = user_id;
    let channels = ChannelCategory::new("chan", team_id.as_str(), CategoryType::Channels, "Channels")
        .with_channels(["town"]);
    Json(OrderedChannelCategories {
        categories: vec![favorites, channels],
        order: vec!["fav".to_string(), "chan".to_string()],
    })
}

async fn category_order(Json(order): Json<Vec<String>>) -> Json<Vec<String>> {
    Json(order)
}

async fn set_unread(
    Path((user_id, post_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Json<ChannelUnread> {
    // Mentions only come back when the caller declared thread support
    let threads = body["collapsed_threads_supported"].as_bool().unwrap_or_default();
    Json(ChannelUnread {
        team_id: format!("team-of-{user_id}"),
        channel_id: format!("channel-of-{post_id}"),
        msg_count: 4,
        mention_count: i64::from(threads),
        last_viewed_at: 99,
    })
}

async fn save_preferences(
    Path(user_id): Path<String>,
    Json(preferences): Json<Vec<Preference>>,
) -> Response {
    if preferences.iter().any(|p| p.user_id != user_id) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "id": "api.preference.update_preferences.set.app_error",
                "message": "Unable to set user preferences.",
                "status_code": 403,
            })),
        )
            .into_response();
    }
    Json(json!({ "status": "OK" })).into_response()
}

async fn statuses(Json(user_ids): Json<Vec<String>>) -> Json<Vec<UserStatus>> {
    Json(
        user_ids
            .into_iter()
            .map(|id| UserStatus::new(id, StatusKind::Away))
            .collect(),
    )
}

fn app() -> Router {
    Router::new()
        .route("/api/v4/posts/:post_id", get(get_post).delete(delete_post))
        .route("/api/v4/posts/:post_id/patch", put(patch_post))
        .route("/api/v4/posts/:post_id/reactions", get(no_reactions))
        .route("/api/v4/channels/:channel_id", get(broken_channel))
        .route("/api/v4/channels/:channel_id/posts", get(channel_posts))
        .route(
            "/api/v4/users/:user_id/teams/:team_id/channels/categories",
            get(categories),
        )
        .route(
            "/api/v4/users/:user_id/teams/:team_id/channels/categories/order",
            put(category_order),
        )
        .route("/api/v4/users/status/ids", post(statuses))
        .route("/api/v4/users/:user_id/posts/:post_id/set_unread", post(set_unread))
        .route("/api/v4/users/:user_id/preferences", put(save_preferences))
}

// ============================================================================
// Posts
// ============================================================================

#[tokio::test]
async fn test_get_post_sends_bearer_token() -> Result<()> {
    let server = TestServer::start(app()).await?;
    let client = server.client(Some(TOKEN))?;

    let post = client.get_post("p1").await?;

    assert_eq!(post.id, "p1");
    assert_eq!(post.message, "hello");
    Ok(())
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() -> Result<()> {
    let server = TestServer::start(app()).await?;
    let client = server.client(None)?;

    let err = client
        .get_post("p1")
        .await
        .err()
        .ok_or_else(|| anyhow::anyhow!("expected an error"))?;

    assert_eq!(err.status_code, 401);
    assert_eq!(err.server_error_id, "api.context.session_expired.app_error");
    assert!(err.url.ends_with("/api/v4/posts/p1"));
    assert!(err.should_force_logout());
    Ok(())
}

#[tokio::test]
async fn test_get_posts_decodes_page() -> Result<()> {
    let server = TestServer::start(app()).await?;
    let client = server.client(Some(TOKEN))?;

    let list = client.get_posts("town", 3, 60).await?;

    assert_eq!(list.order, vec!["p2", "p1"]);
    assert_eq!(list.posts.len(), 2);
    assert_eq!(list.prev_post_id, "3");
    assert!(list.reached_newest());
    Ok(())
}

#[tokio::test]
async fn test_patch_post_sends_message() -> Result<()> {
    let server = TestServer::start(app()).await?;
    let client = server.client(Some(TOKEN))?;
    let mut post = Post::new("p1", "town", 1);
    post.message = "edited".to_string();

    let patched = client.patch_post(&post).await?;

    assert_eq!(patched.message, "edited");
    assert_eq!(patched.edit_at, 2);
    Ok(())
}

#[tokio::test]
async fn test_null_reactions_are_empty() -> Result<()> {
    let server = TestServer::start(app()).await?;
    let client = server.client(Some(TOKEN))?;

    let reactions = client.get_reactions_for_post("p1").await?;

    assert!(reactions.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_set_post_unread_decodes_channel_unread() -> Result<()> {
    let server = TestServer::start(app()).await?;
    let client = server.client(Some(TOKEN))?;

    let unread = client.set_post_unread("u1", "p1").await?;

    assert_eq!(unread.team_id, "team-of-u1");
    assert_eq!(unread.channel_id, "channel-of-p1");
    assert_eq!(unread.msg_count, 4);
    assert_eq!(unread.mention_count, 1);
    assert_eq!(unread.last_viewed_at, 99);
    Ok(())
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_http_status_overrides_body_status() -> Result<()> {
    let server = TestServer::start(app()).await?;
    let client = server.client(Some(TOKEN))?;

    let err = client
        .delete_post("p1")
        .await
        .err()
        .ok_or_else(|| anyhow::anyhow!("expected an error"))?;

    assert_eq!(err.status_code, 403);
    assert_eq!(err.server_error_id, "api.context.permissions.app_error");
    assert!(!err.should_force_logout());
    Ok(())
}

#[tokio::test]
async fn test_plain_text_error_body() -> Result<()> {
    let server = TestServer::start(app()).await?;
    let client = server.client(Some(TOKEN))?;

    let err = client
        .get_channel("town")
        .await
        .err()
        .ok_or_else(|| anyhow::anyhow!("expected an error"))?;

    assert_eq!(err.status_code, 500);
    assert_eq!(err.message, "boom");
    Ok(())
}

#[tokio::test]
async fn test_unreachable_server_is_status_zero() -> Result<()> {
    // Grab a free port, then close it again
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    let client = chat_api::RestClient::new(
        &format!("http://{addr}"),
        Some(TOKEN),
        std::time::Duration::from_secs(2),
    )?;

    let err = client
        .get_post("p1")
        .await
        .err()
        .ok_or_else(|| anyhow::anyhow!("expected an error"))?;

    assert_eq!(err.status_code, 0);
    assert!(err.is_network());
    assert!(!err.should_force_logout());
    Ok(())
}

// ============================================================================
// Categories and statuses
// ============================================================================

#[tokio::test]
async fn test_get_categories() -> Result<()> {
    let server = TestServer::start(app()).await?;
    let client = server.client(Some(TOKEN))?;

    let fetched = client.get_channel_categories("user1", "team1").await?;

    assert_eq!(fetched.order, vec!["fav", "chan"]);
    assert_eq!(fetched.categories.len(), 2);
    assert_eq!(fetched.categories[0].user_id, "user1");
    assert_eq!(fetched.categories[1].channel_ids, vec!["town"]);
    assert!(fetched.categories.iter().all(|c| c.team_id == "team1"));
    Ok(())
}

#[tokio::test]
async fn test_update_category_order_echoes() -> Result<()> {
    let server = TestServer::start(app()).await?;
    let client = server.client(Some(TOKEN))?;
    let order = vec!["chan".to_string(), "fav".to_string()];

    let saved = client
        .update_channel_category_order("user1", "team1", &order)
        .await?;

    assert_eq!(saved, order);
    Ok(())
}

#[tokio::test]
async fn test_save_preferences() -> Result<()> {
    let server = TestServer::start(app()).await?;
    let client = server.client(Some(TOKEN))?;

    client
        .save_preferences("u1", &[Preference::favorite_channel("u1", "town", true)])
        .await?;

    let err = client
        .save_preferences("u1", &[Preference::favorite_channel("u2", "town", true)])
        .await
        .err()
        .ok_or_else(|| anyhow::anyhow!("expected an error"))?;
    assert_eq!(err.status_code, 403);
    assert_eq!(err.server_error_id, "api.preference.update_preferences.set.app_error");
    assert!(err.url.ends_with("/api/v4/users/u1/preferences"));
    Ok(())
}

#[tokio::test]
async fn test_statuses_by_ids() -> Result<()> {
    let server = TestServer::start(app()).await?;
    let client = server.client(Some(TOKEN))?;

    let statuses = client
        .get_statuses_by_ids(&["u1".to_string(), "u2".to_string()])
        .await?;

    assert_eq!(
        statuses,
        vec![
            UserStatus::new("u1", StatusKind::Away),
            UserStatus::new("u2", StatusKind::Away),
        ]
    );
    Ok(())
}
