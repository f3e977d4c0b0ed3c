//! Category action tests
//!
//! Optimistic sidebar updates against the in-memory client: the update is
//! visible immediately, reconciled on success and rolled back exactly on
//! failure.
//!
//! Run with: cargo test -p integration-tests --test category_tests

use std::collections::HashMap;

use anyhow::Result;
use chat_cache::StoreState;
use chat_core::{
    Action, ApiError, CategorySorting, CategoryType, Channel, ChannelCategory, ChannelType,
    DomainError, OrderedChannelCategories, Preference,
};
use chat_service::dto::{CreateCategoryRequest, RenameCategoryRequest};
use chat_service::{ActionError, CategoryActions};
use integration_tests::{
    default_categories, test_context, MockClient, StoreFixture, TEAM_ID, USER_ID,
};

fn channels_id() -> String {
    format!("channels_{TEAM_ID}")
}

fn favorites_id() -> String {
    format!("favorites_{TEAM_ID}")
}

fn channel_ids(state: &StoreState, category_id: &str) -> Vec<String> {
    state
        .categories
        .category(category_id)
        .map(|c| c.channel_ids.clone())
        .unwrap_or_default()
}

/// Every channel id appears in at most one category of the team
fn assert_exclusive(state: &StoreState) {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for category in state.categories.categories_for_team(TEAM_ID) {
        for channel_id in &category.channel_ids {
            if let Some(other) = seen.insert(channel_id, &category.id) {
                panic!("{channel_id} is in both {other} and {}", category.id);
            }
        }
    }
}

// ============================================================================
// Moving channels
// ============================================================================

#[tokio::test]
async fn test_failed_move_restores_exact_state() -> Result<()> {
    let client = MockClient::new();
    client.fail_with_status("update_channel_categories", 400);
    let store = StoreFixture::logged_in()
        .with_default_categories(&["x", "y"])
        .with_category(
            ChannelCategory::new("c1", TEAM_ID, CategoryType::Custom, "Work")
                .with_channels(["a", "b"]),
        )
        .build();
    let ctx = test_context(store, &client)?;
    let before = ctx.store().get_state();

    let result = CategoryActions::new(&ctx)
        .move_channel_to_category("c1", "x", 0)
        .await;

    assert!(matches!(result, Err(ActionError::Api(ref e)) if e.status_code == 400));
    let after = ctx.store().get_state();
    assert_eq!(channel_ids(&after, "c1"), vec!["a", "b"]);
    assert_eq!(after, before);
    Ok(())
}

#[tokio::test]
async fn test_move_is_exclusive_and_manual() -> Result<()> {
    let client = MockClient::new();
    let store = StoreFixture::logged_in()
        .with_default_categories(&["x", "y"])
        .with_category(
            ChannelCategory::new("c1", TEAM_ID, CategoryType::Custom, "Work")
                .with_channels(["a", "b"]),
        )
        .build();
    let ctx = test_context(store, &client)?;
    let actions = CategoryActions::new(&ctx);

    actions.move_channel_to_category("c1", "x", 1).await?;
    actions.move_channel_to_category("c1", "y", 0).await?;
    actions
        .move_channel_to_category(&channels_id(), "a", 0)
        .await?;

    ctx.store().select(|s| {
        assert_eq!(channel_ids(s, "c1"), vec!["y", "x", "b"]);
        assert_eq!(channel_ids(s, &channels_id()), vec!["a"]);
        assert_eq!(
            s.categories.category("c1").map(|c| c.sorting),
            Some(CategorySorting::Manual)
        );
        assert_exclusive(s);
    });
    assert_eq!(client.call_count("update_channel_categories"), 3);
    Ok(())
}

#[tokio::test]
async fn test_add_channel_keeps_sorting() -> Result<()> {
    let client = MockClient::new();
    let mut work = ChannelCategory::new("c1", TEAM_ID, CategoryType::Custom, "Work")
        .with_channels(["a"]);
    work.sorting = CategorySorting::Alphabetical;
    let store = StoreFixture::logged_in()
        .with_default_categories(&["x"])
        .with_category(work)
        .build();
    let ctx = test_context(store, &client)?;

    CategoryActions::new(&ctx)
        .add_channel_to_category("c1", "x")
        .await?;

    ctx.store().select(|s| {
        assert_eq!(channel_ids(s, "c1"), vec!["x", "a"]);
        assert_eq!(
            s.categories.category("c1").map(|c| c.sorting),
            Some(CategorySorting::Alphabetical)
        );
    });
    Ok(())
}

#[tokio::test]
async fn test_expired_session_skips_rollback() -> Result<()> {
    let client = MockClient::new();
    client.fail(
        "update_channel_categories",
        ApiError::new("expired", 401, "/api/v4/users/user1/teams/team1/channels/categories"),
    );
    let store = StoreFixture::logged_in()
        .with_default_categories(&["x"])
        .build();
    let ctx = test_context(store, &client)?;

    let result = CategoryActions::new(&ctx)
        .move_channel_to_category(&favorites_id(), "x", 0)
        .await;

    assert!(result.is_err());
    ctx.store().select(|s| {
        assert!(s.current_user_id().is_none());
        assert!(!s.categories.is_loaded(TEAM_ID));
        assert!(s.categories.category(&channels_id()).is_none());
    });
    Ok(())
}

// ============================================================================
// Favorites
// ============================================================================

#[tokio::test]
async fn test_favorite_moves_channel_into_favorites() -> Result<()> {
    let client = MockClient::new();
    let store = StoreFixture::logged_in()
        .with_channel("town")
        .with_channel("other")
        .with_default_categories(&["town", "other"])
        .build();
    let ctx = test_context(store, &client)?;
    let actions = CategoryActions::new(&ctx);
    assert!(!actions.is_favorite_channel("town"));

    actions.favorite_channel("town").await?;

    ctx.store().select(|s| {
        assert_eq!(channel_ids(s, &channels_id()), vec!["other"]);
        assert_eq!(channel_ids(s, &favorites_id()), vec!["town"]);
        assert!(s.preferences.is_favorite_channel("town"));
    });
    assert!(actions.is_favorite_channel("town"));
    Ok(())
}

#[tokio::test]
async fn test_unfavorite_returns_channel_home() -> Result<()> {
    let client = MockClient::new();
    let store = StoreFixture::logged_in()
        .with_channel("town")
        .with_channel("other")
        .with_default_categories(&["other"])
        .build();
    let ctx = test_context(store, &client)?;
    let actions = CategoryActions::new(&ctx);
    actions
        .add_channel_to_category(&favorites_id(), "town")
        .await?;

    actions.unfavorite_channel("town").await?;

    ctx.store().select(|s| {
        assert_eq!(channel_ids(s, &channels_id()), vec!["town", "other"]);
        assert!(channel_ids(s, &favorites_id()).is_empty());
        assert!(!s.preferences.is_favorite_channel("town"));
    });
    assert!(!actions.is_favorite_channel("town"));
    Ok(())
}

#[tokio::test]
async fn test_failed_favorite_restores_preferences() -> Result<()> {
    let client = MockClient::new();
    client.fail_with_status("update_channel_categories", 500);
    let store = StoreFixture::logged_in()
        .with_channel("town")
        .with_default_categories(&["town"])
        .build();
    let ctx = test_context(store, &client)?;
    let before = ctx.store().get_state();

    let result = CategoryActions::new(&ctx).favorite_channel("town").await;

    assert!(result.is_err());
    assert_eq!(ctx.store().get_state(), before);
    Ok(())
}

#[tokio::test]
async fn test_favorite_without_category_uses_preference() -> Result<()> {
    let client = MockClient::new();
    let store = StoreFixture::logged_in().with_channel("town").build();
    let ctx = test_context(store, &client)?;
    let actions = CategoryActions::new(&ctx);

    actions.favorite_channel("town").await?;
    assert!(actions.is_favorite_channel("town"));

    actions.unfavorite_channel("town").await?;
    assert!(!actions.is_favorite_channel("town"));
    assert_eq!(client.calls(), vec!["save_preferences", "save_preferences"]);
    assert_eq!(
        client.saved_preferences(),
        vec![
            Preference::favorite_channel(USER_ID, "town", true),
            Preference::favorite_channel(USER_ID, "town", false),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_failed_favorite_preference_is_rolled_back() -> Result<()> {
    let client = MockClient::new();
    client.fail_with_status("save_preferences", 500);
    let ctx = test_context(StoreFixture::logged_in().with_channel("town").build(), &client)?;
    let actions = CategoryActions::new(&ctx);
    let before = ctx.store().get_state();

    let result = actions.favorite_channel("town").await;

    assert!(matches!(result, Err(ActionError::Api(ref e)) if e.status_code == 500));
    assert!(!actions.is_favorite_channel("town"));
    assert_eq!(ctx.store().get_state(), before);
    Ok(())
}

#[tokio::test]
async fn test_failed_unfavorite_restores_old_preference() -> Result<()> {
    let client = MockClient::new();
    let store = StoreFixture::logged_in()
        .with_channel("town")
        .with_action(Action::received_preferences(vec![Preference::favorite_channel(
            USER_ID, "town", true,
        )]))
        .build();
    let ctx = test_context(store, &client)?;
    client.fail_with_status("save_preferences", 503);
    let actions = CategoryActions::new(&ctx);
    let before = ctx.store().get_state();

    let result = actions.unfavorite_channel("town").await;

    assert!(result.is_err());
    assert!(actions.is_favorite_channel("town"));
    assert_eq!(ctx.store().get_state(), before);
    Ok(())
}

// ============================================================================
// Category order
// ============================================================================

#[tokio::test]
async fn test_move_category() -> Result<()> {
    let client = MockClient::new();
    let store = StoreFixture::logged_in().with_default_categories(&[]).build();
    let ctx = test_context(store, &client)?;
    let dm = format!("direct_messages_{TEAM_ID}");

    CategoryActions::new(&ctx)
        .move_category(TEAM_ID, &dm, 0)
        .await?;

    assert_eq!(
        ctx.store().select(|s| s.categories.order(TEAM_ID).to_vec()),
        vec![dm, favorites_id(), channels_id()]
    );
    assert_eq!(client.call_count("update_channel_category_order"), 1);
    Ok(())
}

#[tokio::test]
async fn test_failed_move_category_restores_order() -> Result<()> {
    let client = MockClient::new();
    client.fail_with_status("update_channel_category_order", 503);
    let store = StoreFixture::logged_in().with_default_categories(&[]).build();
    let ctx = test_context(store, &client)?;
    let before = ctx.store().select(|s| s.categories.order(TEAM_ID).to_vec());

    let result = CategoryActions::new(&ctx)
        .move_category(TEAM_ID, &channels_id(), 0)
        .await;

    assert!(result.is_err());
    assert_eq!(
        ctx.store().select(|s| s.categories.order(TEAM_ID).to_vec()),
        before
    );
    Ok(())
}

// ============================================================================
// Category lifecycle
// ============================================================================

#[tokio::test]
async fn test_create_category_below_favorites() -> Result<()> {
    let client = MockClient::new();
    let store = StoreFixture::logged_in()
        .with_default_categories(&["town", "other"])
        .build();
    let ctx = test_context(store, &client)?;

    let created = CategoryActions::new(&ctx)
        .create_category(CreateCategoryRequest {
            team_id: TEAM_ID.to_string(),
            display_name: "Work".to_string(),
            channel_ids: vec!["town".to_string()],
        })
        .await?;

    ctx.store().select(|s| {
        assert_eq!(
            s.categories.order(TEAM_ID).get(..2),
            Some(&[favorites_id(), created.id.clone()][..])
        );
        assert_eq!(channel_ids(s, &created.id), vec!["town"]);
        assert_eq!(channel_ids(s, &channels_id()), vec!["other"]);
        assert_exclusive(s);
    });
    Ok(())
}

#[tokio::test]
async fn test_create_category_validates_name() -> Result<()> {
    let client = MockClient::new();
    let ctx = test_context(StoreFixture::logged_in().build(), &client)?;

    let result = CategoryActions::new(&ctx)
        .create_category(CreateCategoryRequest {
            team_id: TEAM_ID.to_string(),
            display_name: "A name that is far too long".to_string(),
            channel_ids: Vec::new(),
        })
        .await;

    assert!(matches!(result, Err(ActionError::Validation(_))));
    assert!(client.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_rename_and_collapse() -> Result<()> {
    let client = MockClient::new();
    let store = StoreFixture::logged_in()
        .with_category(ChannelCategory::new("c1", TEAM_ID, CategoryType::Custom, "Work"))
        .build();
    let ctx = test_context(store, &client)?;
    let actions = CategoryActions::new(&ctx);

    actions
        .rename_category(
            "c1",
            RenameCategoryRequest {
                display_name: "Projects".to_string(),
            },
        )
        .await?;
    actions.set_category_collapsed("c1", true).await?;
    actions
        .set_category_sorting("c1", CategorySorting::Recency)
        .await?;

    let category = ctx
        .store()
        .select(|s| s.categories.category("c1").cloned())
        .unwrap_or_default();
    assert_eq!(category.display_name, "Projects");
    assert!(category.collapsed);
    assert_eq!(category.sorting, CategorySorting::Recency);
    Ok(())
}

#[tokio::test]
async fn test_delete_category_returns_channels_home() -> Result<()> {
    let client = MockClient::new();
    let store = StoreFixture::logged_in()
        .with_default_categories(&["c"])
        .with_category(
            ChannelCategory::new("work", TEAM_ID, CategoryType::Custom, "Work")
                .with_channels(["a", "b"]),
        )
        .build();
    let ctx = test_context(store, &client)?;

    CategoryActions::new(&ctx).delete_category("work").await?;

    ctx.store().select(|s| {
        assert!(s.categories.category("work").is_none());
        assert!(!s.categories.order(TEAM_ID).contains(&"work".to_string()));
        assert_eq!(channel_ids(s, &channels_id()), vec!["a", "b", "c"]);
    });
    Ok(())
}

#[tokio::test]
async fn test_failed_delete_restores_category() -> Result<()> {
    let client = MockClient::new();
    client.fail_with_status("delete_channel_category", 500);
    let store = StoreFixture::logged_in()
        .with_default_categories(&["c"])
        .with_category(
            ChannelCategory::new("work", TEAM_ID, CategoryType::Custom, "Work")
                .with_channels(["a", "b"]),
        )
        .build();
    let ctx = test_context(store, &client)?;
    let before = ctx.store().get_state();

    let result = CategoryActions::new(&ctx).delete_category("work").await;

    assert!(result.is_err());
    assert_eq!(ctx.store().get_state(), before);
    Ok(())
}

#[tokio::test]
async fn test_builtin_category_cannot_be_deleted() -> Result<()> {
    let client = MockClient::new();
    let store = StoreFixture::logged_in().with_default_categories(&[]).build();
    let ctx = test_context(store, &client)?;

    let result = CategoryActions::new(&ctx)
        .delete_category(&channels_id())
        .await;

    assert!(matches!(
        result,
        Err(ActionError::Domain(DomainError::CannotDeleteCategory(_)))
    ));
    assert_eq!(client.call_count("delete_channel_category"), 0);
    Ok(())
}

// ============================================================================
// Loading
// ============================================================================

#[tokio::test]
async fn test_fetch_my_categories() -> Result<()> {
    let client = MockClient::new();
    let categories = default_categories(TEAM_ID);
    let order: Vec<String> = categories.iter().rev().map(|c| c.id.clone()).collect();
    client.set_categories(OrderedChannelCategories {
        categories,
        order: order.clone(),
    });
    let ctx = test_context(StoreFixture::logged_in().build(), &client)?;

    let fetched = CategoryActions::new(&ctx)
        .fetch_my_categories(TEAM_ID)
        .await?;

    let fetched_order: Vec<String> = fetched.iter().map(|c| c.id.clone()).collect();
    assert_eq!(fetched_order, order);
    assert!(ctx.store().select(|s| s.categories.is_loaded(TEAM_ID)));
    Ok(())
}

#[tokio::test]
async fn test_direct_channel_goes_to_direct_messages_once() -> Result<()> {
    let client = MockClient::new();
    let store = StoreFixture::logged_in().with_default_categories(&[]).build();
    let ctx = test_context(store, &client)?;
    let actions = CategoryActions::new(&ctx);
    let dm = Channel::new("dm1", "", ChannelType::Direct);

    actions.add_channel_to_initial_category(&dm, false).await?;
    actions.add_channel_to_initial_category(&dm, false).await?;

    assert_eq!(
        ctx.store()
            .select(|s| channel_ids(s, &format!("direct_messages_{TEAM_ID}"))),
        vec!["dm1"]
    );
    assert!(client.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_new_channel_goes_to_channels() -> Result<()> {
    let client = MockClient::new();
    let store = StoreFixture::logged_in().with_default_categories(&["old"]).build();
    let ctx = test_context(store, &client)?;
    let channel = Channel::new("new", TEAM_ID, ChannelType::Open);

    CategoryActions::new(&ctx)
        .add_channel_to_initial_category(&channel, true)
        .await?;

    assert_eq!(
        ctx.store().select(|s| channel_ids(s, &channels_id())),
        vec!["new", "old"]
    );
    assert_eq!(client.call_count("update_channel_categories"), 1);
    Ok(())
}
