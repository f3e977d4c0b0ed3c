//! Channel action tests
//!
//! Run with: cargo test -p integration-tests --test channel_tests

use anyhow::Result;
use chat_core::events::TeamMemberData;
use chat_core::{
    Action, Channel, ChannelCategory, ChannelMembership, ChannelStats, ChannelType, CategoryType,
    PostList, TeamMembership,
};
use chat_service::{ActionError, CategoryActions, ChannelActions};
use integration_tests::{root_posts, test_context, MockClient, StoreFixture, TEAM_ID, USER_ID};

fn channels_id() -> String {
    format!("channels_{TEAM_ID}")
}

// ============================================================================
// Read state
// ============================================================================

#[tokio::test]
async fn test_mark_channel_as_read_updates_team_counts() -> Result<()> {
    let client = MockClient::new();
    let mut channel = Channel::new("town", TEAM_ID, ChannelType::Open);
    channel.total_msg_count = 10;
    let mut member = ChannelMembership::new("town", USER_ID);
    member.msg_count = 5;
    member.mention_count = 2;
    let mut team_member = TeamMembership::new(TEAM_ID, USER_ID);
    team_member.msg_count = 5;
    team_member.mention_count = 2;
    let store = StoreFixture::logged_in()
        .with_channel_entity(channel, member)
        .with_action(Action::ReceivedTeamMember(TeamMemberData {
            member: team_member,
        }))
        .build();
    let ctx = test_context(store, &client)?;

    ChannelActions::new(&ctx).mark_channel_as_read("town")?;

    ctx.store().select(|s| {
        let member = s.channels.my_member("town").cloned().unwrap_or_default();
        assert_eq!(member.msg_count, 10);
        assert_eq!(member.mention_count, 0);
        assert_eq!(s.channels.unread_count("town"), 0);

        let team = s.teams.my_member(TEAM_ID).cloned().unwrap_or_default();
        assert_eq!(team.msg_count, 0);
        assert_eq!(team.mention_count, 0);
    });
    assert!(client.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_mark_read_channel_is_a_no_op() -> Result<()> {
    let client = MockClient::new();
    let store = StoreFixture::logged_in().with_channel("town").build();
    let ctx = test_context(store, &client)?;
    let before = ctx.store().get_state();

    ChannelActions::new(&ctx).mark_channel_as_read("town")?;

    assert_eq!(ctx.store().get_state(), before);
    Ok(())
}

#[tokio::test]
async fn test_mark_unknown_channel_as_read() -> Result<()> {
    let client = MockClient::new();
    let ctx = test_context(StoreFixture::logged_in().build(), &client)?;

    let result = ChannelActions::new(&ctx).mark_channel_as_read("missing");

    assert!(matches!(result, Err(ActionError::Domain(_))));
    Ok(())
}

// ============================================================================
// Membership
// ============================================================================

#[tokio::test]
async fn test_leave_channel_purges_channel_data() -> Result<()> {
    let client = MockClient::new();
    let posts = root_posts("town", 2);
    let store = StoreFixture::logged_in()
        .with_channel_entity(
            Channel::new("town", TEAM_ID, ChannelType::Private),
            ChannelMembership::new("town", USER_ID),
        )
        .with_channel("other")
        .with_default_categories(&["town", "other"])
        .with_action(Action::received_posts(PostList::from_posts(posts.clone())))
        .build();
    let ctx = test_context(store, &client)?;

    ChannelActions::new(&ctx).leave_channel("town").await?;

    ctx.store().select(|s| {
        assert!(s.channels.my_member("town").is_none());
        assert!(s.channels.channel("town").is_none());
        assert_eq!(
            s.categories
                .category(&channels_id())
                .map(|c| c.channel_ids.clone())
                .unwrap_or_default(),
            vec!["other"]
        );
        assert!(posts.iter().all(|p| s.posts.post(&p.id).is_none()));
    });
    assert_eq!(client.call_count("remove_from_channel"), 1);
    Ok(())
}

#[tokio::test]
async fn test_failed_leave_restores_exact_state() -> Result<()> {
    let client = MockClient::new();
    client.fail_with_status("remove_from_channel", 403);
    let store = StoreFixture::logged_in()
        .with_channel("town")
        .with_default_categories(&["other", "town"])
        .with_category(
            ChannelCategory::new("work", TEAM_ID, CategoryType::Custom, "Work")
                .with_channels(["a"]),
        )
        .build();
    let ctx = test_context(store, &client)?;
    let before = ctx.store().get_state();

    let result = ChannelActions::new(&ctx).leave_channel("town").await;

    assert!(matches!(result, Err(ActionError::Api(ref e)) if e.status_code == 403));
    assert_eq!(ctx.store().get_state(), before);
    Ok(())
}

#[tokio::test]
async fn test_join_channel_lands_in_channels_category() -> Result<()> {
    let client = MockClient::new();
    client.set_channel(Channel::new("new", TEAM_ID, ChannelType::Open));
    let store = StoreFixture::logged_in()
        .with_default_categories(&["old"])
        .build();
    let ctx = test_context(store, &client)?;

    ChannelActions::new(&ctx).join_channel("new").await?;

    ctx.store().select(|s| {
        assert!(s.channels.my_member("new").is_some());
        assert_eq!(
            s.categories
                .category(&channels_id())
                .map(|c| c.channel_ids.clone())
                .unwrap_or_default(),
            vec!["new", "old"]
        );
    });
    assert!(!CategoryActions::new(&ctx).is_favorite_channel("new"));
    assert_eq!(client.call_count("update_channel_categories"), 0);
    Ok(())
}

#[tokio::test]
async fn test_join_missing_channel_fails() -> Result<()> {
    let client = MockClient::new();
    let ctx = test_context(StoreFixture::logged_in().build(), &client)?;

    let result = ChannelActions::new(&ctx).join_channel("missing").await;

    assert!(matches!(result, Err(ActionError::Api(ref e)) if e.status_code == 404));
    assert!(ctx.store().select(|s| s.channels.channel("missing").is_none()));
    Ok(())
}

// ============================================================================
// Stats
// ============================================================================

#[tokio::test]
async fn test_get_channel_stats() -> Result<()> {
    let client = MockClient::new();
    let mut stats = ChannelStats::new("town");
    stats.member_count = 12;
    stats.pinnedpost_count = 3;
    client.set_stats(stats.clone());
    let ctx = test_context(StoreFixture::logged_in().with_channel("town").build(), &client)?;

    let fetched = ChannelActions::new(&ctx).get_channel_stats("town").await?;

    assert_eq!(fetched, stats);
    assert_eq!(
        ctx.store().select(|s| s.channels.stats("town").cloned()),
        Some(stats)
    );
    Ok(())
}
