//! Store actions - the closed set of named state transitions
//!
//! Every write to the store is one of these variants. Actions submitted
//! together in a batch become visible together.

use serde::{Deserialize, Serialize};

use crate::entities::{
    Channel, ChannelCategory, ChannelMembership, ChannelStats, Post, PostList, Preference,
    Reaction, TeamMembership, UserStatus,
};

/// All state transitions the store understands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    // =========================================================================
    // Post Actions
    // =========================================================================
    ReceivedPost(PostData),
    ReceivedNewPost(NewPostData),
    ReceivedPosts(PostListData),
    ReceivedPostsInChannel(PostsInChannelData),
    ReceivedPostsBefore(PostsBeforeData),
    ReceivedPostsAfter(PostsAfterData),
    ReceivedPostsSince(PostsSinceData),
    ReceivedPostsInThread(PostsInThreadData),
    PostDeleted(PostData),
    PostRemoved(PostData),

    // =========================================================================
    // Reaction Actions
    // =========================================================================
    ReceivedReaction(ReactionData),
    ReceivedReactions(ReactionsData),
    ReactionDeleted(ReactionData),

    // =========================================================================
    // Channel Actions
    // =========================================================================
    ReceivedChannel(ChannelData),
    ReceivedMyChannelMember(ChannelMemberData),
    ChannelMemberRemoved(ChannelIdData),
    LeaveChannel(ChannelData),
    ReceivedChannelStats(ChannelStatsData),
    IncrementPinnedPostCount(ChannelIdData),
    DecrementPinnedPostCount(ChannelIdData),
    DecrementUnreadMsgCount(UnreadCountData),
    DecrementUnreadMentionCount(UnreadCountData),
    PostUnreadSuccess(PostUnreadData),

    // =========================================================================
    // Team Actions
    // =========================================================================
    ReceivedTeamMember(TeamMemberData),
    SelectTeam(TeamIdData),

    // =========================================================================
    // Category Actions
    // =========================================================================
    ReceivedCategories(CategoriesData),
    ReceivedCategoryOrder(CategoryOrderData),
    CategoryDeleted(CategoryIdData),
    RestoreCategories(CategoryOrderSnapshot),

    // =========================================================================
    // Preference Actions
    // =========================================================================
    ReceivedPreferences(PreferencesData),
    DeletedPreferences(PreferencesData),

    // =========================================================================
    // User Actions
    // =========================================================================
    ReceivedStatuses(StatusesData),
    SetCurrentUser(UserIdData),
    LogoutSuccess,
}

impl Action {
    /// Get the action type name
    pub fn action_type(&self) -> &'static str {
        match self {
            Self::ReceivedPost(_) => "RECEIVED_POST",
            Self::ReceivedNewPost(_) => "RECEIVED_NEW_POST",
            Self::ReceivedPosts(_) => "RECEIVED_POSTS",
            Self::ReceivedPostsInChannel(_) => "RECEIVED_POSTS_IN_CHANNEL",
            Self::ReceivedPostsBefore(_) => "RECEIVED_POSTS_BEFORE",
            Self::ReceivedPostsAfter(_) => "RECEIVED_POSTS_AFTER",
            Self::ReceivedPostsSince(_) => "RECEIVED_POSTS_SINCE",
            Self::ReceivedPostsInThread(_) => "RECEIVED_POSTS_IN_THREAD",
            Self::PostDeleted(_) => "POST_DELETED",
            Self::PostRemoved(_) => "POST_REMOVED",
            Self::ReceivedReaction(_) => "RECEIVED_REACTION",
            Self::ReceivedReactions(_) => "RECEIVED_REACTIONS",
            Self::ReactionDeleted(_) => "REACTION_DELETED",
            Self::ReceivedChannel(_) => "RECEIVED_CHANNEL",
            Self::ReceivedMyChannelMember(_) => "RECEIVED_MY_CHANNEL_MEMBER",
            Self::ChannelMemberRemoved(_) => "CHANNEL_MEMBER_REMOVED",
            Self::LeaveChannel(_) => "LEAVE_CHANNEL",
            Self::ReceivedChannelStats(_) => "RECEIVED_CHANNEL_STATS",
            Self::IncrementPinnedPostCount(_) => "INCREMENT_PINNED_POST_COUNT",
            Self::DecrementPinnedPostCount(_) => "DECREMENT_PINNED_POST_COUNT",
            Self::DecrementUnreadMsgCount(_) => "DECREMENT_UNREAD_MSG_COUNT",
            Self::DecrementUnreadMentionCount(_) => "DECREMENT_UNREAD_MENTION_COUNT",
            Self::PostUnreadSuccess(_) => "POST_UNREAD_SUCCESS",
            Self::ReceivedTeamMember(_) => "RECEIVED_TEAM_MEMBER",
            Self::SelectTeam(_) => "SELECT_TEAM",
            Self::ReceivedCategories(_) => "RECEIVED_CATEGORIES",
            Self::ReceivedCategoryOrder(_) => "RECEIVED_CATEGORY_ORDER",
            Self::CategoryDeleted(_) => "CATEGORY_DELETED",
            Self::RestoreCategories(_) => "RESTORE_CATEGORIES",
            Self::ReceivedPreferences(_) => "RECEIVED_PREFERENCES",
            Self::DeletedPreferences(_) => "DELETED_PREFERENCES",
            Self::ReceivedStatuses(_) => "RECEIVED_STATUSES",
            Self::SetCurrentUser(_) => "SET_CURRENT_USER",
            Self::LogoutSuccess => "LOGOUT_SUCCESS",
        }
    }

    // Shorthand constructors for the common variants

    pub fn received_post(post: Post) -> Self {
        Self::ReceivedPost(PostData { post })
    }

    pub fn received_posts(posts: PostList) -> Self {
        Self::ReceivedPosts(PostListData { posts })
    }

    pub fn post_deleted(post: Post) -> Self {
        Self::PostDeleted(PostData { post })
    }

    pub fn post_removed(post: Post) -> Self {
        Self::PostRemoved(PostData { post })
    }

    pub fn received_channel(channel: Channel) -> Self {
        Self::ReceivedChannel(ChannelData { channel })
    }

    pub fn received_my_channel_member(member: ChannelMembership) -> Self {
        Self::ReceivedMyChannelMember(ChannelMemberData { member })
    }

    pub fn received_categories(categories: Vec<ChannelCategory>) -> Self {
        Self::ReceivedCategories(CategoriesData { categories })
    }

    pub fn received_preferences(preferences: Vec<Preference>) -> Self {
        Self::ReceivedPreferences(PreferencesData { preferences })
    }

    pub fn deleted_preferences(preferences: Vec<Preference>) -> Self {
        Self::DeletedPreferences(PreferencesData { preferences })
    }
}

// ============================================================================
// Action Payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostData {
    pub post: Post,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPostData {
    pub post: Post,
    /// Replies stay out of channel order when collapsed threads are on
    #[serde(default)]
    pub collapsed_threads: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostListData {
    pub posts: PostList,
}

/// A page fetched without an anchor post (first page, unread page, or an around page)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostsInChannelData {
    pub channel_id: String,
    pub posts: PostList,
    pub recent: bool,
    pub oldest: bool,
}

/// A page of posts older than `before_post_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostsBeforeData {
    pub channel_id: String,
    pub posts: PostList,
    pub before_post_id: String,
    pub oldest: bool,
}

/// A page of posts newer than `after_post_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostsAfterData {
    pub channel_id: String,
    pub posts: PostList,
    pub after_post_id: String,
    pub recent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostsSinceData {
    pub channel_id: String,
    pub posts: PostList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostsInThreadData {
    pub root_id: String,
    pub posts: PostList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionData {
    pub reaction: Reaction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionsData {
    pub post_id: String,
    pub reactions: Vec<Reaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelData {
    pub channel: Channel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMemberData {
    pub member: ChannelMembership,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelIdData {
    pub channel_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStatsData {
    pub stats: ChannelStats,
}

/// Moves `amount` from unread to read for a channel and its team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnreadCountData {
    /// Empty for direct and group channels
    pub team_id: String,
    pub channel_id: String,
    pub amount: i64,
}

/// A channel was marked unread from a post onwards
///
/// The counts replace the member's; the deltas are applied to the team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostUnreadData {
    pub team_id: String,
    pub channel_id: String,
    pub msg_count: i64,
    pub mention_count: i64,
    pub last_viewed_at: i64,
    /// Messages that became unread
    pub delta_msgs: i64,
    /// Mentions that became unread
    pub delta_mentions: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMemberData {
    pub member: TeamMembership,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamIdData {
    pub team_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoriesData {
    pub categories: Vec<ChannelCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryOrderData {
    pub team_id: String,
    pub order: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryIdData {
    pub category_id: String,
}

/// Every category of a team plus their order, replaced wholesale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryOrderSnapshot {
    pub team_id: String,
    pub categories: Vec<ChannelCategory>,
    /// `None` while the team's categories have never been loaded
    pub order: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferencesData {
    pub preferences: Vec<Preference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusesData {
    pub statuses: Vec<UserStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdData {
    pub user_id: String,
}
