//! Store actions

mod action;

pub use action::{
    Action, CategoriesData, CategoryIdData, CategoryOrderData, CategoryOrderSnapshot,
    ChannelData, ChannelIdData, ChannelMemberData, ChannelStatsData, NewPostData, PostData,
    PostListData, PostUnreadData, PostsAfterData, PostsBeforeData, PostsInChannelData,
    PostsInThreadData, PostsSinceData, PreferencesData, ReactionData, ReactionsData,
    StatusesData, TeamIdData, TeamMemberData, UnreadCountData, UserIdData,
};
