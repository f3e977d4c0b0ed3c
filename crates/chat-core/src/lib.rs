//! # chat-core
//!
//! Domain layer containing entities, store actions, error types and the
//! REST collaborator traits. This crate has no dependency on the store,
//! the HTTP client or the async runtime.

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;

// Re-export commonly used types at crate root
pub use entities::{
    preference_key, CategorySorting, CategoryType, Channel, ChannelCategory, ChannelMembership,
    ChannelStats, ChannelType, ChannelUnread, OrderedChannelCategories, Post, PostList,
    PostMetadata, PostOrderBlock, PostState, Preference, Reaction, StatusKind, TeamMembership,
    UserStatus, CATEGORY_FAVORITE_CHANNEL, POST_TYPE_COMBINED_USER_ACTIVITY,
};
pub use error::{ApiError, DomainError};
pub use events::Action;
pub use traits::{
    ApiResult, CategoryClient, ChannelClient, PostClient, PreferenceClient, StatusClient,
};
