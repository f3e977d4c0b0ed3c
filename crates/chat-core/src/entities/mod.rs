//! Domain entities - the normalized shapes kept in the store

mod category;
mod channel;
mod member;
mod post;
mod preference;
mod reaction;
mod status;

pub use category::{CategorySorting, CategoryType, ChannelCategory, OrderedChannelCategories};
pub use channel::{Channel, ChannelStats, ChannelType};
pub use member::{ChannelMembership, ChannelUnread, TeamMembership};
pub use post::{
    Post, PostList, PostMetadata, PostOrderBlock, PostState, POST_TYPE_COMBINED_USER_ACTIVITY,
};
pub use preference::{preference_key, Preference, CATEGORY_FAVORITE_CHANNEL};
pub use reaction::Reaction;
pub use status::{StatusKind, UserStatus};
