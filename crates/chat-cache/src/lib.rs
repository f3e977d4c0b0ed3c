//! # chat-cache
//!
//! Normalized client store for the chat data layer.
//!
//! ## Features
//!
//! - **Post Ordering Cache**: per-channel blocks of contiguous post ids,
//!   merged as pages arrive, plus the thread and reply-count indexes
//! - **Categories**: sidebar categories and their order per team
//! - **Channels and Teams**: memberships, read counts and channel stats
//! - **Store**: a shared handle whose batched writes land atomically
//!
//! ## Example
//!
//! ```ignore
//! use chat_cache::Store;
//! use chat_core::Action;
//!
//! let store = Store::shared();
//! store.batch(vec![
//!     Action::received_post(post),
//!     Action::received_channel(channel),
//! ]);
//!
//! let loaded = store.select(|state| state.posts.is_channel_loaded("channel-id"));
//! ```

pub mod categories;
pub mod channels;
pub mod posts;
pub mod preferences;
pub mod store;
pub mod users;

pub use categories::CategoriesState;
pub use channels::{ChannelsState, TeamsState};
pub use posts::{combine_around, PostAnchor, PostsState};
pub use preferences::PreferencesState;
pub use store::{SharedStore, Store, StoreState};
pub use users::UsersState;
