//! Post Ordering Cache
//!
//! Fetched pages are merged into per-channel blocks of contiguous post ids.
//! A flat map keyed by id holds the content; the thread index and the reply
//! counts are kept in step with it as posts arrive and leave.

mod merge;
mod selectors;
mod state;

pub use merge::{
    cmp_post_ids, combine_around, merge_post_blocks, merge_post_order,
    remove_non_recent_empty_blocks, sort_order,
};
pub use state::{PostAnchor, PostsState};
