//! Block merging for per-channel post order
//!
//! Orders are newest first. Ids compare by the `create_at` of their post,
//! ties broken by id descending; ids without a stored post sort last.

use std::cmp::Ordering;
use std::collections::HashMap;

use chat_core::{Post, PostList, PostOrderBlock};

/// Compare two post ids newest first
pub fn cmp_post_ids(posts: &HashMap<String, Post>, a: &str, b: &str) -> Ordering {
    let a_at = posts.get(a).map_or(i64::MIN, |p| p.create_at);
    let b_at = posts.get(b).map_or(i64::MIN, |p| p.create_at);
    b_at.cmp(&a_at).then_with(|| b.cmp(a))
}

/// Sort an order newest first and drop duplicate ids
pub fn sort_order(order: &mut Vec<String>, posts: &HashMap<String, Post>) {
    order.sort_by(|a, b| cmp_post_ids(posts, a, b));
    order.dedup();
}

/// Union of two orders, newest first, without duplicates
pub fn merge_post_order(left: &[String], right: &[String], posts: &HashMap<String, Post>) -> Vec<String> {
    let mut order = Vec::with_capacity(left.len() + right.len());
    order.extend_from_slice(left);
    order.extend_from_slice(right);
    sort_order(&mut order, posts);
    order
}

/// Drop empty blocks unless they mark the present
pub fn remove_non_recent_empty_blocks(blocks: &mut Vec<PostOrderBlock>) {
    blocks.retain(|block| block.recent || !block.order.is_empty());
}

/// `newer` (sorted ahead of `older`) reaches at least as far back as `older` starts
fn overlaps(newer: &PostOrderBlock, older: &PostOrderBlock, posts: &HashMap<String, Post>) -> bool {
    match (newer.order.last(), older.order.first()) {
        (Some(newer_end), Some(older_start)) => {
            cmp_post_ids(posts, newer_end, older_start) != Ordering::Less
        }
        _ => false,
    }
}

/// Coalesce overlapping blocks of one channel
///
/// Every block comes out sorted. Blocks whose ranges overlap (sharing an id or
/// interleaving in time) are replaced by one block holding the union of their
/// ids, with `recent` and `oldest` OR-ed together. Disjoint blocks are kept
/// as they are, newest first. Empty blocks survive only when `recent`.
pub fn merge_post_blocks(
    blocks: Vec<PostOrderBlock>,
    posts: &HashMap<String, Post>,
) -> Vec<PostOrderBlock> {
    let mut blocks = blocks;
    remove_non_recent_empty_blocks(&mut blocks);
    for block in &mut blocks {
        sort_order(&mut block.order, posts);
    }

    // Empty recent blocks first, then by newest post
    blocks.sort_by(|a, b| match (a.order.first(), b.order.first()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => cmp_post_ids(posts, x, y),
    });

    let mut merged: Vec<PostOrderBlock> = Vec::with_capacity(blocks.len());
    for block in blocks {
        if let Some(last) = merged.last_mut() {
            if overlaps(last, &block, posts) {
                last.order = merge_post_order(&last.order, &block.order, posts);
                last.recent |= block.recent;
                last.oldest |= block.oldest;
                continue;
            }
        }
        merged.push(block);
    }

    merged
}

/// Build the page for a jump to `post_id` from three fetches made in parallel
///
/// The order is the newer page, the anchor, then the older page. Posts of the
/// anchor's thread are kept in the map but not placed in the order.
pub fn combine_around(after: PostList, thread: PostList, before: PostList, post_id: &str) -> PostList {
    let mut order = Vec::with_capacity(after.order.len() + before.order.len() + 1);
    for id in after
        .order
        .into_iter()
        .chain(std::iter::once(post_id.to_string()))
        .chain(before.order)
    {
        if !order.contains(&id) {
            order.push(id);
        }
    }

    let mut posts = after.posts;
    posts.extend(thread.posts);
    posts.extend(before.posts);

    PostList {
        order,
        posts,
        next_post_id: after.next_post_id,
        prev_post_id: before.prev_post_id,
    }
}
