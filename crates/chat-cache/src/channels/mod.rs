//! Channel and team slices.
//!
//! Holds the channels the user can see, the user's own memberships with
//! their read counts, per-channel stats and the team aggregates.

mod state;
mod teams;

pub use state::ChannelsState;
pub use teams::TeamsState;
