//! Client actions
//!
//! Each action reads the store, talks to the server through the REST
//! collaborators and writes the outcome back. Sidebar mutations are applied
//! optimistically and rolled back on failure.

pub mod category;
pub mod channel;
pub mod context;
pub mod error;
pub mod post;
pub mod status;

// Re-export all actions for convenience
pub use category::{CategoryActions, Placement};
pub use channel::ChannelActions;
pub use context::{ActionContext, ActionContextBuilder};
pub use error::{ActionError, ActionResult};
pub use post::PostActions;
pub use status::StatusBatcher;
