//! Sidebar categories slice.
//!
//! Categories are keyed by id; each team keeps its own category order.

mod state;

pub use state::CategoriesState;
