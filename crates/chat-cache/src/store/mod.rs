//! The normalized client store.
//!
//! `StoreState` is the whole state tree; `Store` is the shared handle that
//! serializes writes and makes each batch of actions visible at once.

mod handle;
mod state;

pub use handle::{SharedStore, Store};
pub use state::StoreState;
