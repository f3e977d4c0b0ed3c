//! # chat-api
//!
//! REST client for the chat server, implementing the collaborator traits
//! the action layer depends on.

pub mod client;
mod response;
pub mod routes;

pub use client::{ClientBuildError, RestClient};
pub use routes::Routes;
