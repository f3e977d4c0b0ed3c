//! # chat-service
//!
//! Action layer: the operations a client performs against the server and
//! the store, plus the validated request DTOs they accept.

pub mod dto;
pub mod services;

pub use services::{
    ActionContext, ActionContextBuilder, ActionError, ActionResult, CategoryActions,
    ChannelActions, Placement, PostActions, StatusBatcher,
};
