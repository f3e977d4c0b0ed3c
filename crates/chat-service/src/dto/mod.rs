//! Data transfer objects for action inputs
//!
//! Request DTOs are validated before any state is touched.

pub mod requests;

pub use requests::{
    CreateCategoryRequest, CreatePostRequest, EditPostRequest, RenameCategoryRequest,
    MAX_CATEGORY_NAME_LENGTH, MAX_POST_MESSAGE_LENGTH,
};
