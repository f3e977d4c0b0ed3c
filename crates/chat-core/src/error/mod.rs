//! Error types shared by every layer

mod api_error;
mod domain_error;

pub use api_error::ApiError;
pub use domain_error::DomainError;
