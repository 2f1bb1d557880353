//! Shared types for the storefront client: wire models, request payloads,
//! form validation and the API error type.

pub mod error;
pub mod models;
pub mod protocol;
pub mod validation;

pub use error::*;
pub use models::*;
pub use protocol::*;
pub use validation::*;
