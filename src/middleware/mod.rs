pub mod auth;
pub mod response;

pub use auth::{require_credential, require_owner};
pub use response::{ApiResponse, ApiResult};
