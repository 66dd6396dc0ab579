mod auth_service;
mod credential_service;
mod payload_validator;
mod token_manager;

pub use auth_service::*;
pub use credential_service::*;
pub use payload_validator::*;
pub use token_manager::*;
