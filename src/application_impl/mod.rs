mod auth_service_impl;
mod credential_verifier_fake;
mod credential_verifier_impl;
mod payload_validator_impl;
mod token_manager_jwt;

pub use auth_service_impl::*;
pub use credential_verifier_fake::*;
pub use credential_verifier_impl::*;
pub use payload_validator_impl::*;
pub use token_manager_jwt::*;
