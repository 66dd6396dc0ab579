use super::AuthError;
use serde_json::Value;

/// Request body shape checks. Failures are `AuthError::Validation` naming the
/// first violated constraint.
pub trait PayloadValidator: Send + Sync {
    fn validate_post_authentication_payload(&self, payload: &Value) -> Result<(), AuthError>;
    fn validate_put_authentication_payload(&self, payload: &Value) -> Result<(), AuthError>;
    fn validate_delete_authentication_payload(&self, payload: &Value) -> Result<(), AuthError>;
}
