use crate::application_port::{AuthError, PayloadValidator};
use serde_json::{Map, Value};

const POST_AUTHENTICATION_FIELDS: &[&str] = &["username", "password"];
const REFRESH_TOKEN_FIELDS: &[&str] = &["refreshToken"];

/// Checks that a JSON body is an object holding exactly the expected
/// non-empty string fields.
#[derive(Debug, Default)]
pub struct JsonPayloadValidator;

impl JsonPayloadValidator {
    pub fn new() -> Self {
        Self
    }

    fn validate_object(payload: &Value, fields: &[&str]) -> Result<(), AuthError> {
        let object = payload
            .as_object()
            .ok_or_else(|| AuthError::Validation("payload must be an object".to_string()))?;

        for field in fields {
            Self::validate_string(object, field)?;
        }

        if let Some(unknown) = object.keys().find(|k| !fields.contains(&k.as_str())) {
            return Err(AuthError::Validation(format!(
                "\"{}\" is not allowed",
                unknown
            )));
        }

        Ok(())
    }

    fn validate_string(object: &Map<String, Value>, field: &str) -> Result<(), AuthError> {
        match object.get(field) {
            None | Some(Value::Null) => Err(AuthError::Validation(format!(
                "\"{}\" is required",
                field
            ))),
            Some(Value::String(s)) if s.is_empty() => Err(AuthError::Validation(format!(
                "\"{}\" is not allowed to be empty",
                field
            ))),
            Some(Value::String(_)) => Ok(()),
            Some(_) => Err(AuthError::Validation(format!(
                "\"{}\" must be a string",
                field
            ))),
        }
    }
}

impl PayloadValidator for JsonPayloadValidator {
    fn validate_post_authentication_payload(&self, payload: &Value) -> Result<(), AuthError> {
        Self::validate_object(payload, POST_AUTHENTICATION_FIELDS)
    }

    fn validate_put_authentication_payload(&self, payload: &Value) -> Result<(), AuthError> {
        Self::validate_object(payload, REFRESH_TOKEN_FIELDS)
    }

    fn validate_delete_authentication_payload(&self, payload: &Value) -> Result<(), AuthError> {
        Self::validate_object(payload, REFRESH_TOKEN_FIELDS)
    }
}
