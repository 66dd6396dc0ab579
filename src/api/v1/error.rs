use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use crate::logger::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use warp::filters::body::BodyDeserializeError;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let (code, message) = if let Some(failure) = err.find::<ApiFailure>() {
        (failure.code, failure.message.clone())
    } else if let Some(e) = err.find::<BodyDeserializeError>() {
        (ApiErrorCode::InvalidPayload, e.to_string())
    } else if let Some(e) = err.find::<reject::PayloadTooLarge>() {
        (ApiErrorCode::InvalidPayload, e.to_string())
    } else if let Some(e) = err.find::<reject::LengthRequired>() {
        (ApiErrorCode::InvalidPayload, e.to_string())
    } else if let Some(e) = err.find::<reject::UnsupportedMediaType>() {
        (ApiErrorCode::InvalidPayload, e.to_string())
    } else if err.is_not_found() {
        (ApiErrorCode::NotFound, ApiErrorCode::NotFound.to_string())
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        (
            ApiErrorCode::MethodNotAllowed,
            ApiErrorCode::MethodNotAllowed.to_string(),
        )
    } else {
        error!("Unhandled rejection: {:?}", err);
        (
            ApiErrorCode::InternalError,
            ApiErrorCode::InternalError.to_string(),
        )
    };

    let json = warp::reply::json(&ApiResponse::<()>::err(code, message));
    Ok(warp::reply::with_status(json, code.status()))
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum ApiErrorCode {
    #[error("Invalid request payload")]
    InvalidPayload,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Refresh token is not valid")]
    InvalidRefreshToken,
    #[error("Token is not valid")]
    InvalidToken,
    #[error("Resource not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::InvalidPayload => StatusCode::BAD_REQUEST,
            ApiErrorCode::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiErrorCode::InvalidRefreshToken => StatusCode::BAD_REQUEST,
            ApiErrorCode::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A rejection carrying the code and the message shown to the client.
#[derive(Debug)]
pub struct ApiFailure {
    pub code: ApiErrorCode,
    pub message: String,
}

impl ApiFailure {
    pub fn new(code: ApiErrorCode) -> Self {
        ApiFailure {
            code,
            message: code.to_string(),
        }
    }

    /// Log the detail; the client only sees the generic message.
    pub fn internal<E: std::fmt::Display>(error: E) -> Self {
        error!("Internal error: {}", error);
        ApiFailure::new(ApiErrorCode::InternalError)
    }
}

impl reject::Reject for ApiFailure {}

impl From<AuthError> for ApiFailure {
    fn from(error: AuthError) -> Self {
        if !error.is_client_fault() {
            return ApiFailure::internal(error);
        }
        match error {
            AuthError::Validation(message) => ApiFailure {
                code: ApiErrorCode::InvalidPayload,
                message,
            },
            AuthError::InvalidCredentials => ApiFailure::new(ApiErrorCode::InvalidCredentials),
            // Unknown, revoked, forged and expired refresh tokens look alike to clients.
            _ => ApiFailure::new(ApiErrorCode::InvalidRefreshToken),
        }
    }
}
