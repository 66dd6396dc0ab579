use super::error::*;
use crate::application_port::*;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {}

pub async fn login(
    body: Value,
    authentication_service: Arc<dyn AuthenticationService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let tokens = authentication_service
        .login(&body)
        .await
        .map_err(ApiFailure::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::with_status(
        warp::reply::json(&ApiResponse::ok(tokens)),
        StatusCode::CREATED,
    ))
}

pub async fn refresh(
    body: Value,
    authentication_service: Arc<dyn AuthenticationService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let refreshed = authentication_service
        .refresh(&body)
        .await
        .map_err(ApiFailure::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(refreshed)))
}

pub async fn logout(
    body: Value,
    authentication_service: Arc<dyn AuthenticationService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    authentication_service
        .logout(&body)
        .await
        .map_err(ApiFailure::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(LogoutResponse {})))
}
