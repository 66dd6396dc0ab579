use super::error::*;
use super::handler;
use crate::application_port::TokenManager;
use crate::domain_model::{AccessToken, SubjectId};
use crate::server::*;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, http, reject};

const MAX_BODY_BYTES: u64 = 16 * 1024;

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let authentications = warp::path("authentications").and(warp::path::end());

    let login = warp::post()
        .and(authentications)
        .and(json_body())
        .and(with(server.authentication_service.clone()))
        .and_then(handler::login);

    let refresh = warp::put()
        .and(authentications)
        .and(json_body())
        .and(with(server.authentication_service.clone()))
        .and_then(handler::refresh);

    let logout = warp::delete()
        .and(authentications)
        .and(json_body())
        .and(with(server.authentication_service.clone()))
        .and_then(handler::logout);

    login.or(refresh).or(logout)
}

fn json_body() -> impl Filter<Extract = (serde_json::Value,), Error = warp::Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

/// Resolve `Authorization: Bearer <access token>` to its subject. Only the
/// signature and expiry are checked; access tokens are never looked up in a store.
pub fn with_verification(
    token_manager: Arc<dyn TokenManager>,
) -> impl Filter<Extract = (SubjectId,), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>(http::header::AUTHORIZATION.as_ref()).and_then(
        move |header: Option<String>| {
            let token_manager = token_manager.clone();
            async move {
                let token = header
                    .as_deref()
                    .and_then(|h| h.strip_prefix("Bearer "))
                    .ok_or_else(|| reject::custom(ApiFailure::new(ApiErrorCode::InvalidToken)))?;
                let verified = token_manager
                    .verify_access_token(&AccessToken(token.to_string()))
                    .map_err(|_| reject::custom(ApiFailure::new(ApiErrorCode::InvalidToken)))?;
                Ok::<_, warp::Rejection>(verified.id)
            }
        },
    )
}
