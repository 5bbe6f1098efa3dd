// SPDX-License-Identifier: Apache-2.0
//! Router wiring and response plumbing shared by all handlers.

mod handlers;

use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tracing::error;

use tipple_api::{ApiError, ApiErrorCode};
use tipple_store::StoreError;

use crate::session::SESSION_COOKIE;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.max_body_bytes;
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/api/auth/status", get(handlers::auth_status))
        .route("/api/signup", post(handlers::signup))
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route("/api/profile", get(handlers::profile))
        .route("/api/ingredients", get(handlers::list_ingredients))
        .route("/api/ingredients/:id", get(handlers::get_ingredient))
        .route(
            "/api/cocktails",
            get(handlers::list_cocktails).post(handlers::create_cocktail),
        )
        .route(
            "/api/cocktails/:id",
            get(handlers::get_cocktail)
                .patch(handlers::update_cocktail)
                .delete(handlers::delete_cocktail),
        )
        .route("/api/cocktails/:id/like", post(handlers::like_cocktail))
        .route("/api/cocktails/:id/unlike", post(handlers::unlike_cocktail))
        .route(
            "/api/cocktails/:id/reviews",
            get(handlers::list_reviews).post(handlers::create_review),
        )
        .layer(DefaultBodyLimit::max(max_body))
        .with_state(state)
}

pub(crate) fn make_request_id(state: &AppState) -> String {
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

pub(crate) fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

pub(crate) fn json_response(status: StatusCode, body: &impl Serialize) -> Response {
    match serde_json::to_string(body) {
        Ok(json) => (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            json,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "response serialization failed");
            api_error_response(&ApiError::internal())
        }
    }
}

pub(crate) fn api_error_response(err: &ApiError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = serde_json::to_string(err)
        .unwrap_or_else(|_| format!("{{\"error\":\"{}\"}}", err.code.as_str()));
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// Resolve a handler result into the wire response, echoing the
/// request id either way.
pub(crate) fn finish(result: Result<Response, ApiError>, request_id: &str) -> Response {
    let response = match result {
        Ok(response) => response,
        Err(err) => {
            if err.code == ApiErrorCode::Internal {
                error!(request_id = %request_id, "request failed internally");
            }
            api_error_response(&err)
        }
    };
    with_request_id(response, request_id)
}

pub(crate) fn store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound(what) => ApiError::not_found(what),
        StoreError::Conflict(msg) => ApiError::conflict(msg),
        StoreError::Sql(msg) => {
            error!(error = %msg, "store failure");
            ApiError::internal()
        }
        _ => ApiError::internal(),
    }
}

pub(crate) fn session_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

pub(crate) fn set_session_cookie(response: &mut Response, token: &str, ttl: Duration) {
    let cookie = format!(
        "{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        ttl.as_secs()
    );
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
}

pub(crate) fn clear_session_cookie(response: &mut Response) {
    let cookie = format!("{SESSION_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0");
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
}
