// SPDX-License-Identifier: Apache-2.0

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use tracing::info;

use tipple_api::{
    params, ApiError, AuthStatusView, CocktailDetailView, CocktailSummaryView, IngredientView,
    LikeCountView, ReviewView, UserProfileView, UserView,
};
use tipple_model::User;
use tipple_store::{catalog, reviews, social, users};

use super::{
    clear_session_cookie, finish, json_response, make_request_id, session_token,
    set_session_cookie, store_error, with_request_id,
};
use crate::state::AppState;

fn parse_body(body: &Bytes) -> Result<Value, ApiError> {
    serde_json::from_slice(body)
        .map_err(|_| ApiError::validation("body", "request body must be valid JSON"))
}

/// Resolve the session cookie to a live user or fail with the bare
/// unauthorized envelope. A session whose user row has vanished counts
/// as no session.
async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let token = session_token(headers).ok_or(ApiError::unauthorized())?;
    let user_id = state
        .sessions
        .resolve(&token)
        .await
        .ok_or(ApiError::unauthorized())?;
    let conn = state.conn.lock().await;
    users::get_user(&conn, user_id)
        .map_err(store_error)?
        .ok_or(ApiError::unauthorized())
}

pub(crate) async fn healthz(State(state): State<AppState>) -> Response {
    let request_id = make_request_id(&state);
    with_request_id(
        json_response(StatusCode::OK, &json!({"status": "ok"})),
        &request_id,
    )
}

pub(crate) async fn auth_status(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let request_id = make_request_id(&state);
    info!(request_id = %request_id, route = "/api/auth/status", "request start");
    let result = async {
        let user = match session_token(&headers) {
            Some(token) => match state.sessions.resolve(&token).await {
                Some(user_id) => {
                    let conn = state.conn.lock().await;
                    users::get_user(&conn, user_id).map_err(store_error)?
                }
                None => None,
            },
            None => None,
        };
        let view = AuthStatusView {
            is_authenticated: user.is_some(),
            user: user.as_ref().map(UserView::project),
        };
        Ok(json_response(StatusCode::OK, &view))
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn signup(State(state): State<AppState>, body: Bytes) -> Response {
    let request_id = make_request_id(&state);
    info!(request_id = %request_id, route = "/api/signup", "request start");
    let result = async {
        let params = params::parse_signup(&parse_body(&body)?)?;
        let user = {
            let conn = state.conn.lock().await;
            users::register(&conn, &params.username, &params.email, &params.password)
                .map_err(store_error)?
        };
        info!(request_id = %request_id, user_id = user.id, "user registered");
        let token = state.sessions.create(user.id).await;
        let mut response = json_response(StatusCode::CREATED, &UserView::project(&user));
        set_session_cookie(&mut response, &token, state.sessions.ttl());
        Ok(response)
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn login(State(state): State<AppState>, body: Bytes) -> Response {
    let request_id = make_request_id(&state);
    info!(request_id = %request_id, route = "/api/login", "request start");
    let result = async {
        let params = params::parse_login(&parse_body(&body)?)?;
        let user = {
            let conn = state.conn.lock().await;
            users::verify(&conn, &params.username, &params.password).map_err(store_error)?
        }
        .ok_or(ApiError::unauthorized())?;
        let token = state.sessions.create(user.id).await;
        let mut response = json_response(StatusCode::OK, &UserView::project(&user));
        set_session_cookie(&mut response, &token, state.sessions.ttl());
        Ok(response)
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let request_id = make_request_id(&state);
    info!(request_id = %request_id, route = "/api/logout", "request start");
    if let Some(token) = session_token(&headers) {
        state.sessions.revoke(&token).await;
    }
    let mut response = StatusCode::NO_CONTENT.into_response();
    clear_session_cookie(&mut response);
    with_request_id(response, &request_id)
}

pub(crate) async fn profile(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let request_id = make_request_id(&state);
    info!(request_id = %request_id, route = "/api/profile", "request start");
    let result = async {
        let user = require_user(&state, &headers).await?;
        let liked = {
            let conn = state.conn.lock().await;
            users::liked_cocktails(&conn, user.id).map_err(store_error)?
        };
        Ok(json_response(
            StatusCode::OK,
            &UserProfileView::project(&user, &liked),
        ))
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn list_cocktails(State(state): State<AppState>) -> Response {
    let request_id = make_request_id(&state);
    info!(request_id = %request_id, route = "/api/cocktails", "request start");
    let result = async {
        let conn = state.conn.lock().await;
        let rows = catalog::list_cocktails(&conn).map_err(store_error)?;
        let views = rows
            .iter()
            .map(CocktailSummaryView::project)
            .collect::<Vec<_>>();
        Ok(json_response(StatusCode::OK, &views))
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn list_ingredients(State(state): State<AppState>) -> Response {
    let request_id = make_request_id(&state);
    info!(request_id = %request_id, route = "/api/ingredients", "request start");
    let result = async {
        let conn = state.conn.lock().await;
        let rows = catalog::list_ingredients(&conn).map_err(store_error)?;
        let views = rows
            .iter()
            .map(|ingredient| IngredientView {
                id: ingredient.id,
                name: ingredient.name.as_str().to_string(),
            })
            .collect::<Vec<_>>();
        Ok(json_response(StatusCode::OK, &views))
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn get_ingredient(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let request_id = make_request_id(&state);
    info!(request_id = %request_id, route = "/api/ingredients/:id", ingredient_id = id, "request start");
    let result = async {
        let conn = state.conn.lock().await;
        let ingredient = catalog::get_ingredient(&conn, id).map_err(store_error)?;
        Ok(json_response(
            StatusCode::OK,
            &IngredientView {
                id: ingredient.id,
                name: ingredient.name.as_str().to_string(),
            },
        ))
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn create_cocktail(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = make_request_id(&state);
    info!(request_id = %request_id, route = "/api/cocktails", "request start");
    let result = async {
        require_user(&state, &headers).await?;
        let new = params::parse_new_cocktail(&parse_body(&body)?)?;
        let mut conn = state.conn.lock().await;
        let graph = catalog::create_cocktail(&mut conn, &new).map_err(store_error)?;
        Ok(json_response(
            StatusCode::CREATED,
            &CocktailDetailView::project(&graph),
        ))
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn get_cocktail(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let request_id = make_request_id(&state);
    info!(request_id = %request_id, route = "/api/cocktails/:id", cocktail_id = id, "request start");
    let result = async {
        let conn = state.conn.lock().await;
        let graph = catalog::get_cocktail(&conn, id).map_err(store_error)?;
        Ok(json_response(
            StatusCode::OK,
            &CocktailDetailView::project(&graph),
        ))
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn update_cocktail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = make_request_id(&state);
    info!(request_id = %request_id, route = "/api/cocktails/:id", cocktail_id = id, "request start");
    let result = async {
        require_user(&state, &headers).await?;
        let patch = params::parse_cocktail_patch(&parse_body(&body)?)?;
        let mut conn = state.conn.lock().await;
        let graph = catalog::update_cocktail(&mut conn, id, &patch).map_err(store_error)?;
        Ok(json_response(
            StatusCode::OK,
            &CocktailDetailView::project(&graph),
        ))
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn delete_cocktail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let request_id = make_request_id(&state);
    info!(request_id = %request_id, route = "/api/cocktails/:id", cocktail_id = id, "request start");
    let result = async {
        require_user(&state, &headers).await?;
        let conn = state.conn.lock().await;
        catalog::delete_cocktail(&conn, id).map_err(store_error)?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn like_cocktail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let request_id = make_request_id(&state);
    info!(request_id = %request_id, route = "/api/cocktails/:id/like", cocktail_id = id, "request start");
    let result = async {
        let user = require_user(&state, &headers).await?;
        let mut conn = state.conn.lock().await;
        let likes = social::like(&mut conn, id, user.id).map_err(store_error)?;
        Ok(json_response(StatusCode::OK, &LikeCountView { likes }))
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn unlike_cocktail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let request_id = make_request_id(&state);
    info!(request_id = %request_id, route = "/api/cocktails/:id/unlike", cocktail_id = id, "request start");
    let result = async {
        let user = require_user(&state, &headers).await?;
        let mut conn = state.conn.lock().await;
        let likes = social::unlike(&mut conn, id, user.id).map_err(store_error)?;
        Ok(json_response(StatusCode::OK, &LikeCountView { likes }))
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn list_reviews(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let request_id = make_request_id(&state);
    info!(request_id = %request_id, route = "/api/cocktails/:id/reviews", cocktail_id = id, "request start");
    let result = async {
        let conn = state.conn.lock().await;
        let rows = reviews::reviews_for_cocktail(&conn, id).map_err(store_error)?;
        let views = rows
            .iter()
            .map(|(review, author)| ReviewView::project(review, author))
            .collect::<Vec<_>>();
        Ok(json_response(StatusCode::OK, &views))
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn create_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = make_request_id(&state);
    info!(request_id = %request_id, route = "/api/cocktails/:id/reviews", cocktail_id = id, "request start");
    let result = async {
        let user = require_user(&state, &headers).await?;
        let new = params::parse_new_review(&parse_body(&body)?)?;
        let mut conn = state.conn.lock().await;
        let (review, author) =
            reviews::create_review(&mut conn, id, &user, &new.content, new.rating)
                .map_err(store_error)?;
        Ok(json_response(
            StatusCode::CREATED,
            &ReviewView::project(&review, &author),
        ))
    }
    .await;
    finish(result, &request_id)
}
