use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse},
        jwt::JwtKeys,
    },
    error::{ApiError, ApiResult},
    extract::JsonBody,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<LoginResponse>> {
    let payload = body
        .as_ref()
        .map(LoginRequest::from_json)
        .unwrap_or_default();

    // Kept for compatibility with existing clients: login has always
    // rejected an email without '@', even though email plays no part in it.
    if !payload.email.as_deref().is_some_and(|e| e.contains('@')) {
        warn!("login with invalid email");
        return Err(ApiError::BadRequest("not a valid email".into()));
    }

    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let Some(identity) = state.credentials.verify(&username, &password).await? else {
        warn!(%username, "login bad username/password");
        return Err(ApiError::Unauthorized("Bad username/password".into()));
    };

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(&identity)?;

    info!(%identity, "user logged in");
    Ok(Json(LoginResponse { access_token }))
}
