use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::{
    dto::{parse_new_ship, parse_ship_patch},
    repo::Ship,
};
use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ApiResult},
    extract::JsonBody,
    state::AppState,
};

pub fn ship_routes() -> Router<AppState> {
    Router::new()
        .route("/ships", get(list_ships).post(create_ship))
        .route(
            "/ships/:id",
            get(get_ship).put(update_ship).delete(delete_ship),
        )
}

/// Ship id from the path; only plain decimal digits match the route.
/// A number too large to be any id matches but names no ship.
#[derive(Debug, Clone, Copy)]
pub struct ShipId(pub u64);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ShipId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ApiError::route_not_found());
        }
        raw.parse()
            .map(ShipId)
            .map_err(|_| ApiError::ship_not_found())
    }
}

#[instrument(skip(state))]
pub async fn list_ships(State(state): State<AppState>) -> Json<Vec<Ship>> {
    Json(state.ships.list().await)
}

#[instrument(skip(state, body))]
pub async fn create_ship(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    JsonBody(body): JsonBody,
) -> ApiResult<(StatusCode, Json<Ship>)> {
    let body = match body {
        Some(v) if !is_blank(&v) => v,
        _ => return Err(ApiError::BadRequest("No input provided".into())),
    };
    let new = parse_new_ship(&body)?;
    let ship = state.ships.create(new).await;
    info!(ship_id = ship.id, %identity, "ship created");
    Ok((StatusCode::CREATED, Json(ship)))
}

#[instrument(skip(state))]
pub async fn get_ship(State(state): State<AppState>, ShipId(id): ShipId) -> ApiResult<Json<Ship>> {
    state
        .ships
        .get(id)
        .await
        .map(Json)
        .ok_or_else(ApiError::ship_not_found)
}

#[instrument(skip(state, body))]
pub async fn update_ship(
    State(state): State<AppState>,
    ShipId(id): ShipId,
    AuthUser(identity): AuthUser,
    body: Result<JsonBody, ApiError>,
) -> ApiResult<Json<Ship>> {
    if state.ships.get(id).await.is_none() {
        return Err(ApiError::ship_not_found());
    }
    let JsonBody(body) = body?;
    let body = match body {
        Some(v) if !is_blank(&v) => v,
        _ => json!({}),
    };
    let patch = parse_ship_patch(&body)?;
    let ship = state
        .ships
        .update(id, patch)
        .await
        .ok_or_else(ApiError::ship_not_found)?;
    info!(ship_id = ship.id, %identity, "ship updated");
    Ok(Json(ship))
}

#[instrument(skip(state))]
pub async fn delete_ship(
    State(state): State<AppState>,
    ShipId(id): ShipId,
    AuthUser(identity): AuthUser,
) -> ApiResult<Json<Value>> {
    if !state.ships.delete(id).await {
        return Err(ApiError::ship_not_found());
    }
    info!(ship_id = id, %identity, "ship deleted");
    Ok(Json(json!({ "msg": "Ship deleted" })))
}

// JSON that counts as no input at all.
fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Object(m) => m.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}
