use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
};
use serde_json::Value;
use tracing::warn;

use crate::error::ApiError;

/// Request body read as loose JSON.
///
/// `None` when the request carries no JSON at all: no JSON content type or
/// an empty body. A JSON body that fails to parse is a 400.
#[derive(Debug)]
pub struct JsonBody(pub Option<Value>);

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for JsonBody {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(is_json_content_type);
        if !is_json {
            return Ok(JsonBody(None));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(None));
        }

        serde_json::from_slice(&bytes).map(|v| JsonBody(Some(v))).map_err(|e| {
            warn!(error = %e, "undecodable JSON body");
            ApiError::BadRequest("Failed to decode JSON object".into())
        })
    }
}

fn is_json_content_type(raw: &str) -> bool {
    let mime = raw.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}
