use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON request body that does not insist on a `Content-Type` header and
/// reports every decode failure as a 400 naming the offending field.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))
    }
}

#[derive(Deserialize)]
struct IdQuery {
    id: Option<String>,
}

/// Target id of a DELETE, taken from the `?id=` query parameter.
pub struct IdParam(pub i32);

impl<S> FromRequestParts<S> for IdParam
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query): Query<IdQuery> = Query::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let raw = query
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::BadRequest("Missing id query parameter".to_string()))?;

        let id = raw
            .parse::<i32>()
            .map_err(|_| AppError::BadRequest(format!("Invalid id: {}", raw)))?;

        Ok(Self(id))
    }
}
