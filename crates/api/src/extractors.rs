//! Request extractors.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, OptionalFromRequest, Path, Query, Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use docledger_core::workflow::{Actor, Role};
use docledger_shared::types::ApiResponse;

/// Header carrying the acting user's id.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";

/// Header carrying the acting user's role.
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// The acting user, resolved upstream and forwarded in request headers.
///
/// Write handlers take this extractor; reads need no role.
///
/// ```ignore
/// async fn handler(CurrentActor(actor): CurrentActor) -> impl IntoResponse {
///     let role = actor.role;
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CurrentActor(pub Actor);

type Rejection = (StatusCode, Json<ApiResponse<()>>);

fn unauthorized(message: &str) -> Rejection {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::error("UNAUTHORIZED", message)),
    )
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header(&parts.headers, ACTOR_ID_HEADER)
            .ok_or_else(|| unauthorized("x-actor-id header is required"))?;
        let id = Uuid::parse_str(id)
            .map_err(|_| unauthorized("x-actor-id header must be a UUID"))?;

        let role = header(&parts.headers, ACTOR_ROLE_HEADER)
            .ok_or_else(|| unauthorized("x-actor-role header is required"))?;
        let role = Role::parse(role)
            .ok_or_else(|| unauthorized("x-actor-role header names an unknown role"))?;

        Ok(Self(Actor::new(id, role)))
    }
}

// ============================================================================
// Envelope-rendering wrappers around axum's extractors
// ============================================================================

/// Rejection of a malformed body, path, or query string.
///
/// Rendered as a `VALIDATION_ERROR` envelope with status 400.
#[derive(Debug)]
pub struct BadRequest(String);

impl IntoResponse for BadRequest {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error("VALIDATION_ERROR", self.0)),
        )
            .into_response()
    }
}

impl From<JsonRejection> for BadRequest {
    fn from(rejection: JsonRejection) -> Self {
        Self(rejection.body_text())
    }
}

impl From<PathRejection> for BadRequest {
    fn from(rejection: PathRejection) -> Self {
        Self(rejection.body_text())
    }
}

impl From<QueryRejection> for BadRequest {
    fn from(rejection: QueryRejection) -> Self {
        Self(rejection.body_text())
    }
}

/// JSON request body.
///
/// As `Option<ApiJson<T>>` a request without a `Content-Type` yields `None`;
/// a body that is present but malformed is still rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = BadRequest;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl<T, S> OptionalFromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = BadRequest;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        let body = <Json<T> as OptionalFromRequest<S>>::from_request(req, state).await?;
        Ok(body.map(|Json(value)| Self(value)))
    }
}

/// Path parameters.
#[derive(Debug, Clone, Copy)]
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = BadRequest;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// Query string parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BadRequest;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}
