//! Gateway-injected identity headers extractor.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "x-foodgram-user-id";
pub const USER_ROLE_HEADER: &str = "x-foodgram-user-role";

/// User identity injected by the gateway via `x-foodgram-user-id` and `x-foodgram-user-role`.
///
/// As a plain extractor it returns 401 when either header is absent or malformed.
/// Extracted as `Option<IdentityHeaders>` it yields `None` for anonymous requests
/// (both headers absent) and still rejects malformed ones.
/// Role enforcement (403) is done by handlers after extraction.
#[derive(Debug, Clone)]
pub struct IdentityHeaders {
    pub user_id: Uuid,
    pub user_role: u8,
}

impl IdentityHeaders {
    fn read(parts: &Parts) -> Result<Option<Self>, StatusCode> {
        let user_id = parts.headers.get(USER_ID_HEADER);
        let user_role = parts.headers.get(USER_ROLE_HEADER);
        if user_id.is_none() && user_role.is_none() {
            return Ok(None);
        }

        let user_id = user_id
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;
        let user_role = user_role
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u8>().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;
        Ok(Some(Self { user_id, user_role }))
    }
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 declares this as `fn -> impl Future + Send`; reading the headers
    // synchronously keeps the returned future 'static.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = Self::read(parts);
        async move { identity.and_then(|found| found.ok_or(StatusCode::UNAUTHORIZED)) }
    }
}

impl<S> OptionalFromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let identity = Self::read(parts);
        async move { identity }
    }
}
