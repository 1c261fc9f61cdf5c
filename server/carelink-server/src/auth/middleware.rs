//! Authentication middleware.
//!
//! Stateless adapter between the transport and the token service: extract
//! the bearer token, verify it, and attach the caller's identity to the
//! request. Handlers behind [`require_auth`] receive an [`AuthContext`]
//! as an extractor; on any verification failure the handler is never
//! invoked.

use crate::error::ApiError;
use crate::server::CareLinkServer;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use carelink_auth::Role;
use uuid::Uuid;

/// The authenticated caller, attached to request extensions by
/// [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub subject: Uuid,
    pub role: Role,
}

/// Verify the bearer token and inject [`AuthContext`]; short-circuit with
/// 401 otherwise.
pub async fn require_auth(
    State(server): State<CareLinkServer>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(&request)
        .ok_or_else(|| ApiError::authentication("missing bearer token"))?;

    let claims = server.tokens.verify_access(&token)?;

    request.extensions_mut().insert(AuthContext {
        subject: claims.sub,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

fn extract_bearer(request: &Request) -> Option<String> {
    let header = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    header.strip_prefix("Bearer ").map(|t| t.to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::authentication("authentication required"))
    }
}
