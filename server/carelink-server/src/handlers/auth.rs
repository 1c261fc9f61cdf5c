//! Authentication endpoints: signup, login, refresh, logout, and the
//! current-identity lookup.

use crate::auth::AuthContext;
use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::CareLinkServer;
use axum::{extract::State, http::StatusCode, Json};
use carelink_auth::{password, IdentityStore, IdentitySummary, NewIdentity, Role};
use serde::{Deserialize, Serialize};

/// Signup request
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub role: Role,
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token pair plus the identity it is bound to
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: IdentitySummary,
    pub access: String,
    pub refresh: String,
}

/// Refresh and logout both carry the refresh token in the body
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Create an identity and issue its first token pair
pub async fn signup(
    State(server): State<CareLinkServer>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    if request.username.trim().is_empty() {
        return Err(ApiError::validation_field("username", "must not be empty"));
    }
    if request.password.is_empty() {
        return Err(ApiError::validation_field("password", "must not be empty"));
    }
    if request.password != request.confirm_password {
        return Err(ApiError::validation_field(
            "confirm_password",
            "passwords do not match",
        ));
    }

    let password_hash = password::hash_password(&request.password).await?;
    let identity = server
        .identities
        .create(NewIdentity {
            username: request.username,
            email: request.email,
            password_hash,
            role: request.role,
            phone_number: request.phone_number,
        })
        .await?;

    let pair = server.tokens.issue_pair(&identity)?;
    tracing::info!(identity_id = %identity.id, role = %identity.role, "identity created");

    Ok((
        StatusCode::CREATED,
        Json(api_success(AuthResponse {
            user: IdentitySummary::from(&identity),
            access: pair.access,
            refresh: pair.refresh,
        })),
    ))
}

/// Authenticate by email and password and issue a fresh token pair
pub async fn login(
    State(server): State<CareLinkServer>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    // Identical error for unknown email and wrong password: no account
    // enumeration through this endpoint
    let invalid = || ApiError::authentication("invalid email or password");

    let identity = server
        .identities
        .find_by_email(&request.email)
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&request.password, &identity.password_hash).await? {
        return Err(invalid());
    }

    let pair = server.tokens.issue_pair(&identity)?;

    Ok(Json(api_success(AuthResponse {
        user: IdentitySummary::from(&identity),
        access: pair.access,
        refresh: pair.refresh,
    })))
}

/// Exchange a live refresh token for a new access token
pub async fn refresh(
    State(server): State<CareLinkServer>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<RefreshResponse>>, ApiError> {
    let access = server.tokens.refresh(&request.refresh).await?;
    Ok(Json(api_success(RefreshResponse { access })))
}

/// Revoke the presented refresh token. Requires a valid access token.
pub async fn logout(
    State(server): State<CareLinkServer>,
    auth: AuthContext,
    Json(request): Json<RefreshRequest>,
) -> Result<StatusCode, ApiError> {
    server.tokens.revoke(&request.refresh).await?;
    tracing::info!(subject = %auth.subject, "logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// The authenticated caller's identity summary
pub async fn me(
    State(server): State<CareLinkServer>,
    auth: AuthContext,
) -> Result<Json<ApiResponse<IdentitySummary>>, ApiError> {
    let identity = server
        .identities
        .find_by_id(auth.subject)
        .await?
        .ok_or_else(|| ApiError::not_found("identity"))?;

    Ok(Json(api_success(IdentitySummary::from(&identity))))
}
