use thiserror::Error;

/// Errors from the credential store and password handling.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("username already in use")]
    DuplicateUsername,

    #[error("email already in use")]
    DuplicateEmail,

    #[error("identity not found")]
    NotFound,

    #[error("password hashing failed")]
    Hashing,

    #[error("identity store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// Errors from token verification, refresh, and revocation.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("malformed token")]
    Malformed,

    #[error("token signature invalid")]
    SignatureInvalid,

    #[error("refresh token revoked")]
    Revoked,

    #[error("refresh token already revoked")]
    AlreadyRevoked,

    #[error("token encoding failed")]
    Encoding,

    #[error("revocation store error: {0}")]
    Store(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);
