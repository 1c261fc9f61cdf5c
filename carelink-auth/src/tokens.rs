//! Access/refresh token issuance, verification, and revocation.
//!
//! Both token kinds are HS256-signed JWTs. Access tokens are short-lived
//! and verified statelessly (signature + expiry + kind). Refresh tokens
//! are long-lived and stateful: revocation records the token `jti` in an
//! injected [`RevocationStore`], so a revoked token stays revoked across
//! service instances and process restarts.

use crate::error::TokenError;
use crate::models::{Identity, Role};
use crate::store::RevocationStore;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Token kind discriminator carried in the claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Signed token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (identity id)
    pub sub: Uuid,
    /// Subject role at issuance
    pub role: Role,
    /// Access or refresh
    pub kind: TokenKind,
    /// Unique token id; the revocation set is keyed by this
    pub jti: Uuid,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiration (seconds since epoch)
    pub exp: i64,
    /// Issuer
    pub iss: String,
}

/// An access/refresh token pair as returned by signup and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Token service configuration.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub issuer: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: "carelink".to_string(),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(7),
        }
    }
}

/// Issues, verifies, refreshes, and revokes tokens.
pub struct TokenService {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    revocations: Arc<dyn RevocationStore>,
}

impl TokenService {
    pub fn new(config: TokenConfig, revocations: Arc<dyn RevocationStore>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
            revocations,
        }
    }

    /// Issue a fresh access/refresh pair for an identity. Each token gets
    /// its own random `jti`.
    pub fn issue_pair(&self, identity: &Identity) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access: self.sign(identity.id, identity.role, TokenKind::Access)?,
            refresh: self.sign(identity.id, identity.role, TokenKind::Refresh)?,
        })
    }

    /// Verify an access token. Stateless: no store lookup.
    ///
    /// A refresh token presented here is rejected as malformed.
    pub fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.decode(token)?;
        if claims.kind != TokenKind::Access {
            return Err(TokenError::Malformed);
        }
        Ok(claims)
    }

    /// Exchange a live refresh token for a new access token. Consults the
    /// revocation set before issuing.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, TokenError> {
        let claims = self.verify_refresh(refresh_token)?;
        if self.revocations.contains(claims.jti).await? {
            return Err(TokenError::Revoked);
        }
        self.sign(claims.sub, claims.role, TokenKind::Access)
    }

    /// Revoke a refresh token by recording its `jti`. Revoking an
    /// already-revoked token reports [`TokenError::AlreadyRevoked`]; the
    /// set itself is unaffected by repeated insertion.
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), TokenError> {
        let claims = self.verify_refresh(refresh_token)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now);
        let inserted = self.revocations.insert(claims.jti, expires_at).await?;
        if !inserted {
            return Err(TokenError::AlreadyRevoked);
        }
        tracing::debug!(jti = %claims.jti, subject = %claims.sub, "refresh token revoked");
        Ok(())
    }

    fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.decode(token)?;
        if claims.kind != TokenKind::Refresh {
            return Err(TokenError::Malformed);
        }
        Ok(claims)
    }

    fn sign(&self, subject: Uuid, role: Role, kind: TokenKind) -> Result<String, TokenError> {
        let ttl = match kind {
            TokenKind::Access => self.config.access_ttl,
            TokenKind::Refresh => self.config.refresh_ttl,
        };
        let now = Utc::now();
        let claims = Claims {
            sub: subject,
            role,
            kind,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: self.config.issuer.clone(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| TokenError::Encoding)
    }

    fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        // No clock-skew allowance: expiry is exact
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(err) => Err(match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                _ => TokenError::Malformed,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryRevocationStore;

    fn identity() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            username: "jane".to_string(),
            email: "jane@x.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Patient,
            phone_number: None,
            created_at: Utc::now(),
        }
    }

    fn service() -> TokenService {
        TokenService::new(
            TokenConfig::new("test-secret"),
            Arc::new(InMemoryRevocationStore::new()),
        )
    }

    #[test]
    fn issued_access_token_verifies() {
        let service = service();
        let identity = identity();

        let pair = service.issue_pair(&identity).unwrap();
        let claims = service.verify_access(&pair.access).unwrap();

        assert_eq!(claims.sub, identity.id);
        assert_eq!(claims.role, Role::Patient);
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn token_jtis_are_unique_per_issuance() {
        let service = service();
        let identity = identity();

        let first = service.issue_pair(&identity).unwrap();
        let second = service.issue_pair(&identity).unwrap();

        let a = service.verify_access(&first.access).unwrap();
        let b = service.verify_access(&second.access).unwrap();
        assert_ne!(a.jti, b.jti);
        assert_ne!(first.access, second.access);
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let service = service();
        let pair = service.issue_pair(&identity()).unwrap();

        assert!(matches!(
            service.verify_access(&pair.refresh),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn expired_access_token_is_rejected() {
        let mut config = TokenConfig::new("test-secret");
        config.access_ttl = Duration::seconds(-60);
        let service = TokenService::new(config, Arc::new(InMemoryRevocationStore::new()));

        let pair = service.issue_pair(&identity()).unwrap();
        assert!(matches!(
            service.verify_access(&pair.access),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_forged() {
        let service = service();
        let other = TokenService::new(
            TokenConfig::new("other-secret"),
            Arc::new(InMemoryRevocationStore::new()),
        );

        let forged = other.issue_pair(&identity()).unwrap();
        assert!(matches!(
            service.verify_access(&forged.access),
            Err(TokenError::SignatureInvalid)
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        let service = service();
        assert!(matches!(
            service.verify_access("not.a.jwt"),
            Err(TokenError::Malformed)
        ));
    }

    #[tokio::test]
    async fn refresh_yields_a_usable_access_token() {
        let service = service();
        let identity = identity();

        let pair = service.issue_pair(&identity).unwrap();
        let access = service.refresh(&pair.refresh).await.unwrap();
        let claims = service.verify_access(&access).unwrap();

        assert_eq!(claims.sub, identity.id);
        assert_eq!(claims.role, identity.role);
    }

    #[tokio::test]
    async fn access_token_cannot_be_refreshed() {
        let service = service();
        let pair = service.issue_pair(&identity()).unwrap();

        assert!(matches!(
            service.refresh(&pair.access).await,
            Err(TokenError::Malformed)
        ));
    }

    #[tokio::test]
    async fn revoked_refresh_token_never_refreshes_again() {
        let service = service();
        let pair = service.issue_pair(&identity()).unwrap();

        service.revoke(&pair.refresh).await.unwrap();
        assert!(matches!(
            service.refresh(&pair.refresh).await,
            Err(TokenError::Revoked)
        ));
    }

    #[tokio::test]
    async fn double_revocation_is_reported() {
        let service = service();
        let pair = service.issue_pair(&identity()).unwrap();

        service.revoke(&pair.refresh).await.unwrap();
        assert!(matches!(
            service.revoke(&pair.refresh).await,
            Err(TokenError::AlreadyRevoked)
        ));
        // The set is still intact
        assert!(matches!(
            service.refresh(&pair.refresh).await,
            Err(TokenError::Revoked)
        ));
    }

    #[tokio::test]
    async fn revocation_survives_service_reconstruction() {
        let revocations: Arc<InMemoryRevocationStore> = Arc::new(InMemoryRevocationStore::new());
        let config = TokenConfig::new("test-secret");

        let first = TokenService::new(config.clone(), revocations.clone());
        let pair = first.issue_pair(&identity()).unwrap();
        first.revoke(&pair.refresh).await.unwrap();
        drop(first);

        // A new service over the same durable set still sees the revocation
        let second = TokenService::new(config, revocations);
        assert!(matches!(
            second.refresh(&pair.refresh).await,
            Err(TokenError::Revoked)
        ));
    }
}
