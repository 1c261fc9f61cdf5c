//! Storage contracts for identities and the refresh-token revocation set.
//!
//! The server crate provides the durable Postgres implementations; the
//! in-memory revocation store here backs development and tests.

use crate::error::IdentityError;
use crate::models::{Identity, NewIdentity};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// The credential store. Inserts are atomic per record: a created identity
/// is either fully visible or absent.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn create(&self, identity: NewIdentity) -> Result<Identity, IdentityError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, IdentityError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, IdentityError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, IdentityError>;
}

/// The refresh-token revocation set, keyed by token `jti`.
///
/// Injected into the token service as a dependency; durability is the
/// implementation's concern. Insertion must be idempotent so repeated
/// revocation cannot corrupt the set.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Record a revoked `jti`. Returns `true` when the id was newly
    /// inserted, `false` when it was already present.
    async fn insert(&self, jti: Uuid, expires_at: DateTime<Utc>) -> anyhow::Result<bool>;

    async fn contains(&self, jti: Uuid) -> anyhow::Result<bool>;
}

/// In-memory revocation set for development and testing.
#[derive(Default)]
pub struct InMemoryRevocationStore {
    revoked: RwLock<HashMap<Uuid, DateTime<Utc>>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn insert(&self, jti: Uuid, expires_at: DateTime<Utc>) -> anyhow::Result<bool> {
        let mut revoked = self
            .revoked
            .write()
            .map_err(|_| anyhow::anyhow!("revocation set lock poisoned"))?;
        Ok(revoked.insert(jti, expires_at).is_none())
    }

    async fn contains(&self, jti: Uuid) -> anyhow::Result<bool> {
        let revoked = self
            .revoked
            .read()
            .map_err(|_| anyhow::anyhow!("revocation set lock poisoned"))?;
        Ok(revoked.contains_key(&jti))
    }
}
