//! Shared server state: configuration plus the stores and services every
//! handler reaches through.

use crate::config::AppConfig;
use crate::services::booking::BookingService;
use crate::storage::memory::{
    InMemoryAppointmentStore, InMemoryCategoryStore, InMemoryIdentityStore,
};
use crate::storage::postgres::{
    PostgresAppointmentStore, PostgresCategoryStore, PostgresIdentityStore,
    PostgresRevocationStore,
};
use crate::storage::{AppointmentStore, CategoryStore};
use carelink_auth::{
    IdentityStore, InMemoryRevocationStore, RevocationStore, TokenConfig, TokenService,
};
use email_notify::{Notifier, SmtpNotifier};
use sqlx::PgPool;
use std::sync::Arc;

/// Main CareLink server state
#[derive(Clone)]
pub struct CareLinkServer {
    /// Credential store
    pub identities: Arc<dyn IdentityStore>,
    /// Token service (issuance, verification, revocation)
    pub tokens: Arc<TokenService>,
    /// Care-category reference data
    pub categories: Arc<dyn CategoryStore>,
    /// Appointment booking workflow
    pub booking: Arc<BookingService>,
}

impl CareLinkServer {
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        revocations: Arc<dyn RevocationStore>,
        categories: Arc<dyn CategoryStore>,
        appointments: Arc<dyn AppointmentStore>,
        notifier: Arc<dyn Notifier>,
        token_config: TokenConfig,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(token_config, revocations));
        let booking = Arc::new(BookingService::new(
            categories.clone(),
            appointments,
            notifier,
        ));
        Self {
            identities,
            tokens,
            categories,
            booking,
        }
    }

    /// Durable state over Postgres.
    pub fn with_postgres(pool: PgPool, config: &AppConfig) -> Self {
        Self::new(
            Arc::new(PostgresIdentityStore::new(pool.clone())),
            Arc::new(PostgresRevocationStore::new(pool.clone())),
            Arc::new(PostgresCategoryStore::new(pool.clone())),
            Arc::new(PostgresAppointmentStore::new(pool)),
            Arc::new(SmtpNotifier::new(config.email.clone())),
            config.token.clone(),
        )
    }

    /// In-memory state for development without a database. Nothing
    /// survives a restart, including token revocations.
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(InMemoryIdentityStore::new()),
            Arc::new(InMemoryRevocationStore::new()),
            Arc::new(InMemoryCategoryStore::with_defaults()),
            Arc::new(InMemoryAppointmentStore::new()),
            Arc::new(SmtpNotifier::new(config.email.clone())),
            config.token.clone(),
        )
    }
}
