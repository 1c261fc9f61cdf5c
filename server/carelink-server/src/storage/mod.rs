//! Storage contracts for booking data, with Postgres and in-memory
//! implementations. Identity and revocation-set contracts live in
//! `carelink-auth`; their backends live here too.

pub mod memory;
pub mod postgres;

use crate::models::{Appointment, Category};
use async_trait::async_trait;
use uuid::Uuid;

/// Care-category reference data.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// All categories, ordered by name.
    async fn list(&self) -> anyhow::Result<Vec<Category>>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Category>>;
}

/// Appointment records. Each booking is an independent insert; the only
/// mutation is the one-way confirmation flag.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert(&self, appointment: &Appointment) -> anyhow::Result<()>;

    async fn mark_confirmed(&self, id: Uuid) -> anyhow::Result<()>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Appointment>>;
}
