//! In-memory storage for development (`--memory`) and tests. Not durable.

use super::{AppointmentStore, CategoryStore};
use crate::models::{Appointment, Category};
use async_trait::async_trait;
use carelink_auth::{Identity, IdentityError, IdentityStore, NewIdentity};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

fn lock_poisoned() -> anyhow::Error {
    anyhow::anyhow!("store lock poisoned")
}

/// In-memory credential store.
#[derive(Default)]
pub struct InMemoryIdentityStore {
    identities: RwLock<Vec<Identity>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn create(&self, new: NewIdentity) -> Result<Identity, IdentityError> {
        let mut identities = self
            .identities
            .write()
            .map_err(|_| IdentityError::Store(lock_poisoned()))?;

        if identities.iter().any(|i| i.username == new.username) {
            return Err(IdentityError::DuplicateUsername);
        }
        if identities.iter().any(|i| i.email == new.email) {
            return Err(IdentityError::DuplicateEmail);
        }

        let identity = Identity {
            id: Uuid::new_v4(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            phone_number: new.phone_number,
            created_at: Utc::now(),
        };
        identities.push(identity.clone());
        Ok(identity)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, IdentityError> {
        let identities = self
            .identities
            .read()
            .map_err(|_| IdentityError::Store(lock_poisoned()))?;
        Ok(identities.iter().find(|i| i.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, IdentityError> {
        let identities = self
            .identities
            .read()
            .map_err(|_| IdentityError::Store(lock_poisoned()))?;
        Ok(identities.iter().find(|i| i.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, IdentityError> {
        let identities = self
            .identities
            .read()
            .map_err(|_| IdentityError::Store(lock_poisoned()))?;
        Ok(identities.iter().find(|i| i.username == username).cloned())
    }
}

/// In-memory category reference data, fixed at construction.
pub struct InMemoryCategoryStore {
    categories: Vec<Category>,
}

impl InMemoryCategoryStore {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Seeded with the standard care categories.
    pub fn with_defaults() -> Self {
        let seed = |name: &str, description: &str, slug: &str| Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.to_string(),
            slug: slug.to_string(),
        };
        Self::new(vec![
            seed("Prenatal Care", "Care during pregnancy", "prenatal-care"),
            seed("Postnatal Care", "Care after delivery", "postnatal-care"),
            seed("Pediatric Care", "Infant and child checkups", "pediatric-care"),
            seed("General Consultation", "General health consultation", "general-consultation"),
        ])
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn list(&self) -> anyhow::Result<Vec<Category>> {
        let mut categories = self.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        Ok(self.categories.iter().find(|c| c.id == id).cloned())
    }
}

/// In-memory appointment records.
#[derive(Default)]
pub struct InMemoryAppointmentStore {
    appointments: RwLock<HashMap<Uuid, Appointment>>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored appointment, for inspection in tests and
    /// the development mode.
    pub fn all(&self) -> Vec<Appointment> {
        self.appointments
            .read()
            .map(|a| a.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn insert(&self, appointment: &Appointment) -> anyhow::Result<()> {
        let mut appointments = self.appointments.write().map_err(|_| lock_poisoned())?;
        appointments.insert(appointment.id, appointment.clone());
        Ok(())
    }

    async fn mark_confirmed(&self, id: Uuid) -> anyhow::Result<()> {
        let mut appointments = self.appointments.write().map_err(|_| lock_poisoned())?;
        let appointment = appointments
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("appointment {id} not found"))?;
        appointment.is_confirmed = true;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Appointment>> {
        let appointments = self.appointments.read().map_err(|_| lock_poisoned())?;
        Ok(appointments.get(&id).cloned())
    }
}
