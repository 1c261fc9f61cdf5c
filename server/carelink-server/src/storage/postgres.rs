//! Postgres-backed storage. Uses the runtime query API so the workspace
//! builds without a live database; schema lives in `migrations/`.

use super::{AppointmentStore, CategoryStore};
use crate::models::{Appointment, Category, TimeSlot};
use async_trait::async_trait;
use carelink_auth::{Identity, IdentityError, IdentityStore, NewIdentity, RevocationStore, Role};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Durable credential store.
pub struct PostgresIdentityStore {
    pool: PgPool,
}

impl PostgresIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    phone_number: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = IdentityError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e: carelink_auth::UnknownRole| IdentityError::Store(e.into()))?;
        Ok(Identity {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role,
            phone_number: row.phone_number,
            created_at: row.created_at,
        })
    }
}

const IDENTITY_COLUMNS: &str =
    "id, username, email, password_hash, role, phone_number, created_at";

#[async_trait]
impl IdentityStore for PostgresIdentityStore {
    async fn create(&self, new: NewIdentity) -> Result<Identity, IdentityError> {
        let identity = Identity {
            id: Uuid::new_v4(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            phone_number: new.phone_number,
            created_at: Utc::now(),
        };

        let result = sqlx::query(
            r#"
            INSERT INTO identities (id, username, email, password_hash, role, phone_number, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(identity.id)
        .bind(&identity.username)
        .bind(&identity.email)
        .bind(&identity.password_hash)
        .bind(identity.role.as_str())
        .bind(&identity.phone_number)
        .bind(identity.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(identity),
            Err(sqlx::Error::Database(db)) if db.constraint() == Some("identities_username_key") => {
                Err(IdentityError::DuplicateUsername)
            }
            Err(sqlx::Error::Database(db)) if db.constraint() == Some("identities_email_key") => {
                Err(IdentityError::DuplicateEmail)
            }
            Err(e) => Err(IdentityError::Store(e.into())),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, IdentityError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IdentityError::Store(e.into()))?;

        row.map(Identity::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, IdentityError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IdentityError::Store(e.into()))?;

        row.map(Identity::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, IdentityError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IdentityError::Store(e.into()))?;

        row.map(Identity::try_from).transpose()
    }
}

/// Durable refresh-token revocation set. Rows carry the token expiry so
/// stale entries can be swept once they can no longer matter.
pub struct PostgresRevocationStore {
    pool: PgPool,
}

impl PostgresRevocationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Remove entries whose token has expired anyway.
    pub async fn sweep_expired(&self) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl RevocationStore for PostgresRevocationStore {
    async fn insert(&self, jti: Uuid, expires_at: DateTime<Utc>) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "INSERT INTO revoked_tokens (jti, expires_at) VALUES ($1, $2) ON CONFLICT (jti) DO NOTHING",
        )
        .bind(jti)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn contains(&self, jti: Uuid) -> anyhow::Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE jti = $1)",
        )
        .bind(jti)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

/// Durable category reference data.
pub struct PostgresCategoryStore {
    pool: PgPool,
}

impl PostgresCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PostgresCategoryStore {
    async fn list(&self) -> anyhow::Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, slug FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, slug FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }
}

/// Durable appointment records.
pub struct PostgresAppointmentStore {
    pool: PgPool,
}

impl PostgresAppointmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AppointmentRow {
    id: Uuid,
    category_id: Uuid,
    full_name: String,
    email: String,
    phone_number: Option<String>,
    notes: Option<String>,
    date: NaiveDate,
    time: String,
    is_confirmed: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = anyhow::Error;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let time: TimeSlot = row.time.parse()?;
        Ok(Appointment {
            id: row.id,
            category_id: row.category_id,
            full_name: row.full_name,
            email: row.email,
            phone_number: row.phone_number,
            notes: row.notes,
            date: row.date,
            time,
            is_confirmed: row.is_confirmed,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl AppointmentStore for PostgresAppointmentStore {
    async fn insert(&self, appointment: &Appointment) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO appointments
                (id, category_id, full_name, email, phone_number, notes, date, time, is_confirmed, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(appointment.id)
        .bind(appointment.category_id)
        .bind(&appointment.full_name)
        .bind(&appointment.email)
        .bind(&appointment.phone_number)
        .bind(&appointment.notes)
        .bind(appointment.date)
        .bind(appointment.time.as_str())
        .bind(appointment.is_confirmed)
        .bind(appointment.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_confirmed(&self, id: Uuid) -> anyhow::Result<()> {
        let result = sqlx::query("UPDATE appointments SET is_confirmed = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            anyhow::bail!("appointment {id} not found");
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Appointment>> {
        let row = sqlx::query_as::<_, AppointmentRow>(
            r#"
            SELECT id, category_id, full_name, email, phone_number, notes, date, time, is_confirmed, created_at
            FROM appointments WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Appointment::try_from).transpose()
    }
}
