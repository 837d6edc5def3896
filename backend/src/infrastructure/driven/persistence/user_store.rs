use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::application::ports::UserStore;
use crate::config::DatabaseSettings;
use crate::domain::{DisplayName, Email, NewUser, RfidTag, User, UserChanges, UserFilter, UserId};
use crate::error::StoreError;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    rfid: String,
    available: bool,
    entered_department: Option<bool>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let corrupt = |e: String| StoreError::Corrupt(format!("user {}: {e}", row.id));
        let name = DisplayName::new(row.name).map_err(corrupt)?;
        let email = Email::new(row.email).map_err(corrupt)?;
        let rfid = RfidTag::new(row.rfid).map_err(corrupt)?;
        Ok(User::from_persistence(
            UserId::from_uuid(row.id),
            name,
            email,
            rfid,
            row.available,
            row.entered_department,
            row.created_at,
            row.updated_at,
        ))
    }
}

pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens the pool with the auth token as password and applies the
    /// embedded migrations.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        let options = PgConnectOptions::from_str(settings.url.as_str())?.password(&settings.auth_token);
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!(host = settings.url.host_str().unwrap_or("unknown"), "Connected to the database");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, name, email, rfid, available, entered_department, created_at, updated_at
             FROM users
             WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, name, email, rfid, available, entered_department, created_at, updated_at
             FROM users
             WHERE email = $1
             ORDER BY created_at
             LIMIT 1",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_many(&self, filter: UserFilter) -> Result<Vec<User>, StoreError> {
        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT id, name, email, rfid, available, entered_department, created_at, updated_at FROM users",
        );
        if let Some(available) = filter.available {
            query.push(" WHERE available = ").push_bind(available);
        }
        query.push(" ORDER BY created_at");

        let rows: Vec<UserRow> = query.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let row: UserRow = sqlx::query_as(
            "INSERT INTO users (id, name, email, rfid, available, entered_department)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, name, email, rfid, available, entered_department, created_at, updated_at",
        )
        .bind(UserId::new().as_uuid())
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.rfid.as_str())
        .bind(user.available)
        .bind(user.entered_department)
        .fetch_one(&self.pool)
        .await?;

        User::try_from(row)
    }

    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User, StoreError> {
        if changes.is_empty() {
            return self.find_by_id(id).await?.ok_or(StoreError::RowMissing(*id));
        }

        let row: Option<UserRow> = sqlx::query_as(
            "UPDATE users
             SET name = COALESCE($2, name),
                 email = COALESCE($3, email),
                 rfid = COALESCE($4, rfid),
                 available = COALESCE($5, available),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING id, name, email, rfid, available, entered_department, created_at, updated_at",
        )
        .bind(id.as_uuid())
        .bind(changes.name.as_ref().map(DisplayName::as_str))
        .bind(changes.email.as_ref().map(Email::as_str))
        .bind(changes.rfid.as_ref().map(RfidTag::as_str))
        .bind(changes.available)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from)
            .transpose()?
            .ok_or(StoreError::RowMissing(*id))
    }
}
