//! User repository for database operations

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use hr_payroll_shared::{Role, User};
use sqlx::PgPool;
use uuid::Uuid;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = anyhow::Error;

    fn try_from(record: UserRecord) -> Result<Self> {
        let role: Role = record
            .role
            .parse()
            .map_err(|e| anyhow!("Corrupt role for user {}: {}", record.id, e))?;

        Ok(User {
            id: record.id,
            email: record.email,
            name: record.name,
            password_hash: record.password_hash,
            role,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct CreateUser<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    pub async fn create(pool: &PgPool, input: CreateUser<'_>) -> Result<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (email, name, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(input.email)
        .bind(input.name)
        .bind(input.password_hash)
        .bind(input.role.as_str())
        .fetch_one(pool)
        .await?;

        record.try_into()
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, name, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        record.map(User::try_from).transpose()
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, name, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        record.map(User::try_from).transpose()
    }

    /// All users, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, name, password_hash, role, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        records.into_iter().map(User::try_from).collect()
    }

    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// Change a user's role; `None` if no such user
    pub async fn update_role(pool: &PgPool, id: Uuid, role: Role) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users
            SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, name, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(pool)
        .await?;

        record.map(User::try_from).transpose()
    }

    /// Number of users per role; roles with no users are absent
    pub async fn count_by_role(pool: &PgPool) -> Result<Vec<(Role, i64)>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT role, COUNT(*)
            FROM users
            GROUP BY role
            "#,
        )
        .fetch_all(pool)
        .await?;

        rows.into_iter()
            .map(|(role, count)| {
                role.parse::<Role>()
                    .map(|role| (role, count))
                    .map_err(|e| anyhow!(e))
            })
            .collect()
    }
}
