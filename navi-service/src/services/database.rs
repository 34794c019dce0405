//! SQLite-backed relational store for authorities and buses.

use chrono::{DateTime, Utc};
use service_core::error::AppError;
use sqlx::sqlite::SqlitePool;

use crate::models::{Authority, Bus, BusPatch, BusStatus, NewAuthority, NewBus};

/// Relational store handle. Cheap to clone; shares the pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Health check - ping the database.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!("Database health check failed: {}", e))
            })?;
        Ok(())
    }

    // ==================== Authority Operations ====================

    /// First authority whose username or email equals the given values.
    pub async fn find_authority_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<Authority>, sqlx::Error> {
        sqlx::query_as::<_, Authority>(
            "SELECT * FROM authorities WHERE username = ?1 OR email = ?2 ORDER BY id LIMIT 1",
        )
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// Login lookup: `identifier` may be either the username or the email.
    pub async fn find_authority_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Authority>, sqlx::Error> {
        self.find_authority_by_username_or_email(identifier, identifier)
            .await
    }

    pub async fn insert_authority(&self, authority: &NewAuthority) -> Result<Authority, sqlx::Error> {
        sqlx::query_as::<_, Authority>(
            r#"
            INSERT INTO authorities (username, email, department, password_hash, doc_filename, verified, registered_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING *
            "#,
        )
        .bind(&authority.username)
        .bind(&authority.email)
        .bind(&authority.department)
        .bind(&authority.password_hash)
        .bind(&authority.doc_filename)
        .bind(authority.verified)
        .bind(authority.registered_at)
        .fetch_one(&self.pool)
        .await
    }

    // ==================== Bus Operations ====================

    /// All buses in insertion order.
    pub async fn list_buses(&self) -> Result<Vec<Bus>, sqlx::Error> {
        sqlx::query_as::<_, Bus>("SELECT * FROM buses ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn find_bus(&self, id: i64) -> Result<Option<Bus>, sqlx::Error> {
        sqlx::query_as::<_, Bus>("SELECT * FROM buses WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn insert_bus(&self, bus: &NewBus, now: DateTime<Utc>) -> Result<Bus, sqlx::Error> {
        sqlx::query_as::<_, Bus>(
            r#"
            INSERT INTO buses (name, route, lat, lng, status, driver, speed, capacity, passengers, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0.0, ?7, 0, ?8)
            RETURNING *
            "#,
        )
        .bind(&bus.name)
        .bind(&bus.route)
        .bind(bus.lat)
        .bind(bus.lng)
        .bind(BusStatus::default().as_str())
        .bind(&bus.driver)
        .bind(crate::models::DEFAULT_CAPACITY)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    /// Apply `patch` to one bus in a single statement. `None` when the id is unknown.
    pub async fn update_bus(
        &self,
        id: i64,
        patch: BusPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Bus>, sqlx::Error> {
        let status = patch.status.map(|s| s.as_str().to_string());

        sqlx::query_as::<_, Bus>(
            r#"
            UPDATE buses
            SET name = COALESCE(?1, name),
                route = COALESCE(?2, route),
                lat = COALESCE(?3, lat),
                lng = COALESCE(?4, lng),
                status = COALESCE(?5, status),
                driver = COALESCE(?6, driver),
                speed = COALESCE(?7, speed),
                capacity = COALESCE(?8, capacity),
                passengers = COALESCE(?9, passengers),
                updated_at = ?10
            WHERE id = ?11
            RETURNING *
            "#,
        )
        .bind(patch.name)
        .bind(patch.route)
        .bind(patch.lat)
        .bind(patch.lng)
        .bind(status)
        .bind(patch.driver)
        .bind(patch.speed)
        .bind(patch.capacity)
        .bind(patch.passengers)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Set every bus to `status` in one statement; returns the number of rows touched.
    pub async fn set_all_bus_status(
        &self,
        status: &BusStatus,
        now: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE buses SET status = ?1, updated_at = ?2")
            .bind(status.as_str())
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
