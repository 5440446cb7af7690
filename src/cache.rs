//! Persistent city → coordinate store backing the read-through cache.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::models::{CityRecord, Coordinate};
use crate::{ForecastError, Result};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Storage for previously geocoded cities.
///
/// `find` distinguishes a missing row (`Ok(None)`) from a failed query
/// (`Err`), so callers can decide how to treat each.
#[async_trait]
pub trait CityStore: Send + Sync {
    async fn find(&self, name: &str) -> Result<Option<Coordinate>>;

    /// Inserts the city unless a row with that name already exists.
    /// Returns whether a new row was written.
    async fn insert(&self, name: &str, coordinate: Coordinate) -> Result<bool>;

    /// Most recently inserted cities, newest first.
    async fn recent_cities(&self, limit: u32) -> Result<Vec<CityRecord>>;
}

#[derive(Clone)]
pub struct SqliteCityStore {
    pool: SqlitePool,
}

impl SqliteCityStore {
    /// Opens (creating if needed) the database at `url` and runs migrations.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    /// Single-connection in-memory database. Every connection to
    /// `sqlite::memory:` is its own database, so the pool must never
    /// open a second one or drop the first.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        MIGRATOR.run(&pool).await?;
        tracing::debug!("City store ready");
        Ok(Self { pool })
    }
}

#[async_trait]
impl CityStore for SqliteCityStore {
    #[tracing::instrument(name = "query_city", level = "debug", skip(self))]
    async fn find(&self, name: &str) -> Result<Option<Coordinate>> {
        let row: Option<(f64, f64)> = sqlx::query_as("SELECT lat, long FROM cities WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some((latitude, longitude)) => {
                tracing::debug!("City found");
                Ok(Some(Coordinate::new(latitude, longitude)))
            }
            None => {
                tracing::debug!("City not found");
                Ok(None)
            }
        }
    }

    #[tracing::instrument(name = "insert_city", level = "debug", skip(self))]
    async fn insert(&self, name: &str, coordinate: Coordinate) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO cities (name, lat, long) VALUES (?, ?, ?) ON CONFLICT(name) DO NOTHING",
        )
        .bind(name)
        .bind(coordinate.latitude)
        .bind(coordinate.longitude)
        .execute(&self.pool)
        .await?;

        let inserted = result.rows_affected() == 1;
        if !inserted {
            tracing::debug!("City already stored by a concurrent request");
        }
        Ok(inserted)
    }

    async fn recent_cities(&self, limit: u32) -> Result<Vec<CityRecord>> {
        let rows: Vec<(i64, String, f64, f64)> =
            sqlx::query_as("SELECT id, name, lat, long FROM cities ORDER BY id DESC LIMIT ?")
                .bind(i64::from(limit))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| ForecastError::store(format!("failed to list cities: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(id, name, latitude, longitude)| CityRecord {
                id,
                name,
                coordinate: Coordinate::new(latitude, longitude),
            })
            .collect())
    }
}
