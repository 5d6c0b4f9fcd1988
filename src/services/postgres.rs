use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, QueryBuilder, Row};
use std::time::Duration;

use crate::models::{Provider, ProviderQuery};
use crate::services::directory::{DirectoryError, ProviderDirectory};

/// Postgres-backed provider directory
///
/// The deployment store. The provider table is owned by the migrations in
/// `./migrations` and bulk-loaded by the import binary; the per-request
/// path only ever reads from it.
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    /// Create a new directory from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, DirectoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new directory from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, DirectoryError> {
        tracing::info!("Connecting to PostgreSQL provider directory");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    fn provider_from_row(row: &PgRow) -> Provider {
        Provider {
            id: row.get("id"),
            name: row.get("name"),
            category: row.get("category"),
            address_details: row.get("address_details"),
            city: row.get("city"),
            rating: row.get("rating"),
        }
    }
}

#[async_trait]
impl ProviderDirectory for PgDirectory {
    async fn find(&self, query: &ProviderQuery) -> Result<Vec<Provider>, DirectoryError> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "SELECT id, name, category, address_details, city, rating FROM providers WHERE TRUE",
        );

        if let Some(city) = &query.city_contains {
            builder.push(" AND city ILIKE '%' || ");
            builder.push_bind(city.clone());
            builder.push(" || '%'");
        }

        if !query.cities.is_empty() {
            builder.push(" AND (");
            let mut first = true;
            for city in &query.cities {
                if !first {
                    builder.push(" OR ");
                }
                first = false;
                builder.push("city ILIKE '%' || ");
                builder.push_bind(city.clone());
                builder.push(" || '%'");
            }
            builder.push(")");
        }

        if !query.categories.is_empty() {
            builder.push(" AND (");
            let mut first = true;
            for category in &query.categories {
                if !first {
                    builder.push(" OR ");
                }
                first = false;
                builder.push("category ILIKE '%' || ");
                builder.push_bind(category.clone());
                builder.push(" || '%'");
            }
            builder.push(")");
        }

        if !query.exclude_ids.is_empty() {
            builder.push(" AND id <> ALL(");
            builder.push_bind(query.exclude_ids.clone());
            builder.push(")");
        }

        builder.push(" ORDER BY rating DESC LIMIT ");
        builder.push_bind(query.limit as i64);

        let rows = builder.build().fetch_all(&self.pool).await?;

        Ok(rows.iter().map(Self::provider_from_row).collect())
    }

    async fn count(&self) -> Result<i64, DirectoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM providers")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("total"))
    }

    async fn bulk_replace(&self, providers: Vec<Provider>) -> Result<u64, DirectoryError> {
        for provider in &providers {
            if provider.name.trim().is_empty() {
                return Err(DirectoryError::InvalidData(format!(
                    "provider {} has an empty name",
                    provider.id
                )));
            }
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM providers").execute(&mut *tx).await?;

        let mut inserted = 0u64;
        // Postgres caps bind parameters per statement; insert in chunks
        for chunk in providers.chunks(1000) {
            let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
                "INSERT INTO providers (id, name, category, address_details, city, rating) ",
            );
            builder.push_values(chunk, |mut b, p| {
                b.push_bind(p.id)
                    .push_bind(p.name.clone())
                    .push_bind(p.category.clone())
                    .push_bind(p.address_details.clone())
                    .push_bind(p.city.clone())
                    .push_bind(p.rating);
            });

            let result = builder.build().execute(&mut *tx).await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;

        tracing::info!("Replaced provider directory with {} records", inserted);

        Ok(inserted)
    }

    async fn health_check(&self) -> Result<bool, DirectoryError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
