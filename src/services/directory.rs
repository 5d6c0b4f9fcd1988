use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{Provider, ProviderQuery};

/// Errors that can occur when querying the provider directory
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid provider data: {0}")]
    InvalidData(String),
}

/// The queryable provider directory
///
/// One `find` operation covers everything the search stages need: substring
/// city filters, a city-set filter, a category-set filter, id exclusion, a
/// rating-descending order, and a result cap. All string matching is
/// case-insensitive and substring-permissive.
///
/// The directory is read-mostly: `bulk_replace` is a setup-time operation
/// used by the import step, never by the per-request path.
#[async_trait]
pub trait ProviderDirectory: Send + Sync {
    async fn find(&self, query: &ProviderQuery) -> Result<Vec<Provider>, DirectoryError>;

    async fn count(&self) -> Result<i64, DirectoryError>;

    /// Replace the full directory contents; returns the new row count
    async fn bulk_replace(&self, providers: Vec<Provider>) -> Result<u64, DirectoryError>;

    async fn health_check(&self) -> Result<bool, DirectoryError>;
}

/// In-process directory over a plain provider list
///
/// Mirrors the store-backed matching semantics exactly, so the orchestrator
/// can be exercised in unit tests and benches without a database.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    providers: RwLock<Vec<Provider>>,
}

impl MemoryDirectory {
    pub fn new(providers: Vec<Provider>) -> Self {
        Self {
            providers: RwLock::new(providers),
        }
    }

    fn matches(provider: &Provider, query: &ProviderQuery) -> bool {
        if query.exclude_ids.contains(&provider.id) {
            return false;
        }

        let city = provider.city.to_lowercase();

        if let Some(needle) = &query.city_contains {
            if !city.contains(&needle.to_lowercase()) {
                return false;
            }
        }

        if !query.cities.is_empty()
            && !query.cities.iter().any(|c| city.contains(&c.to_lowercase()))
        {
            return false;
        }

        if !query.categories.is_empty() {
            let category = provider.category.to_lowercase();
            if !query
                .categories
                .iter()
                .any(|c| category.contains(&c.to_lowercase()))
            {
                return false;
            }
        }

        true
    }
}

#[async_trait]
impl ProviderDirectory for MemoryDirectory {
    async fn find(&self, query: &ProviderQuery) -> Result<Vec<Provider>, DirectoryError> {
        let providers = self.providers.read().await;

        let mut hits: Vec<Provider> = providers
            .iter()
            .filter(|p| Self::matches(p, query))
            .cloned()
            .collect();

        hits.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(query.limit);

        Ok(hits)
    }

    async fn count(&self) -> Result<i64, DirectoryError> {
        Ok(self.providers.read().await.len() as i64)
    }

    async fn bulk_replace(&self, providers: Vec<Provider>) -> Result<u64, DirectoryError> {
        let count = providers.len() as u64;
        *self.providers.write().await = providers;
        Ok(count)
    }

    async fn health_check(&self) -> Result<bool, DirectoryError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(id: i64, name: &str, category: &str, city: &str, rating: f64) -> Provider {
        Provider {
            id,
            name: name.to_string(),
            category: category.to_string(),
            address_details: format!("{} Clinic Road", city),
            city: city.to_string(),
            rating,
        }
    }

    fn sample() -> MemoryDirectory {
        MemoryDirectory::new(vec![
            provider(1, "Dr. Ahmed", "Cardiologist", "Karachi", 4.8),
            provider(2, "Dr. Khan", "General Physician", "Karachi", 4.2),
            provider(3, "Dr. Malik", "Dermatologist", "Lahore", 4.9),
            provider(4, "Dr. Raza", "Cardiologist", "Hyderabad", 3.9),
        ])
    }

    #[tokio::test]
    async fn test_city_contains_is_case_insensitive() {
        let directory = sample();
        let query = ProviderQuery {
            city_contains: Some("karachi".to_string()),
            limit: 20,
            ..Default::default()
        };

        let hits = directory.find(&query).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|p| p.city == "Karachi"));
    }

    #[tokio::test]
    async fn test_category_filter_matches_any() {
        let directory = sample();
        let query = ProviderQuery {
            categories: vec!["cardio".to_string(), "dermatologist".to_string()],
            limit: 20,
            ..Default::default()
        };

        let hits = directory.find(&query).await.unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[tokio::test]
    async fn test_exclude_ids() {
        let directory = sample();
        let query = ProviderQuery {
            city_contains: Some("karachi".to_string()),
            exclude_ids: vec![1],
            limit: 20,
            ..Default::default()
        };

        let hits = directory.find(&query).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);
    }

    #[tokio::test]
    async fn test_sorted_by_rating_and_capped() {
        let directory = sample();
        let query = ProviderQuery {
            limit: 2,
            ..Default::default()
        };

        let hits = directory.find(&query).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, 3);
        assert_eq!(hits[1].id, 1);
    }

    #[tokio::test]
    async fn test_bulk_replace_swaps_contents() {
        let directory = sample();
        let replaced = directory
            .bulk_replace(vec![provider(9, "Dr. New", "ENT Specialist", "Multan", 4.0)])
            .await
            .unwrap();

        assert_eq!(replaced, 1);
        assert_eq!(directory.count().await.unwrap(), 1);
    }
}
