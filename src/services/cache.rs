use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::NearbySearchRequest;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Multi-tier cache manager for search responses
///
/// L1 (moka, in-memory) in front of L2 (Redis, shared across instances).
/// The provider directory only changes through the import step, so cached
/// search responses stay valid until an import invalidates them.
pub struct CacheManager {
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
    l1_cache: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl CacheManager {
    /// Create a new cache manager
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = redis::aio::ConnectionManager::new(client).await?;

        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
            l1_cache,
            ttl_secs,
        })
    }

    /// Get a value from cache (L1 first, then L2)
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(bytes) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let mut conn = self.redis.lock().await;
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        if let Some(json) = value {
            tracing::trace!("L2 cache hit: {}", key);

            let bytes = json.as_bytes().to_vec();
            self.l1_cache.insert(key.to_string(), bytes).await;

            return Ok(serde_json::from_str(&json)?);
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Set a value in cache (both L1 and L2)
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        let bytes = json.as_bytes().to_vec();
        self.l1_cache.insert(key.to_string(), bytes).await;

        let mut conn = self.redis.lock().await;
        redis::cmd("SETEX")
            .arg(key)
            .arg(self.ttl_secs)
            .arg(json)
            .query_async::<()>(&mut *conn)
            .await?;
        drop(conn);

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Delete a value from both cache tiers
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.l1_cache.invalidate(key).await;
        let mut conn = self.redis.lock().await;
        redis::cmd("DEL")
            .arg(key)
            .query_async::<()>(&mut *conn)
            .await?;
        Ok(())
    }

    /// Invalidate all cache entries matching a pattern
    ///
    /// Used after a directory import: every cached search result is stale.
    pub async fn invalidate_pattern(&self, pattern: &str) -> Result<(), CacheError> {
        // L1 has no pattern scan; clear it wholesale
        self.l1_cache.invalidate_all();

        let mut conn = self.redis.lock().await;
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut *conn)
            .await?;

        if !keys.is_empty() {
            redis::cmd("DEL")
                .arg(keys)
                .query_async::<()>(&mut *conn)
                .await?;
        }

        tracing::debug!("Invalidated cache pattern: {}", pattern);
        Ok(())
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key for a nearby-search response
    ///
    /// Coordinates are rounded to four decimals (~11m) so GPS jitter from
    /// the same spot hits the same entry.
    pub fn nearby_search(request: &NearbySearchRequest) -> String {
        let mut specialties: Vec<String> = request
            .specialties
            .iter()
            .map(|s| s.to_lowercase())
            .collect();
        specialties.sort();

        format!(
            "nearby:{:.4}:{:.4}:{}:{:.1}:{}",
            request.latitude,
            request.longitude,
            request.city.trim().to_lowercase(),
            request.radius,
            specialties.join(",")
        )
    }

    /// Pattern matching every nearby-search entry
    pub fn nearby_search_pattern() -> &'static str {
        "nearby:*"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(lat: f64, lon: f64, city: &str, specialties: &[&str]) -> NearbySearchRequest {
        NearbySearchRequest {
            latitude: lat,
            longitude: lon,
            city: city.to_string(),
            radius: 25.0,
            specialties: specialties.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_key_is_stable_across_specialty_order() {
        let a = CacheKey::nearby_search(&request(24.8607, 67.0011, "Karachi", &["Cardiologist", "General Physician"]));
        let b = CacheKey::nearby_search(&request(24.8607, 67.0011, "Karachi", &["General Physician", "Cardiologist"]));

        assert_eq!(a, b);
    }

    #[test]
    fn test_key_ignores_city_case() {
        let a = CacheKey::nearby_search(&request(24.8607, 67.0011, "Karachi", &[]));
        let b = CacheKey::nearby_search(&request(24.8607, 67.0011, "karachi", &[]));

        assert_eq!(a, b);
    }

    #[test]
    fn test_key_distinguishes_locations() {
        let karachi = CacheKey::nearby_search(&request(24.8607, 67.0011, "Karachi", &[]));
        let lahore = CacheKey::nearby_search(&request(31.5204, 74.3587, "Lahore", &[]));

        assert_ne!(karachi, lahore);
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_cache_set_get() {
        let cache = CacheManager::new("redis://127.0.0.1:6379", 1000, 60)
            .await
            .expect("Failed to create cache");

        let key = "test_key";
        let value = "test_value";

        cache.set(key, &value).await.unwrap();
        let result: String = cache.get(key).await.unwrap();
        assert_eq!(result, value);

        cache.delete(key).await.unwrap();
        assert!(cache.get::<String>(key).await.is_err());
    }
}
