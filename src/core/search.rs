use std::cmp::Ordering;
use std::sync::Arc;

use thiserror::Error;

use crate::core::distance::round_tenth;
use crate::core::gazetteer::CityGazetteer;
use crate::models::{NearbySearchRequest, Provider, ProviderQuery, RankedProvider, SearchOutcome};
use crate::services::directory::{DirectoryError, ProviderDirectory};

/// Errors a search can fail with
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Provider directory failure: {0}")]
    Directory(#[from] DirectoryError),
}

/// Tunable thresholds for the widening search
///
/// The defaults are deliberate policy: prefer fewer, locally-relevant
/// results over exhaustive search, so the later stages only run when the
/// earlier ones came up short.
#[derive(Debug, Clone)]
pub struct SearchPolicy {
    /// Final result cap
    pub result_cap: usize,
    /// Run the nearby-cities stage when fewer results than this
    pub widen_below: usize,
    /// Run the major-city fallback when fewer results than this
    pub fallback_below: usize,
    /// Result cap for the major-city fallback stage
    pub fallback_limit: usize,
    /// Cities the fallback stage draws from
    pub major_cities: Vec<String>,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            result_cap: 20,
            widen_below: 10,
            fallback_below: 5,
            fallback_limit: 10,
            major_cities: ["karachi", "lahore", "islamabad", "rawalpindi", "faisalabad"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// The three search stages, in execution order
///
/// Each stage is gated on the accumulator the previous stages built, so
/// they run sequentially, never concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchStage {
    SameCity,
    NearbyCities,
    MajorCityFallback,
}

impl SearchStage {
    const ORDER: [SearchStage; 3] = [
        SearchStage::SameCity,
        SearchStage::NearbyCities,
        SearchStage::MajorCityFallback,
    ];

    fn should_run(
        self,
        request: &NearbySearchRequest,
        accumulated: usize,
        policy: &SearchPolicy,
    ) -> bool {
        match self {
            SearchStage::SameCity => !request.city.trim().is_empty(),
            SearchStage::NearbyCities => accumulated < policy.widen_below,
            SearchStage::MajorCityFallback => accumulated < policy.fallback_below,
        }
    }
}

/// Nearby-provider search orchestrator
///
/// Executes the widening search: same city, then gazetteer cities within
/// the request radius, then a fixed major-city fallback, de-duplicating by
/// provider id across stages. Results are ranked by approximate distance
/// with rating as the tie-break, then capped.
pub struct SearchEngine {
    directory: Arc<dyn ProviderDirectory>,
    gazetteer: Arc<CityGazetteer>,
    policy: SearchPolicy,
}

impl SearchEngine {
    pub fn new(
        directory: Arc<dyn ProviderDirectory>,
        gazetteer: Arc<CityGazetteer>,
        policy: SearchPolicy,
    ) -> Self {
        Self {
            directory,
            gazetteer,
            policy,
        }
    }

    /// Find providers near the requested location
    ///
    /// Fails with [`SearchError::InvalidLocation`] on missing or zero
    /// coordinates, and with [`SearchError::Directory`] when any stage's
    /// query fails; a stage failure fails the whole request, accumulated
    /// partial results are discarded.
    pub async fn find_nearby(
        &self,
        request: &NearbySearchRequest,
    ) -> Result<SearchOutcome, SearchError> {
        validate_location(request)?;

        let mut accumulated: Vec<Provider> = Vec::new();

        for stage in SearchStage::ORDER {
            if !stage.should_run(request, accumulated.len(), &self.policy) {
                tracing::debug!(?stage, accumulated = accumulated.len(), "Stage skipped");
                continue;
            }

            let Some(query) = self.stage_query(stage, request, &accumulated) else {
                continue;
            };

            let hits = self.directory.find(&query).await?;
            tracing::debug!(?stage, hits = hits.len(), "Stage executed");
            accumulated.extend(hits);
        }

        let mut ranked: Vec<RankedProvider> = accumulated
            .into_iter()
            .map(|provider| {
                let distance = self
                    .gazetteer
                    .distance_from(request.latitude, request.longitude, &provider.city)
                    .map(round_tenth);
                RankedProvider::new(provider, distance)
            })
            .collect();

        // Distance ascending, unknown distance after every known one,
        // higher rating first among equals
        ranked.sort_by(|a, b| {
            compare_distance(a.distance, b.distance).then_with(|| {
                b.rating
                    .partial_cmp(&a.rating)
                    .unwrap_or(Ordering::Equal)
            })
        });

        let total_found = ranked.len();
        ranked.truncate(self.policy.result_cap);

        Ok(SearchOutcome {
            providers: ranked,
            total_found,
        })
    }

    fn stage_query(
        &self,
        stage: SearchStage,
        request: &NearbySearchRequest,
        accumulated: &[Provider],
    ) -> Option<ProviderQuery> {
        match stage {
            SearchStage::SameCity => Some(ProviderQuery {
                city_contains: Some(request.city.clone()),
                categories: request.specialties.clone(),
                limit: self.policy.result_cap,
                ..Default::default()
            }),
            SearchStage::NearbyCities => {
                let nearby = self.gazetteer.cities_within(
                    request.latitude,
                    request.longitude,
                    request.radius,
                    &request.city,
                );
                if nearby.is_empty() {
                    return None;
                }

                Some(ProviderQuery {
                    cities: nearby,
                    categories: request.specialties.clone(),
                    exclude_ids: ids_of(accumulated),
                    limit: self.policy.result_cap.saturating_sub(accumulated.len()),
                    ..Default::default()
                })
            }
            SearchStage::MajorCityFallback => Some(ProviderQuery {
                cities: self.policy.major_cities.clone(),
                categories: request.specialties.clone(),
                exclude_ids: ids_of(accumulated),
                limit: self.policy.fallback_limit,
                ..Default::default()
            }),
        }
    }
}

fn ids_of(providers: &[Provider]) -> Vec<i64> {
    providers.iter().map(|p| p.id).collect()
}

fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn validate_location(request: &NearbySearchRequest) -> Result<(), SearchError> {
    let (lat, lon) = (request.latitude, request.longitude);

    if !lat.is_finite() || !lon.is_finite() {
        return Err(SearchError::InvalidLocation(
            "latitude and longitude must be finite numbers".to_string(),
        ));
    }
    if lat == 0.0 || lon == 0.0 {
        return Err(SearchError::InvalidLocation(
            "latitude and longitude are required".to_string(),
        ));
    }
    if lat.abs() > 90.0 || lon.abs() > 180.0 {
        return Err(SearchError::InvalidLocation(format!(
            "coordinates out of range: ({}, {})",
            lat, lon
        )));
    }

    Ok(())
}
