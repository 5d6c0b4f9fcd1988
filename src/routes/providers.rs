use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{SearchEngine, SearchError, SpecialtyIndex};
use crate::models::{
    ErrorResponse, HealthResponse, NearbySearchRequest, NearbySearchResponse,
    ResolveSpecialtiesRequest, ResolveSpecialtiesResponse, SearchLocation,
};
use crate::services::{CacheKey, CacheManager, ProviderDirectory};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn ProviderDirectory>,
    pub cache: Arc<CacheManager>,
    pub engine: Arc<SearchEngine>,
    pub specialties: Arc<SpecialtyIndex>,
}

/// Configure all provider-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/providers/nearby", web::post().to(find_nearby))
        .route("/specialties/resolve", web::post().to(resolve_specialties));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let directory_healthy = state.directory.health_check().await.unwrap_or(false);
    let total_providers = state.directory.count().await.ok();

    let status = if directory_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        total_providers,
    })
}

/// Nearby-provider search endpoint
///
/// POST /api/v1/providers/nearby
///
/// Request body:
/// ```json
/// {
///   "latitude": 24.8607,
///   "longitude": 67.0011,
///   "city": "Karachi",
///   "radius": 25,
///   "specialties": ["Cardiologist", "General Physician"]
/// }
/// ```
async fn find_nearby(
    state: web::Data<AppState>,
    req: web::Json<NearbySearchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for nearby search: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            details: Some(errors.to_string()),
            status_code: 400,
        });
    }

    let search_id = uuid::Uuid::new_v4();
    tracing::info!(
        %search_id,
        city = %req.city,
        radius = req.radius,
        specialties = req.specialties.len(),
        "Finding nearby providers"
    );

    // The directory only changes through imports, so cached responses are
    // valid until the next import invalidates them
    let cache_key = CacheKey::nearby_search(&req);
    if let Ok(cached) = state.cache.get::<NearbySearchResponse>(&cache_key).await {
        tracing::debug!(%search_id, "Serving nearby search from cache");
        return HttpResponse::Ok().json(cached);
    }

    let outcome = match state.engine.find_nearby(&req).await {
        Ok(outcome) => outcome,
        Err(SearchError::InvalidLocation(message)) => {
            tracing::info!(%search_id, "Rejected search: {}", message);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Latitude and longitude are required".to_string(),
                details: Some(message),
                status_code: 400,
            });
        }
        Err(SearchError::Directory(e)) => {
            tracing::error!(%search_id, "Provider directory failure: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch nearby providers".to_string(),
                details: Some(e.to_string()),
                status_code: 500,
            });
        }
    };

    let response = NearbySearchResponse {
        success: true,
        doctors: outcome.providers,
        location: SearchLocation {
            latitude: req.latitude,
            longitude: req.longitude,
            city: req.city.clone(),
        },
        search_radius: req.radius,
        total_found: outcome.total_found,
    };

    tracing::info!(
        %search_id,
        returned = response.doctors.len(),
        total_found = response.total_found,
        "Nearby search complete"
    );

    if let Err(e) = state.cache.set(&cache_key, &response).await {
        tracing::warn!(%search_id, "Failed to cache search response: {}", e);
    }

    HttpResponse::Ok().json(response)
}

/// Condition → specialty resolution endpoint
///
/// POST /api/v1/specialties/resolve
///
/// Request body:
/// ```json
/// {
///   "conditions": [{"name": "diabetes", "confidence": "High"}]
/// }
/// ```
async fn resolve_specialties(
    state: web::Data<AppState>,
    req: web::Json<ResolveSpecialtiesRequest>,
) -> impl Responder {
    let specialties = state.specialties.resolve(&req.conditions);

    tracing::debug!(
        conditions = req.conditions.len(),
        specialties = specialties.len(),
        "Resolved specialties"
    );

    HttpResponse::Ok().json(ResolveSpecialtiesResponse { specialties })
}
