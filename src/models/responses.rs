use serde::{Deserialize, Serialize};

use crate::models::domain::RankedProvider;

/// The location a search was answered for, echoed back to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
}

/// Response for the nearby-provider search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbySearchResponse {
    pub success: bool,
    pub doctors: Vec<RankedProvider>,
    pub location: SearchLocation,
    #[serde(rename = "searchRadius")]
    pub search_radius: f64,
    #[serde(rename = "totalFound")]
    pub total_found: usize,
}

/// Response for the specialty resolution endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveSpecialtiesResponse {
    pub specialties: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "totalProviders")]
    pub total_providers: Option<i64>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
