use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::ConditionReport;

/// Request to find providers near the caller
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearbySearchRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    pub city: String,
    /// Nearby-city expansion radius in kilometers
    #[serde(default = "default_radius_km")]
    pub radius: f64,
    /// Specialty filter, typically the output of specialty resolution
    #[serde(default)]
    pub specialties: Vec<String>,
}

fn default_radius_km() -> f64 {
    25.0
}

/// Request to resolve diagnosed conditions into provider specialties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveSpecialtiesRequest {
    #[serde(default)]
    pub conditions: Vec<ConditionReport>,
}
