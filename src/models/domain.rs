use serde::{Deserialize, Serialize};

/// A row in the provider directory
///
/// Records are bulk-loaded once by the import step and read-only at query
/// time. Providers carry a city name instead of coordinates; distances are
/// approximated from the city gazetteer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: i64,
    pub name: String,
    pub category: String,
    #[serde(rename = "addressDetails")]
    pub address_details: String,
    pub city: String,
    pub rating: f64,
}

/// A provider annotated with its approximate distance from the caller
///
/// `distance` is in kilometers, rounded to one decimal place, and `None`
/// when the provider's city has no gazetteer entry. Unknown distances rank
/// after known ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedProvider {
    pub id: i64,
    pub name: String,
    pub category: String,
    #[serde(rename = "addressDetails")]
    pub address_details: String,
    pub city: String,
    pub rating: f64,
    pub distance: Option<f64>,
}

impl RankedProvider {
    pub fn new(provider: Provider, distance: Option<f64>) -> Self {
        Self {
            id: provider.id,
            name: provider.name,
            category: provider.category,
            address_details: provider.address_details,
            city: provider.city,
            rating: provider.rating,
            distance,
        }
    }
}

/// A diagnosed condition as reported by the diagnosis oracle
///
/// Free text from an external model; the resolver normalizes it before any
/// lookup. Confidence is carried through for clients but does not change
/// how specialties resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionReport {
    pub name: String,
    #[serde(default)]
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    #[default]
    Medium,
    Low,
}

/// One directory query: the capability surface the search stages rely on
///
/// Every filter is optional; unset filters match everything. Results are
/// always ordered by rating descending and capped at `limit`.
#[derive(Debug, Clone, Default)]
pub struct ProviderQuery {
    /// Case-insensitive substring match on the provider's city
    pub city_contains: Option<String>,
    /// Case-insensitive substring match against any of these city names
    pub cities: Vec<String>,
    /// Case-insensitive substring match against any of these categories
    pub categories: Vec<String>,
    /// Providers already accumulated by earlier stages
    pub exclude_ids: Vec<i64>,
    pub limit: usize,
}

/// Result of a nearby-provider search
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub providers: Vec<RankedProvider>,
    /// Count before the final cap was applied
    pub total_found: usize,
}
