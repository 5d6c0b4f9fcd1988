// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ConditionReport, Confidence, Provider, ProviderQuery, RankedProvider, SearchOutcome};
pub use requests::{NearbySearchRequest, ResolveSpecialtiesRequest};
pub use responses::{ErrorResponse, HealthResponse, NearbySearchResponse, ResolveSpecialtiesResponse, SearchLocation};
