use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{Criteria, Recommendation, Service};

/// Request to rank listings against a couple's criteria
///
/// When `services` is omitted the listings are fetched from the
/// marketplace backend, from the collection named by `source`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendationRequest {
    #[validate(nested)]
    pub criteria: Criteria,
    #[serde(default)]
    pub services: Option<Vec<Service>>,
    #[serde(default)]
    pub source: ListingSource,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1))]
    pub limit: u16,
}

/// Backend collection ranked when no listings are posted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingSource {
    /// `/api/services`
    #[default]
    Services,
    /// `/api/vendor-profiles`, one listing per vendor
    Vendors,
}

fn default_limit() -> u16 {
    20
}

/// Request to analyze budget consumption of already-scored listings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BudgetAnalysisRequest {
    pub recommendations: Vec<Recommendation>,
    #[validate(range(min = 0.0))]
    pub budget: f64,
}

/// Query for `GET /pricing/estimate`
#[derive(Debug, Clone, Deserialize)]
pub struct PricingQuery {
    pub category: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(rename = "priceRange", alias = "price_range", default)]
    pub price_range: Option<String>,
}

/// Query for `GET /currency/detect`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrencyDetectQuery {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub locale: Option<String>,
}

/// Query for `GET /currency/format`
///
/// `amount` is in `from` when given, otherwise already in `currency`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyFormatQuery {
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub from: Option<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}
