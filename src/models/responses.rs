use serde::{Deserialize, Serialize};
use crate::models::domain::{BudgetAnalysis, CurrencyConfig, Recommendation};

/// Response for the recommendations endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<Recommendation>,
    #[serde(rename = "budgetAnalysis")]
    pub budget_analysis: BudgetAnalysis,
    pub currency: CurrencySummary,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Currency the amounts should be displayed in
#[derive(Debug, Clone, Serialize)]
pub struct CurrencySummary {
    #[serde(rename = "countryCode")]
    pub country_code: String,
    #[serde(flatten)]
    pub currency: CurrencyConfig,
}

/// Response for the pricing estimate endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceEstimateResponse {
    pub category: String,
    #[serde(rename = "countryCode")]
    pub country_code: String,
    #[serde(rename = "estimatedCost")]
    pub estimated_cost: f64,
}

/// Response for the currency format endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatCurrencyResponse {
    pub amount: f64,
    pub currency: String,
    pub formatted: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
