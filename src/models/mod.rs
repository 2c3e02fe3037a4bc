// Model exports
pub mod backend;
pub mod domain;
pub mod requests;
pub mod responses;

pub use backend::{BackendAck, BookingRequest, ContactVendorRequest, SaveRecommendationRequest, ServiceQuery, VendorQuery};
pub use domain::{BudgetAnalysis, Criteria, CurrencyConfig, PriceRange, PriceTier, PriorityThresholds, PriorityTier, Recommendation, RiskLevel, ScoringWeights, Service, VendorProfile};
pub use requests::{BudgetAnalysisRequest, CurrencyDetectQuery, CurrencyFormatQuery, ListingSource, PricingQuery, RecommendationRequest};
pub use responses::{CurrencySummary, ErrorResponse, FormatCurrencyResponse, HealthResponse, PriceEstimateResponse, RecommendationResponse};
