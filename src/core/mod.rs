// Core algorithm exports
pub mod budget;
pub mod currency;
pub mod dss;
pub mod pricing;
pub mod scoring;

pub use budget::BudgetAnalysisService;
pub use currency::{Coordinates, CurrencyDetection, CurrencyService, DetectionRequest, DetectionSource};
pub use dss::DssService;
pub use pricing::PricingService;
pub use scoring::{calculate_risk_level, calculate_value_rating, RecommendationEngine, ServiceScore};
