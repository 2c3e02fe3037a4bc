//! Bazaar DSS - Decision support service for the Wedding Bazaar marketplace
//!
//! This library scores vendor listings against a couple's budget, location
//! and priorities, ranks them, and reports how the best of them fit the
//! budget. Prices are estimated from static category and tier tables,
//! scaled by regional multipliers and converted into the couple's local
//! currency, the same unit as their budget.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{BudgetAnalysisService, CurrencyService, DssService, PricingService, RecommendationEngine};
pub use models::{BudgetAnalysis, Criteria, Recommendation, ScoringWeights, Service};
