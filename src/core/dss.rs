use crate::core::currency::CurrencyService;
use crate::core::scoring::RecommendationEngine;
use crate::models::{Criteria, Recommendation, Service};

/// Decision-support orchestrator: scores every listing and ranks them
///
/// # Pipeline
/// 1. Resolve the couple's country (explicit code, else from location)
/// 2. Score each listing with the `RecommendationEngine`
/// 3. Sort by score descending, then cheaper first, then by id
#[derive(Debug, Clone, Copy, Default)]
pub struct DssService {
    engine: RecommendationEngine,
}

impl DssService {
    pub fn new(engine: RecommendationEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    /// Country used for pricing a set of criteria
    pub fn resolve_country(&self, criteria: &Criteria) -> String {
        criteria
            .country_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_ascii_uppercase)
            .unwrap_or_else(|| CurrencyService::country_for_location(&criteria.location))
    }

    /// Score and rank every listing
    ///
    /// The result is recomputed on every call and is non-increasing in
    /// score.
    pub fn generate_recommendations(&self, services: &[Service], criteria: &Criteria) -> Vec<Recommendation> {
        let country_code = self.resolve_country(criteria);

        let mut recommendations: Vec<Recommendation> = services
            .iter()
            .map(|service| {
                self.engine.recommend(
                    service,
                    criteria.budget,
                    &criteria.location,
                    &criteria.priorities,
                    &country_code,
                )
            })
            .collect();

        recommendations.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| {
                    a.estimated_cost
                        .partial_cmp(&b.estimated_cost)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then_with(|| a.service_id.cmp(&b.service_id))
        });

        tracing::debug!(
            "Ranked {} listings for country {} (budget {})",
            recommendations.len(),
            country_code,
            criteria.budget
        );

        recommendations
    }
}
