use std::collections::BTreeMap;
use crate::models::{BudgetAnalysis, Recommendation};

/// Number of top recommendations counted against the budget
pub const DEFAULT_TOP_N: usize = 10;

const ADVISORIES: &[&str] = &[
    "Book your venue and photographer first; they fill up earliest",
    "Keep 10-15% of the budget aside for unexpected costs",
    "Ask vendors about package discounts when booking multiple services",
    "Confirm what each quote includes before paying a deposit",
];

/// Sums the estimated cost of the best-scored listings against a budget
#[derive(Debug, Clone, Copy)]
pub struct BudgetAnalysisService {
    top_n: usize,
}

impl Default for BudgetAnalysisService {
    fn default() -> Self {
        Self { top_n: DEFAULT_TOP_N }
    }
}

impl BudgetAnalysisService {
    pub fn new(top_n: usize) -> Self {
        Self { top_n: top_n.max(1) }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Analyze the top N recommendations, ranked the same way as
    /// `DssService`; input order does not matter
    pub fn analyze(&self, recommendations: &[Recommendation], budget: f64) -> BudgetAnalysis {
        let mut ranked: Vec<&Recommendation> = recommendations.iter().collect();
        ranked.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| {
                    a.estimated_cost
                        .partial_cmp(&b.estimated_cost)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then_with(|| a.service_id.cmp(&b.service_id))
        });
        ranked.truncate(self.top_n);

        let mut category_breakdown: BTreeMap<String, f64> = BTreeMap::new();
        let mut total_estimated_cost = 0.0;
        for recommendation in &ranked {
            let cost = if recommendation.estimated_cost.is_finite() {
                recommendation.estimated_cost.max(0.0)
            } else {
                0.0
            };
            total_estimated_cost += cost;
            *category_breakdown
                .entry(recommendation.category.clone())
                .or_insert(0.0) += cost;
        }

        let has_budget = budget.is_finite() && budget > 0.0;
        let budget_utilization = if has_budget {
            total_estimated_cost / budget * 100.0
        } else {
            0.0
        };

        BudgetAnalysis {
            total_estimated_cost,
            budget,
            budget_utilization,
            remaining_budget: budget - total_estimated_cost,
            over_budget: has_budget && total_estimated_cost > budget,
            considered: ranked.len(),
            category_breakdown,
            recommendations: ADVISORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PriorityTier, RiskLevel};

    fn recommendation(id: &str, category: &str, score: u8, cost: f64) -> Recommendation {
        Recommendation {
            service_id: id.to_string(),
            service_name: id.to_string(),
            score,
            reasons: vec![],
            priority: PriorityTier::Medium,
            category: category.to_string(),
            estimated_cost: cost,
            value_rating: 7,
            risk_level: RiskLevel::Medium,
        }
    }

    #[test]
    fn test_only_top_n_counted() {
        let service = BudgetAnalysisService::new(2);
        let recs = vec![
            recommendation("low", "Cake", 10, 9000.0),
            recommendation("high", "Venue", 90, 5000.0),
            recommendation("mid", "Catering", 50, 3000.0),
        ];

        let analysis = service.analyze(&recs, 10000.0);
        assert_eq!(analysis.considered, 2);
        assert_eq!(analysis.total_estimated_cost, 8000.0);
        assert_eq!(analysis.budget_utilization, 80.0);
        assert_eq!(analysis.remaining_budget, 2000.0);
        assert!(!analysis.over_budget);
        assert!(!analysis.category_breakdown.contains_key("Cake"));
    }

    #[test]
    fn test_over_budget() {
        let service = BudgetAnalysisService::default();
        let recs = vec![
            recommendation("a", "Venue", 80, 7000.0),
            recommendation("b", "Venue", 70, 6000.0),
        ];

        let analysis = service.analyze(&recs, 10000.0);
        assert!(analysis.over_budget);
        assert_eq!(analysis.category_breakdown["Venue"], 13000.0);
        assert_eq!(analysis.remaining_budget, -3000.0);
    }

    #[test]
    fn test_zero_budget() {
        let analysis = BudgetAnalysisService::default()
            .analyze(&[recommendation("a", "Venue", 80, 7000.0)], 0.0);
        assert_eq!(analysis.budget_utilization, 0.0);
        assert!(!analysis.over_budget);
    }

    #[test]
    fn test_advisories_are_fixed() {
        let empty = BudgetAnalysisService::default().analyze(&[], 5000.0);
        assert_eq!(empty.considered, 0);
        assert_eq!(empty.recommendations.len(), ADVISORIES.len());
    }
}
