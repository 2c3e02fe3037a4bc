use crate::core::currency::padded_words;
use crate::core::pricing::{canonical_category, PricingService};
use crate::models::{PriorityThresholds, PriorityTier, Recommendation, RiskLevel, ScoringWeights, Service};

/// Categories every wedding needs; they earn a small bonus
const ESSENTIAL_CATEGORIES: &[&str] = &["venue", "catering", "photography"];

const MAX_REASONS: usize = 6;

/// Breakdown of a single listing's score
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceScore {
    pub score: u8,
    pub reasons: Vec<String>,
    pub priority: PriorityTier,
    pub estimated_cost: f64,
}

/// Rule-based scorer for a single listing
///
/// Scoring formula (defaults in points):
/// score = (
///     rating_score      * 25 +   # rating / 5
///     popularity_score  * 25 +   # review count bands
///     price_fit_score   * 30 +   # estimated cost / budget bands
///     suitability_score * 15 +   # location match, availability, features
///     priority_score    * 10 +   # category is one of the couple's priorities
///     essential_bonus            # venue, catering, photography
/// ) clamped to 0..=100
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine {
    weights: ScoringWeights,
    thresholds: PriorityThresholds,
}

impl RecommendationEngine {
    pub fn new(weights: ScoringWeights, thresholds: PriorityThresholds) -> Self {
        Self { weights, thresholds }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score one listing against a budget, location and priority list
    ///
    /// Deterministic for identical inputs; the score is always in 0..=100.
    pub fn score_service(
        &self,
        service: &Service,
        budget: f64,
        location: &str,
        priorities: &[String],
        country_code: &str,
    ) -> ServiceScore {
        let mut reasons = Vec::new();
        let weights = &self.weights;

        // Rating
        let rating_score = calculate_rating_score(service.rating);
        if service.rating >= 4.5 {
            reasons.push(format!("Exceptional rating of {:.1}★", service.rating));
        } else if service.rating >= 4.0 {
            reasons.push(format!("Highly rated at {:.1}★", service.rating));
        }

        // Popularity
        let popularity_score = calculate_popularity_score(service.review_count);
        if service.review_count >= 100 {
            reasons.push(format!("Trusted by {} reviewers", service.review_count));
        } else if service.review_count >= 50 {
            reasons.push(format!("Popular choice with {} reviews", service.review_count));
        }

        // Price fit
        let estimated_cost = PricingService::estimate_service_cost(service, country_code);
        let price_fit_score = calculate_price_fit_score(estimated_cost, budget);
        if let Some(reason) = price_fit_reason(estimated_cost, budget) {
            reasons.push(reason.to_string());
        }

        // Suitability
        let location_match = locations_match(&service.location, location);
        let suitability_score =
            calculate_suitability_score(location_match, service.availability, service.features.len());
        if location_match {
            reasons.push("Located in your area".to_string());
        }
        if service.availability {
            reasons.push("Available for booking".to_string());
        }
        if service.features.len() >= 5 {
            reasons.push(format!("Comprehensive package with {} features", service.features.len()));
        }

        // Priority
        let matches_priority = is_priority_category(&service.category, priorities);
        let priority_score = calculate_priority_score(matches_priority, priorities.is_empty());
        if matches_priority {
            reasons.push(format!("Matches your priority: {}", service.category));
        }

        let essential = is_essential_category(&service.category);
        if essential {
            reasons.push("Essential wedding service".to_string());
        }

        let total = rating_score * weights.rating
            + popularity_score * weights.popularity
            + price_fit_score * weights.price_fit
            + suitability_score * weights.suitability
            + priority_score * weights.priority
            + if essential { weights.essential_bonus } else { 0.0 };

        let score = if total.is_finite() {
            total.clamp(0.0, 100.0).round() as u8
        } else {
            0
        };

        reasons.truncate(MAX_REASONS);

        ServiceScore {
            score,
            reasons,
            priority: self.thresholds.tier(score),
            estimated_cost,
        }
    }

    /// Score a listing and attach value and risk assessments
    pub fn recommend(
        &self,
        service: &Service,
        budget: f64,
        location: &str,
        priorities: &[String],
        country_code: &str,
    ) -> Recommendation {
        let scored = self.score_service(service, budget, location, priorities, country_code);

        Recommendation {
            service_id: service.id.clone(),
            service_name: service.display_name().to_string(),
            score: scored.score,
            reasons: scored.reasons,
            priority: scored.priority,
            category: service.category.clone(),
            estimated_cost: scored.estimated_cost,
            value_rating: calculate_value_rating(service),
            risk_level: calculate_risk_level(service),
        }
    }
}

/// Rating score (0-1), linear in the 0-5 star rating
#[inline]
fn calculate_rating_score(rating: f64) -> f64 {
    if !rating.is_finite() {
        return 0.0;
    }
    rating.clamp(0.0, 5.0) / 5.0
}

/// Popularity score (0-1) from review count bands
#[inline]
fn calculate_popularity_score(review_count: u32) -> f64 {
    match review_count {
        100.. => 1.0,
        50..=99 => 0.8,
        20..=49 => 0.6,
        _ => 0.4,
    }
}

/// Price fit score (0-1) from the cost to budget ratio
///
/// Without a positive budget the listing gets the lowest band.
#[inline]
fn calculate_price_fit_score(estimated_cost: f64, budget: f64) -> f64 {
    const LOWEST: f64 = 10.0 / 30.0;

    if !(budget > 0.0) || !estimated_cost.is_finite() {
        return LOWEST;
    }

    let ratio = estimated_cost / budget;
    if ratio <= 0.30 {
        1.0
    } else if ratio <= 0.70 {
        25.0 / 30.0
    } else if ratio <= 1.10 {
        18.0 / 30.0
    } else {
        LOWEST
    }
}

fn price_fit_reason(estimated_cost: f64, budget: f64) -> Option<&'static str> {
    if !(budget > 0.0) || !estimated_cost.is_finite() {
        return None;
    }

    let ratio = estimated_cost / budget;
    Some(if ratio <= 0.30 {
        "Well within your budget"
    } else if ratio <= 0.70 {
        "Fits comfortably in your budget"
    } else if ratio <= 1.10 {
        "Close to your budget"
    } else {
        "Above your budget"
    })
}

/// Suitability score (0-1): 8 points for location, 4 for availability
/// and up to 3 for listed features, out of 15
#[inline]
fn calculate_suitability_score(location_match: bool, available: bool, feature_count: usize) -> f64 {
    let mut points = 0.0;
    if location_match {
        points += 8.0;
    }
    if available {
        points += 4.0;
    }
    points += feature_count.min(3) as f64;
    points / 15.0
}

/// Priority score (0-1); neutral when the couple named no priorities
#[inline]
fn calculate_priority_score(matches_priority: bool, no_priorities: bool) -> f64 {
    if matches_priority {
        1.0
    } else if no_priorities {
        0.5
    } else {
        0.0
    }
}

/// Case-insensitive whole-word containment in either direction; blanks
/// never match
pub fn locations_match(service_location: &str, wanted: &str) -> bool {
    match (padded_words(service_location), padded_words(wanted)) {
        (Some(service_location), Some(wanted)) => {
            service_location.contains(&wanted) || wanted.contains(&service_location)
        }
        _ => false,
    }
}

fn is_priority_category(category: &str, priorities: &[String]) -> bool {
    let category = category.trim();
    if category.is_empty() {
        return false;
    }

    let canonical = canonical_category(category);
    priorities.iter().any(|p| {
        let p = p.trim();
        p.eq_ignore_ascii_case(category)
            || (canonical.is_some() && canonical_category(p) == canonical)
    })
}

fn is_essential_category(category: &str) -> bool {
    canonical_category(category)
        .map(|c| ESSENTIAL_CATEGORIES.contains(&c))
        .unwrap_or(false)
}

/// Value for money on a 1-10 scale
pub fn calculate_value_rating(service: &Service) -> u8 {
    let rating = service.rating;
    let base: u8 = if rating >= 4.8 {
        10
    } else if rating >= 4.5 {
        9
    } else if rating >= 4.0 {
        8
    } else if rating >= 3.5 {
        7
    } else if rating >= 3.0 {
        6
    } else {
        5
    };

    // Few reviews means the rating is weak evidence
    let adjusted = if service.review_count < 10 { base - 1 } else { base };
    adjusted.max(1)
}

/// Booking risk from rating and track record
pub fn calculate_risk_level(service: &Service) -> RiskLevel {
    if service.rating >= 4.5 && service.review_count >= 50 {
        RiskLevel::Low
    } else if service.rating < 3.5 || service.review_count < 5 {
        RiskLevel::High
    } else {
        RiskLevel::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PriceRange, PriceTier};

    fn create_test_service(category: &str, rating: f64, review_count: u32) -> Service {
        Service {
            id: "svc_1".to_string(),
            name: Some("Test Service".to_string()),
            vendor_id: None,
            category: category.to_string(),
            rating,
            review_count,
            price_range: Some(PriceRange::Tier(PriceTier::Premium)),
            location: "New York".to_string(),
            features: vec!["a".to_string(), "b".to_string()],
            availability: true,
        }
    }

    fn priorities(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_score_within_range() {
        let engine = RecommendationEngine::default();
        let service = create_test_service("Photography", 4.2, 30);

        let scored = engine.score_service(&service, 10000.0, "New York", &priorities(&["Photography"]), "US");

        assert!(scored.score <= 100);
        assert!(scored.reasons.len() <= MAX_REASONS);
        assert_eq!(scored.estimated_cost, 5000.0);
    }

    #[test]
    fn test_score_is_clamped() {
        let engine = RecommendationEngine::default();
        let mut service = create_test_service("Venue", 5.0, 500);
        service.features = (0..8).map(|i| i.to_string()).collect();
        service.price_range = Some(PriceRange::Amount(100.0));

        let scored = engine.score_service(&service, 100000.0, "New York", &priorities(&["Venue"]), "US");
        assert_eq!(scored.score, 100);
        assert_eq!(scored.priority, PriorityTier::High);
        assert_eq!(scored.reasons.len(), MAX_REASONS);
    }

    #[test]
    fn test_exact_point_totals() {
        let engine = RecommendationEngine::default();
        // 3.0 stars -> 15, 10 reviews -> 10, ratio 0.5 -> 25,
        // no location match + available + 2 features -> 6, no priorities -> 5
        let mut service = create_test_service("Lighting", 3.0, 10);
        service.location = "Chicago".to_string();

        let scored = engine.score_service(&service, 10000.0, "Boston", &[], "US");
        assert_eq!(scored.score, 61);
        assert_eq!(scored.priority, PriorityTier::Medium);
    }

    #[test]
    fn test_price_fit_bands() {
        assert_eq!(calculate_price_fit_score(300.0, 1000.0), 1.0);
        assert!((calculate_price_fit_score(700.0, 1000.0) * 30.0 - 25.0).abs() < 1e-9);
        assert!((calculate_price_fit_score(1100.0, 1000.0) * 30.0 - 18.0).abs() < 1e-9);
        assert!((calculate_price_fit_score(1101.0, 1000.0) * 30.0 - 10.0).abs() < 1e-9);
        assert!((calculate_price_fit_score(100.0, 0.0) * 30.0 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_popularity_bands() {
        assert_eq!(calculate_popularity_score(0), 0.4);
        assert_eq!(calculate_popularity_score(20), 0.6);
        assert_eq!(calculate_popularity_score(50), 0.8);
        assert_eq!(calculate_popularity_score(127), 1.0);
    }

    #[test]
    fn test_locations_match() {
        assert!(locations_match("Makati City, Metro Manila", "makati"));
        assert!(locations_match("Cebu", "Cebu City"));
        assert!(!locations_match("Cebu", "Davao"));
        assert!(!locations_match("", "Cebu"));
        assert!(!locations_match("Cebu", "  "));
    }

    #[test]
    fn test_locations_match_whole_words_only() {
        assert!(!locations_match("Sunnyvale", "NY"));
        assert!(!locations_match("NY", "Sunnyvale"));
        assert!(!locations_match("Pasig", "Pasay"));
        assert!(locations_match("Brooklyn, NY", "ny"));
        assert!(locations_match("Quezon City", "quezon-city"));
        assert!(locations_match("Tagaytay", "Tagaytay, Cavite"));
    }

    #[test]
    fn test_priority_matching_uses_aliases() {
        assert!(is_priority_category("Photographer", &priorities(&["photography"])));
        assert!(is_priority_category("Custom Thing", &priorities(&["custom thing"])));
        assert!(!is_priority_category("Catering", &priorities(&["Venue"])));
        assert!(!is_priority_category("", &priorities(&[""])));
    }

    #[test]
    fn test_essential_bonus() {
        let engine = RecommendationEngine::default();
        let essential = create_test_service("Catering", 4.0, 30);
        let other = create_test_service("Lighting", 4.0, 30);

        let a = engine.score_service(&essential, 20000.0, "Denver", &[], "US");
        let b = engine.score_service(&other, 20000.0, "Denver", &[], "US");
        assert_eq!(a.score, b.score + 2);
    }

    #[test]
    fn test_value_rating() {
        assert_eq!(calculate_value_rating(&create_test_service("Venue", 4.9, 100)), 10);
        assert_eq!(calculate_value_rating(&create_test_service("Venue", 4.6, 3)), 8);
        assert_eq!(calculate_value_rating(&create_test_service("Venue", 2.0, 0)), 4);
    }

    #[test]
    fn test_risk_level() {
        assert_eq!(calculate_risk_level(&create_test_service("Venue", 4.7, 80)), RiskLevel::Low);
        assert_eq!(calculate_risk_level(&create_test_service("Venue", 4.7, 2)), RiskLevel::High);
        assert_eq!(calculate_risk_level(&create_test_service("Venue", 3.2, 200)), RiskLevel::High);
        assert_eq!(calculate_risk_level(&create_test_service("Venue", 4.0, 20)), RiskLevel::Medium);
    }
}
