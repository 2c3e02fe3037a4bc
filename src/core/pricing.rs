use crate::core::currency::CurrencyService;
use crate::models::{PriceRange, PriceTier, Service};

/// Reference price (USD) used for categories missing from the table
pub const DEFAULT_CATEGORY_PRICE: f64 = 2500.0;

/// Multiplier used for countries missing from the table
pub const DEFAULT_REGIONAL_MULTIPLIER: f64 = 1.0;

/// Reference prices per category, in USD
const CATEGORY_PRICES: &[(&str, f64)] = &[
    ("venue", 8000.0),
    ("catering", 6000.0),
    ("photography", 2500.0),
    ("videography", 2200.0),
    ("planning", 3000.0),
    ("florist", 1800.0),
    ("music", 1500.0),
    ("attire", 1600.0),
    ("beauty", 800.0),
    ("cake", 600.0),
    ("transportation", 900.0),
    ("officiant", 500.0),
    ("rentals", 1200.0),
    ("invitations", 400.0),
    ("jewelry", 2000.0),
    ("lighting", 1000.0),
    ("decoration", 1500.0),
];

const CATEGORY_ALIASES: &[(&str, &str)] = &[
    ("venues", "venue"),
    ("reception", "venue"),
    ("caterer", "catering"),
    ("food", "catering"),
    ("photographer", "photography"),
    ("photo", "photography"),
    ("videographer", "videography"),
    ("video", "videography"),
    ("planner", "planning"),
    ("coordinator", "planning"),
    ("coordination", "planning"),
    ("flowers", "florist"),
    ("floral", "florist"),
    ("florists", "florist"),
    ("dj", "music"),
    ("band", "music"),
    ("entertainment", "music"),
    ("bridal", "attire"),
    ("gowns", "attire"),
    ("makeup", "beauty"),
    ("hair and makeup", "beauty"),
    ("cakes", "cake"),
    ("bakery", "cake"),
    ("transport", "transportation"),
    ("cars", "transportation"),
    ("stationery", "invitations"),
    ("decor", "decoration"),
    ("decorations", "decoration"),
    ("styling", "decoration"),
];

/// Regional price level relative to the US
const REGIONAL_MULTIPLIERS: &[(&str, f64)] = &[
    ("US", 1.0),
    ("CA", 0.95),
    ("GB", 1.1),
    ("AU", 1.05),
    ("JP", 1.2),
    ("SG", 1.15),
    ("IN", 0.3),
    ("PH", 0.4),
    ("DE", 1.0),
    ("FR", 1.1),
    ("IT", 1.05),
    ("ES", 0.9),
];

/// Static price model: category reference prices, tier prices and
/// regional multipliers. All lookups are total.
///
/// Tables hold USD reference prices. Every estimate is returned in the
/// local currency of `country_code`, the same unit as the couple's
/// budget: reference × regional multiplier × exchange rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingService;

impl PricingService {
    /// Estimated price of a category, in the country's currency
    pub fn get_category_price(category: &str, country_code: &str) -> f64 {
        let base = canonical_category(category)
            .and_then(|key| CATEGORY_PRICES.iter().find(|(c, _)| *c == key))
            .map(|(_, price)| *price)
            .unwrap_or(DEFAULT_CATEGORY_PRICE);

        Self::localize(base, country_code)
    }

    /// Price of a tier symbol (`$`..`$$$$`) in the country's currency,
    /// `None` for anything that is not a tier
    pub fn parse_price_range(tier: &str, country_code: &str) -> Option<f64> {
        PriceTier::from_symbol(tier).map(|tier| Self::tier_price(tier, country_code))
    }

    pub fn tier_price(tier: PriceTier, country_code: &str) -> f64 {
        let base = match tier {
            PriceTier::Budget => 1000.0,
            PriceTier::Moderate => 2500.0,
            PriceTier::Premium => 5000.0,
            PriceTier::Luxury => 10000.0,
        };
        Self::localize(base, country_code)
    }

    pub fn regional_multiplier(country_code: &str) -> f64 {
        let country = country_code.trim();
        REGIONAL_MULTIPLIERS
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(country))
            .map(|(_, m)| *m)
            .unwrap_or(DEFAULT_REGIONAL_MULTIPLIER)
    }

    /// Local-currency amount for a USD reference price
    pub fn localize(reference: f64, country_code: &str) -> f64 {
        let rate = CurrencyService::currency_for_country(country_code).rate;
        reference * Self::regional_multiplier(country_code) * rate
    }

    /// Estimated cost of a listing, in the country's currency
    pub fn estimate_service_cost(service: &Service, country_code: &str) -> f64 {
        Self::estimate_cost(&service.category, service.price_range, country_code)
    }

    /// Estimated cost from a category and an optional listed price
    ///
    /// Listed amounts are already in the local currency and are taken
    /// as-is; tiers and the category fallback are localized.
    pub fn estimate_cost(category: &str, price_range: Option<PriceRange>, country_code: &str) -> f64 {
        match price_range {
            Some(PriceRange::Amount(amount)) => amount,
            Some(PriceRange::Tier(tier)) => Self::tier_price(tier, country_code),
            None => Self::get_category_price(category, country_code),
        }
    }
}

/// Canonical table key for a category name, e.g. "Wedding Photographer"
/// becomes "photography"
pub(crate) fn canonical_category(category: &str) -> Option<&'static str> {
    let normalized = normalize_category(category);
    if normalized.is_empty() {
        return None;
    }

    let lookup = |name: &str| -> Option<&'static str> {
        CATEGORY_PRICES
            .iter()
            .map(|(c, _)| *c)
            .find(|c| *c == name)
            .or_else(|| {
                CATEGORY_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == name)
                    .map(|(_, c)| *c)
            })
    };

    lookup(&normalized).or_else(|| {
        normalized
            .strip_prefix("wedding ")
            .and_then(|rest| lookup(rest))
    })
}

fn normalize_category(category: &str) -> String {
    category
        .trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
        .replace('&', " and ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(category: &str, price_range: Option<PriceRange>) -> Service {
        Service {
            id: "svc".to_string(),
            name: None,
            vendor_id: None,
            category: category.to_string(),
            rating: 4.0,
            review_count: 10,
            price_range,
            location: String::new(),
            features: vec![],
            availability: true,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_category_price_with_multiplier() {
        assert_eq!(PricingService::get_category_price("Photography", "US"), 2500.0);
        // 2500 * 0.4 * 56 PHP per USD
        assert!(approx(PricingService::get_category_price("photography", "ph"), 56000.0));
        assert!(approx(PricingService::get_category_price("Venue", "GB"), 8000.0 * 1.1 * 0.79));
    }

    #[test]
    fn test_category_aliases() {
        assert_eq!(canonical_category("Wedding Photographer"), Some("photography"));
        assert_eq!(canonical_category("hair-and-makeup"), Some("beauty"));
        assert_eq!(canonical_category("Hair & Makeup"), Some("beauty"));
        assert_eq!(canonical_category("DJ"), Some("music"));
        assert_eq!(canonical_category("Wedding Planning"), Some("planning"));
        assert_eq!(canonical_category("fireworks"), None);
    }

    #[test]
    fn test_category_price_defaults() {
        assert_eq!(PricingService::get_category_price("fireworks", "US"), DEFAULT_CATEGORY_PRICE);
        assert_eq!(PricingService::get_category_price("", ""), DEFAULT_CATEGORY_PRICE);
        assert_eq!(PricingService::get_category_price("Catering", "ZZ"), 6000.0);
    }

    #[test]
    fn test_parse_price_range() {
        assert_eq!(PricingService::parse_price_range("$", "US"), Some(1000.0));
        assert_eq!(PricingService::parse_price_range("$$$$", "US"), Some(10000.0));
        assert!(approx(PricingService::parse_price_range("$$", "PH").unwrap(), 56000.0));
        assert_eq!(PricingService::parse_price_range("cheap", "US"), None);
    }

    #[test]
    fn test_estimate_service_cost() {
        let explicit = service("Venue", Some(PriceRange::Amount(420000.0)));
        assert_eq!(PricingService::estimate_service_cost(&explicit, "PH"), 420000.0);

        let tiered = service("Venue", Some(PriceRange::Tier(PriceTier::Premium)));
        assert_eq!(PricingService::estimate_service_cost(&tiered, "US"), 5000.0);

        let unpriced = service("Catering", None);
        assert!(approx(PricingService::estimate_service_cost(&unpriced, "PH"), 134400.0));
    }

    #[test]
    fn test_listed_and_tier_prices_share_a_unit() {
        // A luxury tier in PH costs more pesos than a listed ₱40,000 package
        let listed = service("Venue", PriceRange::parse("₱40,000"));
        let luxury = service("Venue", Some(PriceRange::Tier(PriceTier::Luxury)));

        let listed_cost = PricingService::estimate_service_cost(&listed, "PH");
        let luxury_cost = PricingService::estimate_service_cost(&luxury, "PH");
        assert_eq!(listed_cost, 40000.0);
        assert!(approx(luxury_cost, 224000.0));
        assert!(listed_cost < luxury_cost);
    }

    #[test]
    fn test_localize_unknown_country_is_usd() {
        assert_eq!(PricingService::localize(1234.0, "ZZ"), 1234.0);
    }
}
