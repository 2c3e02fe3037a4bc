use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use validator::Validate;

/// A vendor's bookable offering (photography package, venue, ...)
///
/// The marketplace backend is not consistent about field casing or
/// numeric encoding, so every field accepts both camelCase and
/// snake_case and numbers may arrive as strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: String,
    #[serde(default, alias = "title", alias = "service_name", alias = "serviceName")]
    pub name: Option<String>,
    #[serde(rename = "vendorId", alias = "vendor_id", default, deserialize_with = "de::opt_string_or_number")]
    pub vendor_id: Option<String>,
    #[serde(default, deserialize_with = "de::string_or_empty")]
    pub category: String,
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub rating: f64,
    #[serde(rename = "reviewCount", alias = "review_count", default, deserialize_with = "de::lenient_u32")]
    pub review_count: u32,
    #[serde(rename = "priceRange", alias = "price_range", default, deserialize_with = "de::price_range")]
    pub price_range: Option<PriceRange>,
    #[serde(default, deserialize_with = "de::string_or_empty")]
    pub location: String,
    #[serde(default, deserialize_with = "de::string_list")]
    pub features: Vec<String>,
    #[serde(default = "default_true", alias = "available", deserialize_with = "de::bool_or_true")]
    pub availability: bool,
}

impl Service {
    /// Display name, falling back to the id when the listing has none
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

fn default_true() -> bool { true }

/// Vendor profile as returned by `/api/vendor-profiles`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorProfile {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: String,
    #[serde(rename = "businessName", alias = "business_name", alias = "name", default, deserialize_with = "de::string_or_empty")]
    pub business_name: String,
    #[serde(rename = "businessType", alias = "business_type", alias = "category", default, deserialize_with = "de::string_or_empty")]
    pub business_type: String,
    #[serde(default, deserialize_with = "de::string_or_empty")]
    pub location: String,
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub rating: f64,
    #[serde(rename = "reviewCount", alias = "review_count", default, deserialize_with = "de::lenient_u32")]
    pub review_count: u32,
    #[serde(default, deserialize_with = "de::bool_or_false")]
    pub verified: bool,
    #[serde(rename = "startingPrice", alias = "starting_price", default, deserialize_with = "de::opt_f64")]
    pub starting_price: Option<f64>,
    #[serde(default, deserialize_with = "de::string_list")]
    pub specialties: Vec<String>,
}

impl From<VendorProfile> for Service {
    fn from(profile: VendorProfile) -> Self {
        Service {
            vendor_id: Some(profile.id.clone()),
            id: profile.id,
            name: Some(profile.business_name).filter(|n| !n.is_empty()),
            category: profile.business_type,
            rating: profile.rating,
            review_count: profile.review_count,
            price_range: profile.starting_price.map(PriceRange::Amount),
            location: profile.location,
            features: profile.specialties,
            availability: true,
        }
    }
}

/// Coarse price bucket used when a listing has no numeric price
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriceTier {
    Budget,
    Moderate,
    Premium,
    Luxury,
}

impl PriceTier {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            "$" => Some(PriceTier::Budget),
            "$$" => Some(PriceTier::Moderate),
            "$$$" => Some(PriceTier::Premium),
            "$$$$" => Some(PriceTier::Luxury),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            PriceTier::Budget => "$",
            PriceTier::Moderate => "$$",
            PriceTier::Premium => "$$$",
            PriceTier::Luxury => "$$$$",
        }
    }
}

/// Listing price: a tier symbol or an explicit amount
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceRange {
    Tier(PriceTier),
    Amount(f64),
}

impl PriceRange {
    /// Parse `$`..`$$$$`, a plain number, or a range such as
    /// `"₱25,000 - ₱50,000"` (the midpoint is used)
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if trimmed.chars().all(|c| c == '$') {
            return PriceTier::from_symbol(trimmed).map(PriceRange::Tier);
        }

        let amounts = extract_amounts(trimmed);
        match amounts.as_slice() {
            [] => None,
            [single] => Some(PriceRange::Amount(*single)),
            [low, high, ..] => Some(PriceRange::Amount((low + high) / 2.0)),
        }
    }
}

/// Pull every number out of a free-text price, ignoring currency
/// symbols and thousands separators. A trailing `k` or `m` that ends
/// the word scales by a thousand or a million ("₱25K", "₱1.2M").
fn extract_amounts(text: &str) -> Vec<f64> {
    let mut amounts = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().chain(std::iter::once(' ')).peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_digit() || (c == '.' && !current.is_empty()) {
            current.push(c);
            continue;
        }
        if c == ',' && !current.is_empty() {
            continue;
        }
        if current.is_empty() {
            continue;
        }

        let ends_word = chars.peek().map_or(true, |next| !next.is_alphanumeric());
        let scale = match c {
            'k' | 'K' if ends_word => 1_000.0,
            'm' | 'M' if ends_word => 1_000_000.0,
            _ => 1.0,
        };

        if let Ok(value) = current.trim_end_matches('.').parse::<f64>() {
            amounts.push(value * scale);
        }
        current.clear();
    }

    amounts
}

impl Serialize for PriceRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PriceRange::Tier(tier) => serializer.serialize_str(tier.symbol()),
            PriceRange::Amount(amount) => serializer.serialize_f64(*amount),
        }
    }
}

/// A couple's ranking criteria
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Criteria {
    #[validate(range(min = 0.0))]
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub budget: f64,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub location: String,
    #[validate(length(max = 25))]
    #[serde(default)]
    pub priorities: Vec<String>,
    #[serde(rename = "weddingDate", alias = "wedding_date", default)]
    pub wedding_date: Option<chrono::NaiveDate>,
    #[validate(range(max = 100000))]
    #[serde(rename = "guestCount", alias = "guest_count", default)]
    pub guest_count: Option<u32>,
    #[validate(length(equal = 2))]
    #[serde(rename = "countryCode", alias = "country_code", default)]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Scored listing, derived per request and never persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "serviceId")]
    pub service_id: String,
    #[serde(rename = "serviceName", default)]
    pub service_name: String,
    pub score: u8,
    pub reasons: Vec<String>,
    pub priority: PriorityTier,
    pub category: String,
    #[serde(rename = "estimatedCost")]
    pub estimated_cost: f64,
    #[serde(rename = "valueRating")]
    pub value_rating: u8,
    #[serde(rename = "riskLevel")]
    pub risk_level: RiskLevel,
}

/// Currency table entry; `rate` is units per 1 USD
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurrencyConfig {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
    pub rate: f64,
}

/// Budget consumption of the top recommendations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetAnalysis {
    #[serde(rename = "totalEstimatedCost")]
    pub total_estimated_cost: f64,
    pub budget: f64,
    #[serde(rename = "budgetUtilization")]
    pub budget_utilization: f64,
    #[serde(rename = "remainingBudget")]
    pub remaining_budget: f64,
    #[serde(rename = "overBudget")]
    pub over_budget: bool,
    pub considered: usize,
    #[serde(rename = "categoryBreakdown")]
    pub category_breakdown: BTreeMap<String, f64>,
    pub recommendations: Vec<String>,
}

/// Maximum points each scoring term can contribute
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub rating: f64,
    pub popularity: f64,
    pub price_fit: f64,
    pub suitability: f64,
    pub priority: f64,
    pub essential_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            rating: 25.0,
            popularity: 25.0,
            price_fit: 30.0,
            suitability: 15.0,
            priority: 10.0,
            essential_bonus: 2.0,
        }
    }
}

/// Score cut-offs for the priority tier
#[derive(Debug, Clone, Copy)]
pub struct PriorityThresholds {
    pub high: u8,
    pub medium: u8,
}

impl Default for PriorityThresholds {
    fn default() -> Self {
        Self { high: 65, medium: 40 }
    }
}

impl PriorityThresholds {
    pub fn tier(&self, score: u8) -> PriorityTier {
        if score >= self.high {
            PriorityTier::High
        } else if score >= self.medium {
            PriorityTier::Medium
        } else {
            PriorityTier::Low
        }
    }
}

/// Lenient field decoders for backend payloads
mod de {
    use super::PriceRange;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrText {
        Num(f64),
        Text(String),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrText {
        Bool(bool),
        Num(i64),
        Text(String),
    }

    pub fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Id {
            Int(i64),
            Num(f64),
            Text(String),
        }
        Ok(match Id::deserialize(d)? {
            Id::Int(n) => n.to_string(),
            Id::Num(n) => n.to_string(),
            Id::Text(s) => s,
        })
    }

    pub fn opt_string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Id {
            Int(i64),
            Text(String),
        }
        Ok(Option::<Id>::deserialize(d)?.map(|id| match id {
            Id::Int(n) => n.to_string(),
            Id::Text(s) => s,
        }))
    }

    pub fn string_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Option::<NumOrText>::deserialize(d)? {
            Some(NumOrText::Num(n)) => Some(n),
            Some(NumOrText::Text(s)) => s.trim().parse::<f64>().ok(),
            None => None,
        }
        .filter(|n| n.is_finite()))
    }

    pub fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(opt_f64(d)?.unwrap_or(0.0))
    }

    pub fn lenient_u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        Ok(opt_f64(d)?
            .filter(|n| *n >= 0.0)
            .map(|n| n.min(u32::MAX as f64) as u32)
            .unwrap_or(0))
    }

    pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(Option::<Vec<String>>::deserialize(d)?.unwrap_or_default())
    }

    fn opt_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        Ok(Option::<BoolOrText>::deserialize(d)?.and_then(|v| match v {
            BoolOrText::Bool(b) => Some(b),
            BoolOrText::Num(n) => Some(n != 0),
            BoolOrText::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
        }))
    }

    pub fn bool_or_true<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(opt_bool(d)?.unwrap_or(true))
    }

    pub fn bool_or_false<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(opt_bool(d)?.unwrap_or(false))
    }

    /// Unparseable prices become `None` so the category price is used
    pub fn price_range<'de, D: Deserializer<'de>>(d: D) -> Result<Option<PriceRange>, D::Error> {
        Ok(match Option::<NumOrText>::deserialize(d)? {
            Some(NumOrText::Num(n)) if n.is_finite() && n >= 0.0 => Some(PriceRange::Amount(n)),
            Some(NumOrText::Text(s)) => PriceRange::parse(&s),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_range_parse_tiers() {
        assert_eq!(PriceRange::parse("$"), Some(PriceRange::Tier(PriceTier::Budget)));
        assert_eq!(PriceRange::parse(" $$$ "), Some(PriceRange::Tier(PriceTier::Premium)));
        assert_eq!(PriceRange::parse("$$$$$"), None);
    }

    #[test]
    fn test_price_range_parse_amounts() {
        assert_eq!(PriceRange::parse("2500"), Some(PriceRange::Amount(2500.0)));
        assert_eq!(PriceRange::parse("₱25,000 - ₱50,000"), Some(PriceRange::Amount(37500.0)));
        assert_eq!(PriceRange::parse("from $1,200.50"), Some(PriceRange::Amount(1200.5)));
        assert_eq!(PriceRange::parse("call for pricing"), None);
        assert_eq!(PriceRange::parse(""), None);
    }

    #[test]
    fn test_price_range_parse_magnitude_suffix() {
        assert_eq!(PriceRange::parse("₱25K - ₱50K"), Some(PriceRange::Amount(37500.0)));
        assert_eq!(PriceRange::parse("₱25k-₱50k"), Some(PriceRange::Amount(37500.0)));
        assert_eq!(PriceRange::parse("₱1.2M"), Some(PriceRange::Amount(1_200_000.0)));
        // A unit word is not a magnitude
        assert_eq!(PriceRange::parse("5km shuttle"), Some(PriceRange::Amount(5.0)));
        assert_eq!(PriceRange::parse("2kg cake"), Some(PriceRange::Amount(2.0)));
    }

    #[test]
    fn test_service_lenient_decoding() {
        let json = serde_json::json!({
            "id": 42,
            "title": "Golden Hour Photos",
            "vendor_id": "v-7",
            "category": "Photography",
            "rating": "4.8",
            "review_count": "63",
            "price_range": "$$",
            "location": "Makati City",
            "features": null,
            "availability": null
        });

        let service: Service = serde_json::from_value(json).unwrap();
        assert_eq!(service.id, "42");
        assert_eq!(service.display_name(), "Golden Hour Photos");
        assert_eq!(service.vendor_id.as_deref(), Some("v-7"));
        assert!((service.rating - 4.8).abs() < f64::EPSILON);
        assert_eq!(service.review_count, 63);
        assert_eq!(service.price_range, Some(PriceRange::Tier(PriceTier::Moderate)));
        assert!(service.features.is_empty());
        assert!(service.availability);
    }

    #[test]
    fn test_unparseable_price_is_dropped() {
        let json = serde_json::json!({ "id": "s1", "priceRange": "ask us" });
        let service: Service = serde_json::from_value(json).unwrap();
        assert!(service.price_range.is_none());
    }

    #[test]
    fn test_vendor_profile_into_service() {
        let json = serde_json::json!({
            "id": "v-1",
            "business_name": "Bloom & Co",
            "business_type": "Florist",
            "location": "Cebu",
            "rating": 4.2,
            "review_count": 18,
            "verified": "true",
            "starting_price": "15000",
            "specialties": ["bouquets", "arches"]
        });

        let profile: VendorProfile = serde_json::from_value(json).unwrap();
        assert!(profile.verified);

        let service = Service::from(profile);
        assert_eq!(service.category, "Florist");
        assert_eq!(service.price_range, Some(PriceRange::Amount(15000.0)));
        assert_eq!(service.features.len(), 2);
        assert_eq!(service.vendor_id.as_deref(), Some("v-1"));
    }

    #[test]
    fn test_priority_thresholds() {
        let thresholds = PriorityThresholds::default();
        assert_eq!(thresholds.tier(65), PriorityTier::High);
        assert_eq!(thresholds.tier(64), PriorityTier::Medium);
        assert_eq!(thresholds.tier(40), PriorityTier::Medium);
        assert_eq!(thresholds.tier(39), PriorityTier::Low);
    }
}
