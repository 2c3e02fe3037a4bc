use geo::{coord, Contains, Point, Rect};
use serde::Serialize;
use crate::models::CurrencyConfig;

/// Country assumed when nothing else identifies one
pub const DEFAULT_COUNTRY: &str = "US";

const USD: CurrencyConfig = CurrencyConfig { code: "USD", symbol: "$", name: "US Dollar", rate: 1.0 };

/// Fixed exchange table, units per 1 USD
const CURRENCIES: &[CurrencyConfig] = &[
    USD,
    CurrencyConfig { code: "PHP", symbol: "₱", name: "Philippine Peso", rate: 56.0 },
    CurrencyConfig { code: "EUR", symbol: "€", name: "Euro", rate: 0.92 },
    CurrencyConfig { code: "GBP", symbol: "£", name: "British Pound", rate: 0.79 },
    CurrencyConfig { code: "CAD", symbol: "C$", name: "Canadian Dollar", rate: 1.36 },
    CurrencyConfig { code: "AUD", symbol: "A$", name: "Australian Dollar", rate: 1.52 },
    CurrencyConfig { code: "JPY", symbol: "¥", name: "Japanese Yen", rate: 150.0 },
    CurrencyConfig { code: "SGD", symbol: "S$", name: "Singapore Dollar", rate: 1.34 },
    CurrencyConfig { code: "INR", symbol: "₹", name: "Indian Rupee", rate: 83.0 },
];

const COUNTRY_CURRENCIES: &[(&str, &str)] = &[
    ("US", "USD"),
    ("PH", "PHP"),
    ("GB", "GBP"),
    ("CA", "CAD"),
    ("AU", "AUD"),
    ("JP", "JPY"),
    ("SG", "SGD"),
    ("IN", "INR"),
    ("DE", "EUR"),
    ("FR", "EUR"),
    ("IT", "EUR"),
    ("ES", "EUR"),
    ("NL", "EUR"),
    ("IE", "EUR"),
    ("PT", "EUR"),
    ("BE", "EUR"),
    ("AT", "EUR"),
    ("FI", "EUR"),
    ("GR", "EUR"),
];

/// Rough country extents as (country, min_lat, max_lat, min_lng, max_lng).
/// Checked in order, so small countries come before large neighbours.
const COUNTRY_BOUNDS: &[(&str, f64, f64, f64, f64)] = &[
    ("SG", 1.15, 1.48, 103.6, 104.1),
    ("PH", 4.5, 21.5, 116.0, 127.0),
    ("JP", 24.0, 46.0, 123.0, 146.0),
    ("IN", 6.5, 35.5, 68.0, 97.5),
    ("AU", -44.0, -10.0, 112.0, 154.0),
    ("GB", 49.9, 58.7, -8.2, 1.8),
    ("CA", 49.0, 70.0, -141.0, -52.0),
    ("US", 24.5, 49.0, -125.0, -66.9),
];

/// Location keywords, matched as whole words against the lowercased text
const LOCATION_KEYWORDS: &[(&str, &[&str])] = &[
    ("PH", &["philippines", "manila", "metro manila", "cebu", "davao", "quezon city", "makati", "taguig", "pasig", "boracay", "tagaytay", "iloilo", "baguio", "bohol", "palawan"]),
    ("SG", &["singapore"]),
    ("JP", &["japan", "tokyo", "osaka", "kyoto"]),
    ("IN", &["india", "mumbai", "delhi", "new delhi", "bangalore", "jaipur", "goa"]),
    ("AU", &["australia", "sydney", "melbourne", "brisbane", "perth"]),
    ("GB", &["united kingdom", "uk", "england", "scotland", "wales", "london", "manchester", "edinburgh"]),
    ("CA", &["canada", "toronto", "vancouver", "montreal", "calgary", "ottawa"]),
    ("DE", &["germany", "berlin", "munich"]),
    ("FR", &["france", "paris"]),
    ("IT", &["italy", "rome", "florence", "tuscany", "amalfi"]),
    ("ES", &["spain", "madrid", "barcelona"]),
    ("US", &["united states", "usa", "us", "america", "new york", "nyc", "los angeles", "california", "texas", "chicago", "florida", "miami", "seattle", "boston", "las vegas", "hawaii"]),
];

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Inputs available for country detection, all optional
#[derive(Debug, Clone, Default)]
pub struct DetectionRequest<'a> {
    pub coordinates: Option<Coordinates>,
    pub location: Option<&'a str>,
    pub locale: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionSource {
    Coordinates,
    Location,
    Locale,
    Default,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrencyDetection {
    #[serde(rename = "countryCode")]
    pub country_code: String,
    pub currency: CurrencyConfig,
    pub source: DetectionSource,
}

/// Country detection, currency lookup and money formatting
pub struct CurrencyService;

impl CurrencyService {
    /// Detect the user's country and currency
    ///
    /// Tries coordinates, then the free-text location, then the locale
    /// tag, and finally falls back to the US. Never fails.
    pub fn detect_location_and_currency(request: &DetectionRequest<'_>) -> CurrencyDetection {
        let detected = request
            .coordinates
            .and_then(country_from_coordinates)
            .map(|country| (country.to_string(), DetectionSource::Coordinates))
            .or_else(|| {
                request
                    .location
                    .and_then(country_from_location)
                    .map(|country| (country.to_string(), DetectionSource::Location))
            })
            .or_else(|| {
                request
                    .locale
                    .and_then(country_from_locale)
                    .map(|country| (country, DetectionSource::Locale))
            });

        let (country_code, source) =
            detected.unwrap_or_else(|| (DEFAULT_COUNTRY.to_string(), DetectionSource::Default));

        tracing::debug!("Detected country {} from {:?}", country_code, source);

        CurrencyDetection {
            currency: Self::currency_for_country(&country_code),
            country_code,
            source,
        }
    }

    /// Country code for a free-text location, defaulting to the US
    pub fn country_for_location(location: &str) -> String {
        country_from_location(location)
            .unwrap_or(DEFAULT_COUNTRY)
            .to_string()
    }

    /// Currency used in a country; unknown countries get USD
    pub fn currency_for_country(country_code: &str) -> CurrencyConfig {
        let country = country_code.trim().to_ascii_uppercase();
        COUNTRY_CURRENCIES
            .iter()
            .find(|(c, _)| *c == country)
            .and_then(|(_, code)| Self::currency(code))
            .unwrap_or(USD)
    }

    /// Look up a currency by ISO code
    pub fn currency(code: &str) -> Option<CurrencyConfig> {
        let code = code.trim();
        CURRENCIES
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
            .copied()
    }

    /// Convert an amount between two currency codes through the USD base.
    /// Unknown codes are treated as USD.
    pub fn convert(amount: f64, from: &str, to: &str) -> f64 {
        let from = Self::currency(from).unwrap_or(USD);
        let to = Self::currency(to).unwrap_or(USD);
        amount / from.rate * to.rate
    }

    /// Format an amount already denominated in `currency`, with no
    /// fraction digits
    ///
    /// Unknown currency codes format with the USD symbol.
    pub fn format_currency(amount: f64, currency: &str) -> String {
        let config = Self::currency(currency).unwrap_or(USD);
        let rounded = if amount.is_finite() { amount.round() } else { 0.0 };

        let sign = if rounded < 0.0 { "-" } else { "" };
        format!("{}{}{}", sign, config.symbol, group_thousands(rounded.abs() as u64))
    }

    /// Convert between currencies, then format in the target currency
    pub fn format_converted(amount: f64, from: &str, to: &str) -> String {
        Self::format_currency(Self::convert(amount, from, to), to)
    }
}

fn country_from_coordinates(coordinates: Coordinates) -> Option<&'static str> {
    if !coordinates.lat.is_finite() || !coordinates.lng.is_finite() {
        return None;
    }

    let point = Point::new(coordinates.lng, coordinates.lat);
    COUNTRY_BOUNDS
        .iter()
        .find(|(_, min_lat, max_lat, min_lng, max_lng)| {
            let rect = Rect::new(
                coord! { x: *min_lng, y: *min_lat },
                coord! { x: *max_lng, y: *max_lat },
            );
            rect.contains(&point)
        })
        .map(|(country, ..)| *country)
}

/// Lowercased words of `text` joined by single spaces and padded with a
/// space on each side, so `contains(" word ")` only matches whole words.
/// `None` when the text has no words.
pub(crate) fn padded_words(text: &str) -> Option<String> {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();

    if words.is_empty() {
        return None;
    }
    Some(format!(" {} ", words.join(" ")))
}

fn country_from_location(location: &str) -> Option<&'static str> {
    let normalized = padded_words(location)?;

    LOCATION_KEYWORDS
        .iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|keyword| normalized.contains(&format!(" {} ", keyword)))
        })
        .map(|(country, _)| *country)
}

/// Region subtag of a locale such as `en-PH` or `fil_PH.UTF-8`
fn country_from_locale(locale: &str) -> Option<String> {
    let tag = locale.split(['.', '@']).next()?;
    tag.split(['-', '_'])
        .skip(1)
        .find(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
        .map(str::to_ascii_uppercase)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}
