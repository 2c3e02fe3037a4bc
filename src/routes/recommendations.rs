use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;
use crate::core::{
    BudgetAnalysisService, Coordinates, CurrencyService, DetectionRequest, DssService, PricingService,
};
use crate::models::{
    BudgetAnalysisRequest, Criteria, CurrencyDetectQuery, CurrencyFormatQuery, CurrencySummary,
    ErrorResponse, FormatCurrencyResponse, HealthResponse, ListingSource, PriceEstimateResponse,
    PriceRange, PricingQuery, RecommendationRequest, RecommendationResponse, Service, ServiceQuery,
    VendorQuery,
};
use crate::services::{FallbackPolicy, VendorApiClient, VendorApiError};
use std::sync::Arc;

/// Hard cap on recommendations returned per request
pub const MAX_LIMIT: usize = 100;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub vendor_api: Arc<VendorApiClient>,
    pub fallback: Arc<FallbackPolicy>,
    pub dss: DssService,
    pub budget: BudgetAnalysisService,
}

/// Configure all recommendation-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/recommendations", web::post().to(generate_recommendations))
        .route("/budget/analyze", web::post().to(analyze_budget))
        .route("/pricing/estimate", web::get().to(estimate_price))
        .route("/currency/detect", web::get().to(detect_currency))
        .route("/currency/format", web::get().to(format_currency));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Bearer token from the Authorization header, if any
fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer ").or_else(|| value.strip_prefix("bearer ")))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Rank listings for a couple
///
/// POST /api/v1/recommendations
///
/// Request body:
/// ```json
/// {
///   "criteria": {
///     "budget": 10000,
///     "location": "New York",
///     "priorities": ["Photography"],
///     "countryCode": "US"
///   },
///   "services": [ ... ],
///   "source": "services",
///   "limit": 20
/// }
/// ```
///
/// `services` is optional; without it the listings are fetched from the
/// marketplace backend using the caller's bearer token. `source` picks
/// service listings (default) or vendor profiles.
async fn generate_recommendations(
    state: web::Data<AppState>,
    req: web::Json<RecommendationRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let request_id = uuid::Uuid::new_v4();

    if let Err(errors) = req.validate() {
        tracing::info!("[{}] Validation failed for recommendations request: {:?}", request_id, errors);
        return validation_error(errors);
    }

    let RecommendationRequest { criteria, services, source, limit } = req.into_inner();
    let limit = (limit as usize).clamp(1, MAX_LIMIT);

    let services = match services {
        Some(services) => services,
        None => {
            let token = bearer_token(&http_req);
            let fetched = fetch_listings(&state.vendor_api, source, &criteria, token.as_deref()).await;

            match state.fallback.resolve(fetched) {
                Ok(services) => services,
                Err(e) => {
                    tracing::error!("[{}] Failed to fetch listings: {}", request_id, e);
                    return HttpResponse::BadGateway().json(ErrorResponse {
                        error: "Failed to fetch listings".to_string(),
                        message: e.to_string(),
                        status_code: 502,
                    });
                }
            }
        }
    };

    let total_candidates = services.len();
    let mut recommendations = state.dss.generate_recommendations(&services, &criteria);
    let budget_analysis = state.budget.analyze(&recommendations, criteria.budget);
    recommendations.truncate(limit);

    let country_code = state.dss.resolve_country(&criteria);
    let currency = CurrencySummary {
        currency: CurrencyService::currency_for_country(&country_code),
        country_code,
    };

    tracing::info!(
        "[{}] Returning {} recommendations (from {} candidates, budget {:.0}% used)",
        request_id,
        recommendations.len(),
        total_candidates,
        budget_analysis.budget_utilization
    );

    HttpResponse::Ok().json(RecommendationResponse {
        recommendations,
        budget_analysis,
        currency,
        total_candidates,
    })
}

/// Listings near the couple's location from the chosen backend collection
async fn fetch_listings(
    client: &VendorApiClient,
    source: ListingSource,
    criteria: &Criteria,
    token: Option<&str>,
) -> Result<Vec<Service>, VendorApiError> {
    let location = Some(criteria.location.clone()).filter(|l| !l.trim().is_empty());

    match source {
        ListingSource::Services => {
            let query = ServiceQuery { location, ..Default::default() };
            client.get_services(&query, token).await
        }
        ListingSource::Vendors => {
            let query = VendorQuery { location, ..Default::default() };
            let profiles = client.get_vendor_profiles(&query, token).await?;
            Ok(profiles.into_iter().map(Service::from).collect())
        }
    }
}

/// Budget analysis of already-scored listings
///
/// POST /api/v1/budget/analyze
async fn analyze_budget(
    state: web::Data<AppState>,
    req: web::Json<BudgetAnalysisRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let analysis = state.budget.analyze(&req.recommendations, req.budget);
    tracing::debug!(
        "Analyzed {} of {} recommendations against budget {}",
        analysis.considered,
        req.recommendations.len(),
        req.budget
    );

    HttpResponse::Ok().json(analysis)
}

/// Estimated cost of a category, optionally at a listed price
///
/// GET /api/v1/pricing/estimate?category={category}&country={code}&priceRange={range}
async fn estimate_price(query: web::Query<PricingQuery>) -> impl Responder {
    if query.category.trim().is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Missing category parameter".to_string(),
            message: "category query parameter is required".to_string(),
            status_code: 400,
        });
    }

    let country_code = query
        .country
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(crate::core::currency::DEFAULT_COUNTRY)
        .to_ascii_uppercase();
    let price_range = query.price_range.as_deref().and_then(PriceRange::parse);

    let estimated_cost = PricingService::estimate_cost(&query.category, price_range, &country_code);

    HttpResponse::Ok().json(PriceEstimateResponse {
        category: query.category.clone(),
        country_code,
        estimated_cost,
    })
}

/// Detect a country and its currency
///
/// GET /api/v1/currency/detect?location={text}&lat={lat}&lng={lng}&locale={tag}
async fn detect_currency(query: web::Query<CurrencyDetectQuery>) -> impl Responder {
    let coordinates = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
        _ => None,
    };

    let detection = CurrencyService::detect_location_and_currency(&DetectionRequest {
        coordinates,
        location: query.location.as_deref(),
        locale: query.locale.as_deref(),
    });

    HttpResponse::Ok().json(detection)
}

/// Format an amount in a currency, converting from `from` when given
///
/// GET /api/v1/currency/format?amount={amount}&currency={code}&from={code}
async fn format_currency(query: web::Query<CurrencyFormatQuery>) -> impl Responder {
    let formatted = match query.from.as_deref() {
        Some(from) => CurrencyService::format_converted(query.amount, from, &query.currency),
        None => CurrencyService::format_currency(query.amount, &query.currency),
    };

    HttpResponse::Ok().json(FormatCurrencyResponse {
        amount: query.amount,
        currency: query.currency.to_ascii_uppercase(),
        formatted,
    })
}
