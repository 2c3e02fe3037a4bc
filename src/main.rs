use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use bazaar_dss::config::Settings;
use bazaar_dss::core::{BudgetAnalysisService, DssService, RecommendationEngine};
use bazaar_dss::models::{PriorityThresholds, ScoringWeights};
use bazaar_dss::routes::{self, AppState};
use bazaar_dss::services::{FallbackPolicy, VendorApiClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn io_error(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration before logging so its defaults apply
    let settings = Settings::load().map_err(|e| io_error(format!("Configuration error: {}", e)))?;

    // Initialize logging; LOG_LEVEL and LOG_FORMAT win over the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting Wedding Bazaar decision support service...");
    info!("Configuration loaded successfully");

    // Initialize marketplace backend client
    let vendor_api = Arc::new(
        VendorApiClient::new(
            settings.vendor_api.base_url.clone(),
            Duration::from_secs(settings.vendor_api.timeout_secs),
        )
        .map_err(|e| {
            error!("Failed to build backend client: {}", e);
            io_error(format!("Backend client error: {}", e))
        })?,
    );

    info!("Backend client initialized for {}", vendor_api.base_url());

    let fallback = FallbackPolicy::from_config(
        &settings.vendor_api.fallback,
        settings.vendor_api.fallback_listings.as_deref(),
    )
    .map_err(|e| {
        error!("Invalid fallback configuration: {}", e);
        io_error(format!("Fallback error: {}", e))
    })?;

    info!("Listing fallback policy: {}", settings.vendor_api.fallback);

    // Initialize ranking with configured weights
    let weights = ScoringWeights::from(&settings.scoring.weights);
    let thresholds = PriorityThresholds::from(&settings.scoring.thresholds);
    let engine = RecommendationEngine::new(weights, thresholds);

    info!("Recommendation engine initialized with weights: {:?}", engine.weights());

    // Build application state
    let app_state = AppState {
        vendor_api,
        fallback: Arc::new(fallback),
        dss: DssService::new(engine),
        budget: BudgetAnalysisService::new(settings.budget.top_n),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
