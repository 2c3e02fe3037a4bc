use crate::models::{
    BackendAck, BookingRequest, ContactVendorRequest, SaveRecommendationRequest, Service, ServiceQuery,
    VendorProfile, VendorQuery,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Hosted backend used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://weddingbazaar-web.onrender.com";

/// Paths readable without a session; a rejected token is retried once
/// without the header
const PUBLIC_PATHS: &[&str] = &["/api/services", "/api/vendor-profiles"];

/// Keys the backend wraps list payloads in
const LIST_KEYS: &[&str] = &["services", "vendors", "data", "documents"];

/// Errors that can occur when talking to the marketplace backend
#[derive(Debug, Error)]
pub enum VendorApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Unauthorized: missing or rejected bearer token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Marketplace backend client
///
/// Handles:
/// - Listing services and vendor profiles
/// - Creating bookings, vendor messages and saved recommendations
pub struct VendorApiClient {
    base_url: String,
    client: Client,
}

impl VendorApiClient {
    /// Create a new client; `base_url` is the backend origin without `/api`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, VendorApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch service listings
    pub async fn get_services(
        &self,
        query: &ServiceQuery,
        token: Option<&str>,
    ) -> Result<Vec<Service>, VendorApiError> {
        let path = "/api/services";
        let url = self.url(path, &query.params());
        let body = self.send(path, token, || self.client.get(&url)).await?;

        let services: Vec<Service> = decode_list(&body, path)?;
        tracing::debug!("Fetched {} services from {}", services.len(), path);

        Ok(services)
    }

    /// Fetch vendor profiles
    pub async fn get_vendor_profiles(
        &self,
        query: &VendorQuery,
        token: Option<&str>,
    ) -> Result<Vec<VendorProfile>, VendorApiError> {
        let path = "/api/vendor-profiles";
        let url = self.url(path, &query.params());
        let body = self.send(path, token, || self.client.get(&url)).await?;

        let vendors: Vec<VendorProfile> = decode_list(&body, path)?;
        tracing::debug!("Fetched {} vendor profiles from {}", vendors.len(), path);

        Ok(vendors)
    }

    /// Request a booking for a service
    pub async fn book_service(
        &self,
        booking: &BookingRequest,
        token: Option<&str>,
    ) -> Result<BackendAck, VendorApiError> {
        let path = "/api/bookings";
        let url = self.url(path, &[]);
        let body = self.send(path, token, || self.client.post(&url).json(booking)).await?;

        tracing::info!("Booking requested for service {}", booking.service_id);
        Ok(BackendAck::from_value(&body))
    }

    /// Send a message to a vendor
    pub async fn contact_vendor(
        &self,
        message: &ContactVendorRequest,
        token: Option<&str>,
    ) -> Result<BackendAck, VendorApiError> {
        let path = "/api/messages";
        let url = self.url(path, &[]);
        let body = self.send(path, token, || self.client.post(&url).json(message)).await?;

        tracing::debug!("Message sent to vendor {}", message.vendor_id);
        Ok(BackendAck::from_value(&body))
    }

    /// Save a recommendation to the user's favorites
    pub async fn save_recommendation(
        &self,
        favorite: &SaveRecommendationRequest,
        token: Option<&str>,
    ) -> Result<BackendAck, VendorApiError> {
        let path = "/api/user/favorites";
        let url = self.url(path, &[]);
        let body = self.send(path, token, || self.client.post(&url).json(favorite)).await?;

        tracing::debug!("Saved recommendation for service {}", favorite.service_id);
        Ok(BackendAck::from_value(&body))
    }

    fn url(&self, path: &str, params: &[(&'static str, String)]) -> String {
        if params.is_empty() {
            return format!("{}{}", self.base_url, path);
        }

        let query = params
            .iter()
            .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}{}?{}", self.base_url, path, query)
    }

    /// Send a request with the bearer token, retrying a rejected token
    /// once without it on public paths
    async fn send<F>(&self, path: &str, token: Option<&str>, build: F) -> Result<Value, VendorApiError>
    where
        F: Fn() -> RequestBuilder,
    {
        let token = token.map(str::trim).filter(|t| !t.is_empty());

        let request = match token {
            Some(token) => build().bearer_auth(token),
            None => build(),
        };
        let response = request.send().await?;

        let response = if response.status() == StatusCode::UNAUTHORIZED
            && token.is_some()
            && is_public_path(path)
        {
            tracing::warn!("{} rejected the bearer token, retrying without auth", path);
            build().send().await?
        } else {
            response
        };

        read_json(response).await
    }
}

fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

async fn read_json(response: Response) -> Result<Value, VendorApiError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(VendorApiError::Unauthorized);
    }

    let body = response.text().await?;

    if !status.is_success() {
        tracing::error!("Backend returned {}: {}", status, body);
        return Err(VendorApiError::ApiError {
            status: status.as_u16(),
            message: error_message(&body, status),
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body)
        .map_err(|e| VendorApiError::InvalidResponse(format!("Body is not JSON: {}", e)))
}

/// Best human-readable message from an error body
fn error_message(body: &str, status: StatusCode) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        ["error", "message"]
            .iter()
            .find_map(|key| json.get(*key).and_then(Value::as_str).map(str::to_string))
    });

    from_json.unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            trimmed.chars().take(200).collect()
        }
    })
}

/// Decode a list payload that is either a bare array or wrapped in an
/// object; undecodable entries are skipped
fn decode_list<T: DeserializeOwned>(body: &Value, path: &str) -> Result<Vec<T>, VendorApiError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(map) => LIST_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .ok_or_else(|| VendorApiError::InvalidResponse(format!("{} response has no list", path)))?,
        _ => {
            return Err(VendorApiError::InvalidResponse(format!(
                "{} response is neither a list nor an object",
                path
            )))
        }
    };

    Ok(items
        .iter()
        .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::debug!("Skipping undecodable entry from {}: {}", path, e);
                None
            }
        })
        .collect())
}
