use crate::models::Service;
use crate::services::vendor_api::VendorApiError;
use std::path::Path;
use thiserror::Error;

/// Errors building a fallback policy from configuration
#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("Unknown fallback policy: {0} (expected fail, empty or listings)")]
    UnknownPolicy(String),

    #[error("Fallback policy 'listings' needs vendor_api.fallback_listings")]
    MissingListings,

    #[error("Failed to read fallback listings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse fallback listings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What to return when the backend cannot supply listings
#[derive(Debug, Clone, Default)]
pub enum FallbackPolicy {
    /// Surface the error to the caller
    #[default]
    Fail,
    /// Continue with no listings
    Empty,
    /// Continue with a fixed set of listings
    Listings(Vec<Service>),
}

impl FallbackPolicy {
    /// Build from the configured policy name; `listings` reads a JSON
    /// array of services from `listings_path`
    pub fn from_config(kind: &str, listings_path: Option<&Path>) -> Result<Self, FallbackError> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(FallbackPolicy::Fail),
            "empty" => Ok(FallbackPolicy::Empty),
            "listings" => {
                let path = listings_path.ok_or(FallbackError::MissingListings)?;
                let raw = std::fs::read_to_string(path)?;
                let listings: Vec<Service> = serde_json::from_str(&raw)?;
                tracing::info!("Loaded {} fallback listings from {}", listings.len(), path.display());
                Ok(FallbackPolicy::Listings(listings))
            }
            other => Err(FallbackError::UnknownPolicy(other.to_string())),
        }
    }

    /// Apply the policy to a fetch result
    pub fn resolve(&self, result: Result<Vec<Service>, VendorApiError>) -> Result<Vec<Service>, VendorApiError> {
        match (result, self) {
            (Ok(services), _) => Ok(services),
            (Err(e), FallbackPolicy::Fail) => Err(e),
            (Err(e), FallbackPolicy::Empty) => {
                tracing::warn!("Listing fetch failed, continuing with no listings: {}", e);
                Ok(Vec::new())
            }
            (Err(e), FallbackPolicy::Listings(listings)) => {
                tracing::warn!(
                    "Listing fetch failed, using {} fallback listings: {}",
                    listings.len(),
                    e
                );
                Ok(listings.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn listing(id: &str) -> Service {
        serde_json::from_value(serde_json::json!({ "id": id, "category": "Venue" })).unwrap()
    }

    #[test]
    fn test_success_passes_through() {
        let policy = FallbackPolicy::Listings(vec![listing("fallback")]);
        let resolved = policy.resolve(Ok(vec![listing("live")])).unwrap();
        assert_eq!(resolved[0].id, "live");
    }

    #[test]
    fn test_fail_propagates() {
        let resolved = FallbackPolicy::Fail.resolve(Err(VendorApiError::Unauthorized));
        assert!(matches!(resolved, Err(VendorApiError::Unauthorized)));
    }

    #[test]
    fn test_empty_and_listings() {
        let empty = FallbackPolicy::Empty
            .resolve(Err(VendorApiError::InvalidResponse("x".into())))
            .unwrap();
        assert!(empty.is_empty());

        let listings = FallbackPolicy::Listings(vec![listing("a"), listing("b")])
            .resolve(Err(VendorApiError::Unauthorized))
            .unwrap();
        assert_eq!(listings.len(), 2);
    }

    #[test]
    fn test_from_config() {
        assert!(matches!(FallbackPolicy::from_config("FAIL", None), Ok(FallbackPolicy::Fail)));
        assert!(matches!(FallbackPolicy::from_config("empty", None), Ok(FallbackPolicy::Empty)));
        assert!(matches!(
            FallbackPolicy::from_config("listings", None),
            Err(FallbackError::MissingListings)
        ));
        assert!(matches!(
            FallbackPolicy::from_config("mock", None),
            Err(FallbackError::UnknownPolicy(_))
        ));
    }

    #[test]
    fn test_listings_loaded_from_file() {
        let path = std::env::temp_dir().join(format!("bazaar-fallback-{}.json", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"[{{"id":"f1","category":"Catering","priceRange":"$$"}}]"#).unwrap();

        let policy = FallbackPolicy::from_config("listings", Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        match policy {
            FallbackPolicy::Listings(listings) => assert_eq!(listings[0].id, "f1"),
            other => panic!("unexpected policy {:?}", other),
        }
    }
}
