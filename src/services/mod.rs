// Service exports
pub mod fallback;
pub mod vendor_api;

pub use fallback::{FallbackError, FallbackPolicy};
pub use vendor_api::{VendorApiClient, VendorApiError, DEFAULT_BASE_URL};
