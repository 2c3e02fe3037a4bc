use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filters for `GET /api/services`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceQuery {
    pub category: Option<String>,
    pub location: Option<String>,
    pub min_rating: Option<f64>,
    pub max_price: Option<f64>,
}

impl ServiceQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(location) = &self.location {
            params.push(("location", location.clone()));
        }
        if let Some(min_rating) = self.min_rating {
            params.push(("minRating", min_rating.to_string()));
        }
        if let Some(max_price) = self.max_price {
            params.push(("maxPrice", max_price.to_string()));
        }
        params
    }
}

/// Filters for `GET /api/vendor-profiles`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorQuery {
    pub business_type: Option<String>,
    pub location: Option<String>,
    pub verified: Option<bool>,
}

impl VendorQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(business_type) = &self.business_type {
            params.push(("business_type", business_type.clone()));
        }
        if let Some(location) = &self.location {
            params.push(("location", location.clone()));
        }
        if let Some(verified) = self.verified {
            params.push(("verified", verified.to_string()));
        }
        params
    }
}

/// Payload for `POST /api/bookings`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    #[serde(rename = "serviceId")]
    pub service_id: String,
    #[serde(rename = "vendorId")]
    pub vendor_id: String,
    #[serde(rename = "eventDate")]
    pub event_date: chrono::NaiveDate,
    #[serde(rename = "eventLocation", skip_serializing_if = "Option::is_none")]
    pub event_location: Option<String>,
    #[serde(rename = "guestCount", skip_serializing_if = "Option::is_none")]
    pub guest_count: Option<u32>,
    #[serde(rename = "budgetRange", skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<String>,
    #[serde(rename = "specialRequests", skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

/// Payload for `POST /api/messages`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactVendorRequest {
    #[serde(rename = "vendorId")]
    pub vendor_id: String,
    #[serde(rename = "serviceId", skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    pub message: String,
}

/// Payload for `POST /api/user/favorites`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRecommendationRequest {
    #[serde(rename = "serviceId")]
    pub service_id: String,
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Acknowledgement of a backend write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendAck {
    pub success: bool,
    pub id: Option<String>,
    pub message: Option<String>,
}

impl BackendAck {
    /// Read an acknowledgement from whatever shape the backend returned.
    /// The id may sit at the top level or inside a wrapping object.
    pub fn from_value(value: &Value) -> Self {
        let success = value.get("success").and_then(Value::as_bool).unwrap_or(true);
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);

        let id = ["id", "bookingId", "messageId", "favoriteId"]
            .iter()
            .find_map(|key| value.get(*key).and_then(id_string))
            .or_else(|| {
                ["booking", "message", "favorite", "data"]
                    .iter()
                    .filter_map(|key| value.get(*key))
                    .find_map(|inner| inner.get("id").and_then(id_string))
            });

        Self { success, id, message }
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_service_query_params() {
        let query = ServiceQuery {
            category: Some("Photography".to_string()),
            min_rating: Some(4.5),
            ..Default::default()
        };

        assert_eq!(
            query.params(),
            vec![("category", "Photography".to_string()), ("minRating", "4.5".to_string())]
        );
        assert!(ServiceQuery::default().params().is_empty());
    }

    #[test]
    fn test_ack_nested_id() {
        let ack = BackendAck::from_value(&json!({ "success": true, "booking": { "id": 981 } }));
        assert!(ack.success);
        assert_eq!(ack.id.as_deref(), Some("981"));
    }

    #[test]
    fn test_ack_failure_message() {
        let ack = BackendAck::from_value(&json!({ "success": false, "message": "Service unavailable" }));
        assert!(!ack.success);
        assert!(ack.id.is_none());
        assert_eq!(ack.message.as_deref(), Some("Service unavailable"));
    }
}
