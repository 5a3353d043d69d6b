//! Response envelopes produced by the simulated catalog service.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::CatalogError;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Successful reply wrapping a payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub data: T,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, request_id: impl Into<String>) -> Self {
        Self {
            data,
            success: true,
            message: Some("Request completed successfully".to_string()),
            timestamp: Utc::now(),
            request_id: request_id.into(),
        }
    }

    /// Replace the payload, keeping the envelope metadata
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            data: f(self.data),
            success: self.success,
            message: self.message,
            timestamp: self.timestamp,
            request_id: self.request_id,
        }
    }
}

/// Failed reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{error} ({status}): {message} [{request_id}]")]
pub struct ApiError {
    pub error: String,
    pub message: String,
    pub status: u16,
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
}

impl ApiError {
    /// The simulated transport failure
    pub fn network(request_id: impl Into<String>) -> Self {
        Self {
            error: "NETWORK_ERROR".to_string(),
            message: "Network request failed. Please try again.".to_string(),
            status: 500,
            timestamp: Utc::now(),
            request_id: request_id.into(),
        }
    }
}

impl From<ApiError> for CatalogError {
    fn from(err: ApiError) -> Self {
        match err.status {
            404 => CatalogError::NotFound(err.message),
            400 => CatalogError::InvalidRequest(err.message),
            _ => CatalogError::Network(err.message),
        }
    }
}

/// Payload of the health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            version: "1.0.0".to_string(),
        }
    }
}

/// Request identifier of the form `req_<unix millis>_<9 base36 chars>`
pub fn generate_request_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("req_{}_{}", Utc::now().timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_shape() {
        let id = generate_request_id(&mut rand::thread_rng());
        let parts: Vec<&str> = id.split('_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "req");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_envelope_serializes_camel_case() {
        let response = ApiResponse::ok(HealthStatus::default(), "req_1_abc");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["requestId"], "req_1_abc");
        assert_eq!(json["data"]["status"], "healthy");
        assert_eq!(json["message"], "Request completed successfully");
    }

    #[test]
    fn test_api_error_maps_to_network() {
        let err: CatalogError = ApiError::network("req_1_x").into();
        assert_eq!(
            err,
            CatalogError::Network("Network request failed. Please try again.".to_string())
        );
    }
}
