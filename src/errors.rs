use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for the carcare-realtime service
#[derive(Debug)]
pub enum CarCareError {
    // HTTP and API errors
    BadRequest(String),
    NotFound(String),
    InternalServer(String),

    // Redis errors
    RedisConnection(String),
    RedisQuery(String),

    // External service errors
    FirebaseDatabase(String),
    FcmDelivery(String),
    FcmInvalidToken(String),

    // Network and HTTP client errors
    NetworkTimeout,
    NetworkConnection(String),
    HttpClient(String),

    // Serialization and parsing errors
    JsonParsing(String),
    JsonSerialization(String),

    // Business logic errors
    UserNotFound(String),
    NoDeviceTokens(String),
    NoRecipients,

    // Validation errors
    ValidationFailed(Vec<ValidationError>),

    // Configuration errors
    InvalidConfiguration(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl fmt::Display for CarCareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarCareError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            CarCareError::NotFound(msg) => write!(f, "Not found: {}", msg),
            CarCareError::InternalServer(msg) => write!(f, "Internal server error: {}", msg),

            CarCareError::RedisConnection(msg) => write!(f, "Redis connection error: {}", msg),
            CarCareError::RedisQuery(msg) => write!(f, "Redis query error: {}", msg),

            CarCareError::FirebaseDatabase(msg) => write!(f, "Firebase database error: {}", msg),
            CarCareError::FcmDelivery(msg) => write!(f, "FCM delivery error: {}", msg),
            CarCareError::FcmInvalidToken(msg) => write!(f, "Invalid FCM token: {}", msg),

            CarCareError::NetworkTimeout => write!(f, "Network request timed out"),
            CarCareError::NetworkConnection(msg) => write!(f, "Network connection error: {}", msg),
            CarCareError::HttpClient(msg) => write!(f, "HTTP client error: {}", msg),

            CarCareError::JsonParsing(msg) => write!(f, "JSON parsing error: {}", msg),
            CarCareError::JsonSerialization(msg) => write!(f, "JSON serialization error: {}", msg),

            CarCareError::UserNotFound(id) => write!(f, "User not found: {}", id),
            CarCareError::NoDeviceTokens(id) => write!(f, "No device tokens registered for user: {}", id),
            CarCareError::NoRecipients => write!(f, "Dispatch has no recipients"),

            CarCareError::ValidationFailed(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }

            CarCareError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for CarCareError {}

impl IntoResponse for CarCareError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            CarCareError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            CarCareError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),

            CarCareError::ValidationFailed(errors) => {
                let details = serde_json::to_value(&errors).ok();
                (StatusCode::BAD_REQUEST, "validation_failed", "Validation errors occurred".to_string(), details)
            }
            CarCareError::NoRecipients => {
                (StatusCode::BAD_REQUEST, "no_recipients", "Dispatch has no recipients".to_string(), None)
            }
            CarCareError::FcmInvalidToken(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_token", format!("Invalid FCM token: {}", msg), None)
            }

            CarCareError::UserNotFound(id) => (StatusCode::NOT_FOUND, "user_not_found", format!("User not found: {}", id), None),
            CarCareError::NoDeviceTokens(id) => {
                (StatusCode::NOT_FOUND, "no_device_tokens", format!("No device tokens registered for user: {}", id), None)
            }

            CarCareError::FcmDelivery(msg) => (StatusCode::BAD_GATEWAY, "fcm_delivery", msg, None),

            // All other errors are treated as internal server errors
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", self.to_string(), None),
        };

        let error_response = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, axum::Json(error_response)).into_response()
    }
}

// Convenience type alias for Results
pub type CarCareResult<T> = Result<T, CarCareError>;

impl From<redis::RedisError> for CarCareError {
    fn from(err: redis::RedisError) -> Self {
        match err.kind() {
            redis::ErrorKind::IoError => CarCareError::RedisConnection(err.to_string()),
            redis::ErrorKind::AuthenticationFailed => CarCareError::RedisConnection("Authentication failed".to_string()),
            _ => CarCareError::RedisQuery(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for CarCareError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CarCareError::NetworkTimeout
        } else if err.is_connect() {
            CarCareError::NetworkConnection(err.to_string())
        } else {
            CarCareError::HttpClient(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CarCareError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() {
            CarCareError::JsonParsing(err.to_string())
        } else {
            CarCareError::JsonSerialization(err.to_string())
        }
    }
}

impl CarCareError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        CarCareError::BadRequest(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        CarCareError::NotFound(resource.into())
    }

    pub fn internal_error(msg: impl Into<String>) -> Self {
        CarCareError::InternalServer(msg.into())
    }

    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        CarCareError::ValidationFailed(vec![ValidationError {
            field: field.into(),
            message: message.into(),
        }])
    }

    pub fn user_not_found(user_id: impl Into<String>) -> Self {
        CarCareError::UserNotFound(user_id.into())
    }
}
