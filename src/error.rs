use rusoto_core::RusotoError;
use thiserror::Error;

const REGION_UNAVAILABLE_CODES: [&str; 3] = [
    "OptInRequired",
    "SubscriptionRequiredException",
    "InvalidClientTokenId",
];

const ACCESS_DENIED_CODES: [&str; 5] = [
    "AuthFailure",
    "UnauthorizedOperation",
    "AccessDenied",
    "UnrecognizedClientException",
    "ExpiredToken",
];

const THROTTLING_CODES: [&str; 4] = [
    "Throttling",
    "RequestLimitExceeded",
    "TooManyRequestsException",
    "ProvisionedThroughputExceededException",
];

/// A provider call that failed, classified by how far the failure reaches.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("credentials unavailable: {0}")]
    Credentials(String),
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("region unavailable: {0}")]
    RegionUnavailable(String),
    #[error("request throttled: {0}")]
    Throttled(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Parse(String),
    #[error("service error: {0}")]
    Service(String),
}

impl ProviderError {
    /// Classifies a raw error response by the error code in its body, then by HTTP status.
    pub fn from_response(status: u16, body: &str) -> ProviderError {
        let message = format!("HTTP {}: {}", status, body.trim());
        if REGION_UNAVAILABLE_CODES.iter().any(|code| body.contains(code)) {
            ProviderError::RegionUnavailable(message)
        } else if ACCESS_DENIED_CODES.iter().any(|code| body.contains(code)) {
            ProviderError::AccessDenied(message)
        } else if THROTTLING_CODES.iter().any(|code| body.contains(code)) {
            ProviderError::Throttled(message)
        } else {
            match status {
                401 | 403 => ProviderError::AccessDenied(message),
                429 => ProviderError::Throttled(message),
                _ => ProviderError::Service(message),
            }
        }
    }
}

impl<E: std::error::Error + 'static> From<RusotoError<E>> for ProviderError {
    fn from(error: RusotoError<E>) -> ProviderError {
        match error {
            RusotoError::Service(error) => ProviderError::Service(error.to_string()),
            RusotoError::HttpDispatch(error) => ProviderError::Transport(error.to_string()),
            RusotoError::Credentials(error) => ProviderError::Credentials(error.to_string()),
            RusotoError::Validation(message) => ProviderError::Service(message),
            RusotoError::ParseError(message) => ProviderError::Parse(message),
            RusotoError::Unknown(response) => ProviderError::from_response(
                response.status.as_u16(),
                &String::from_utf8_lossy(&response.body),
            ),
            RusotoError::Blocking => {
                ProviderError::Transport("blocking operation failed".to_string())
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("unknown resource category '{0}' (expected one of: ec2, rds, efs, fsx, redshift, dynamodb)")]
    UnknownCategory(String),
    #[error("invalid config value for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },
    #[error("failed to parse config file {path}: {reason}")]
    ConfigParse { path: String, reason: String },
    #[error("no usable AWS credentials: {0}")]
    Credentials(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
