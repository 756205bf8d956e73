use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Normalized lookup failure.
///
/// `Display` yields the message shown to the user; the carried fields only
/// feed diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeatherError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Network error. Please check your connection.")]
    Network { cause: String },

    #[error("City not found. Please try another location.")]
    NotFound,

    #[error("Invalid API key. Please check your configuration.")]
    Unauthorized,

    #[error("Too many requests. Please wait and try again later.")]
    RateLimited,

    #[error("{message}")]
    Provider { status: u16, message: String },

    #[error("Unexpected response from the weather service.")]
    MalformedResponse { cause: String },

    #[error("Failed to fetch weather data")]
    Unknown { status: Option<u16> },
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
}

impl WeatherError {
    /// Classify a non-success HTTP response.
    ///
    /// Rows are checked in order: 404, 401, 429, a provider `message` field,
    /// then the generic fallback.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            _ => match provider_message(body) {
                Some(message) => Self::Provider { status: status.as_u16(), message },
                None => Self::Unknown { status: Some(status.as_u16()) },
            },
        }
    }

    pub fn network(cause: impl ToString) -> Self {
        Self::Network { cause: cause.to_string() }
    }

    pub fn malformed(cause: impl ToString) -> Self {
        Self::MalformedResponse { cause: cause.to_string() }
    }

    /// Stable name of the error kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Network { .. } => "network_error",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::RateLimited => "rate_limited",
            Self::Provider { .. } => "provider_error",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::Unknown { .. } => "unknown_error",
        }
    }

    /// Underlying cause for diagnostics; falls back to the user message.
    pub fn cause(&self) -> String {
        match self {
            Self::Network { cause } | Self::MalformedResponse { cause } => cause.clone(),
            Self::Provider { status, message } => format!("HTTP {status}: {message}"),
            Self::Unknown { status: Some(status) } => format!("HTTP {status}"),
            other => other.to_string(),
        }
    }
}

fn provider_message(body: &str) -> Option<String> {
    serde_json::from_str::<ProviderErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}
