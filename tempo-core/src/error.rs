use thiserror::Error;

/// Failures surfaced by the weather provider, the municipality list and the
/// location resolver.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WeatherError {
    /// The location resolver refused to hand out coordinates.
    #[error("Location permission denied")]
    PermissionDenied,

    /// Transport failure, DNS failure, timeout or a non-success HTTP status.
    #[error("Network error: {0}")]
    Network(String),

    /// The response arrived but did not carry the expected payload.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Input rejected before any request was made.
    #[error("Invalid input: {0}")]
    Validation(String),
}

impl WeatherError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, WeatherError::PermissionDenied)
    }

    pub fn is_network(&self) -> bool {
        matches!(self, WeatherError::Network(_))
    }

    pub fn is_provider(&self) -> bool {
        matches!(self, WeatherError::Provider(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, WeatherError::Validation(_))
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::Provider(format!("Failed to parse response JSON: {err}"))
    }
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;
