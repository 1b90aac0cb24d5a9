use thiserror::Error;

/// Device-level failure to produce a position. The display text is what the
/// user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Location access was denied. Allow location access or search for a city instead.")]
    PermissionDenied,
    #[error("Your location is currently unavailable. Please try again or search for a city.")]
    PositionUnavailable,
    #[error("Timed out while getting your location. Please try again.")]
    Timeout,
    #[error("Could not retrieve your location. Please try again or enter a city.")]
    Unknown,
}

#[derive(Debug, Error)]
pub enum WeatherError {
    /// Transport failure or a response body that could not be decoded.
    #[error("Network error: could not reach the weather service ({0})")]
    Network(#[from] reqwest::Error),

    #[error("API error: {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Geolocation(#[from] GeolocationError),

    #[error("{0}")]
    Validation(String),
}

impl WeatherError {
    /// Build an API error from a non-success status and its raw body.
    pub fn from_status(status: u16, body: &str) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            message: Option<String>,
        }

        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("request failed with status {status}"));

        WeatherError::Api { status, message }
    }
}
