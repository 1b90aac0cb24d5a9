use anyhow::anyhow;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One user-initiated lookup, by city name or by coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupRequest {
    City { name: String },
    Coordinates { lat: f64, lon: f64 },
}

impl LookupRequest {
    pub fn city(name: impl Into<String>) -> Self {
        LookupRequest::City { name: name.into() }
    }

    pub fn coordinates(position: Coordinates) -> Self {
        LookupRequest::Coordinates {
            lat: position.latitude,
            lon: position.longitude,
        }
    }

    /// Location parameters as sent to the remote API.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            LookupRequest::City { name } => vec![("q", name.clone())],
            LookupRequest::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        }
    }
}

impl fmt::Display for LookupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupRequest::City { name } => f.write_str(name),
            LookupRequest::Coordinates { lat, lon } => write!(f, "{lat:.4}, {lon:.4}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn speed_unit(&self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

/// Weather condition as reported by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

impl Condition {
    /// Placeholder used when a sample carries no condition data.
    pub fn unknown() -> Self {
        Self {
            id: 0,
            main: "Unknown".to_string(),
            description: "unknown".to_string(),
            icon: "01d".to_string(),
        }
    }

    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@2x.png", self.icon)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub location_name: String,
    pub country: Option<String>,
    pub coordinates: Coordinates,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    pub wind_speed: f64,
    pub wind_direction_deg: Option<f64>,
    pub cloudiness_pct: u8,
    pub visibility_m: Option<u32>,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub observation_time: DateTime<Utc>,
    pub utc_offset: FixedOffset,
    pub condition: Condition,
}

/// One 3-hour forecast point.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub condition: Option<Condition>,
}

/// Per-day summary derived from a run of forecast samples.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecastSummary {
    /// Calendar date as `dd/mm/yyyy`.
    pub date: String,
    pub min_temp: f64,
    pub max_temp: f64,
    pub condition: Condition,
    pub samples: Vec<ForecastSample>,
}

/// Result of a completed lookup: both fetches for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub request: LookupRequest,
    pub units: Units,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastSample>,
}
