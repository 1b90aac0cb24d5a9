use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    config::Config,
    error::WeatherError,
    model::{CurrentConditions, ForecastSample, LookupRequest, Units},
    provider::openweather::OpenWeatherGateway,
};

pub mod openweather;

/// Outbound access to the remote weather service.
///
/// No operation retries; callers decide whether to try again.
#[async_trait]
pub trait WeatherGateway: Send + Sync + Debug {
    async fn current_conditions(
        &self,
        request: &LookupRequest,
        units: Units,
    ) -> Result<CurrentConditions, WeatherError>;

    async fn forecast(
        &self,
        request: &LookupRequest,
        units: Units,
    ) -> Result<Vec<ForecastSample>, WeatherError>;

    /// City-name completions for `partial`. Never fails: problems yield an
    /// empty list.
    async fn suggestions(&self, partial: &str) -> Vec<String>;
}

/// One place returned by the geocoding endpoint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct GeoPlace {
    pub name: String,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Suggestions shorter than this are not looked up.
pub const MIN_SUGGESTION_CHARS: usize = 3;

/// Render a place as a suggestion label.
///
/// State is always appended when known. Country is appended when it differs
/// from `home_country`, or when it is the home country and no state is known.
pub fn format_suggestion(place: &GeoPlace, home_country: &str) -> String {
    let mut label = place.name.clone();

    if let Some(state) = &place.state {
        label.push_str(", ");
        label.push_str(state);
    }

    match &place.country {
        Some(country) if country != home_country => {
            label.push_str(", ");
            label.push_str(country);
        }
        Some(country) if place.state.is_none() => {
            label.push_str(", ");
            label.push_str(country);
        }
        _ => {}
    }

    label
}

/// Construct the gateway from config.
pub fn gateway_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherGateway>> {
    let settings = config.api_settings()?;
    Ok(Box::new(OpenWeatherGateway::new(settings)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str, state: Option<&str>, country: Option<&str>) -> GeoPlace {
        GeoPlace {
            name: name.into(),
            state: state.map(Into::into),
            country: country.map(Into::into),
        }
    }

    #[test]
    fn foreign_city_gets_country() {
        assert_eq!(format_suggestion(&place("Paris", None, Some("FR")), "US"), "Paris, FR");
    }

    #[test]
    fn home_city_with_state_drops_country() {
        let p = place("Springfield", Some("IL"), Some("US"));
        assert_eq!(format_suggestion(&p, "US"), "Springfield, IL");
    }

    #[test]
    fn home_city_without_state_keeps_country() {
        let p = place("Springfield", None, Some("US"));
        assert_eq!(format_suggestion(&p, "US"), "Springfield, US");
    }

    #[test]
    fn foreign_city_with_state_gets_both() {
        let p = place("Toronto", Some("Ontario"), Some("CA"));
        assert_eq!(format_suggestion(&p, "US"), "Toronto, Ontario, CA");
    }

    #[test]
    fn bare_name_when_nothing_else_known() {
        assert_eq!(format_suggestion(&place("Atlantis", None, None), "US"), "Atlantis");
    }

    #[test]
    fn home_country_is_configurable() {
        let p = place("Leeds", Some("England"), Some("GB"));
        assert_eq!(format_suggestion(&p, "GB"), "Leeds, England");
        assert_eq!(format_suggestion(&p, "US"), "Leeds, England, GB");
    }

    #[test]
    fn gateway_from_config_errors_when_missing_api_key() {
        let err = gateway_from_config(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn gateway_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());
        assert!(gateway_from_config(&cfg).is_ok());
    }
}
