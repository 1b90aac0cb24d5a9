use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    config::ApiSettings,
    error::WeatherError,
    model::{Condition, Coordinates, CurrentConditions, ForecastSample, LookupRequest, Units},
    provider::{GeoPlace, MIN_SUGGESTION_CHARS, format_suggestion},
};

use super::WeatherGateway;

const SUGGESTION_LIMIT: &str = "5";

#[derive(Debug, Clone)]
pub struct OpenWeatherGateway {
    settings: ApiSettings,
    http: Client,
}

impl OpenWeatherGateway {
    pub fn new(settings: ApiSettings) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { settings, http })
    }

    /// GET `url` with `params` plus the API key, decoding a JSON success body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        debug!(url, ?params, "OpenWeather request");

        let res = self
            .http
            .get(url)
            .query(params)
            .query(&[("appid", self.settings.api_key.as_str())])
            .send()
            .await
            .inspect_err(|e| warn!(url, "OpenWeather request failed: {e}"))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(url, %status, "OpenWeather returned an error: {}", truncate_body(&body));
            return Err(WeatherError::from_status(status.as_u16(), &body));
        }

        Ok(res.json::<T>().await?)
    }

    fn lookup_params(request: &LookupRequest, units: Units) -> Vec<(&'static str, String)> {
        let mut params = request.query_params();
        params.push(("units", units.as_str().to_string()));
        params
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u32,
    main: String,
    description: String,
    icon: String,
}

impl From<OwWeather> for Condition {
    fn from(w: OwWeather) -> Self {
        Condition {
            id: w.id,
            main: w.main,
            description: w.description,
            icon: w.icon,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    coord: OwCoord,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    clouds: OwClouds,
    visibility: Option<u32>,
    sys: OwSys,
    #[serde(default)]
    timezone: i32,
}

impl From<OwCurrentResponse> for CurrentConditions {
    fn from(parsed: OwCurrentResponse) -> Self {
        let condition = parsed
            .weather
            .into_iter()
            .next()
            .map(Condition::from)
            .unwrap_or_else(Condition::unknown);

        CurrentConditions {
            location_name: parsed.name,
            country: parsed.sys.country,
            coordinates: Coordinates {
                latitude: parsed.coord.lat,
                longitude: parsed.coord.lon,
            },
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            wind_speed: parsed.wind.speed,
            wind_direction_deg: parsed.wind.deg,
            cloudiness_pct: parsed.clouds.all,
            visibility_m: parsed.visibility,
            sunrise: parsed.sys.sunrise.and_then(unix_to_utc),
            sunset: parsed.sys.sunset.and_then(unix_to_utc),
            observation_time: unix_to_utc(parsed.dt).unwrap_or_else(Utc::now),
            utc_offset: FixedOffset::east_opt(parsed.timezone).unwrap_or_else(|| Utc.fix()),
            condition,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[async_trait]
impl WeatherGateway for OpenWeatherGateway {
    async fn current_conditions(
        &self,
        request: &LookupRequest,
        units: Units,
    ) -> Result<CurrentConditions, WeatherError> {
        let url = format!("{}/weather", self.settings.base_url);
        let parsed: OwCurrentResponse =
            self.get_json(&url, &Self::lookup_params(request, units)).await?;

        Ok(parsed.into())
    }

    async fn forecast(
        &self,
        request: &LookupRequest,
        units: Units,
    ) -> Result<Vec<ForecastSample>, WeatherError> {
        let url = format!("{}/forecast", self.settings.base_url);
        let parsed: OwForecastResponse =
            self.get_json(&url, &Self::lookup_params(request, units)).await?;

        let samples = parsed
            .list
            .into_iter()
            .filter_map(|entry| {
                let Some(timestamp) = unix_to_utc(entry.dt) else {
                    warn!(dt = entry.dt, "Skipping forecast entry with invalid timestamp");
                    return None;
                };
                Some(ForecastSample {
                    timestamp,
                    temperature: entry.main.temp,
                    condition: entry.weather.into_iter().next().map(Condition::from),
                })
            })
            .collect();

        Ok(samples)
    }

    async fn suggestions(&self, partial: &str) -> Vec<String> {
        if partial.chars().count() < MIN_SUGGESTION_CHARS {
            return Vec::new();
        }

        let url = format!("{}/direct", self.settings.geo_base_url);
        let params = [("q", partial.to_string()), ("limit", SUGGESTION_LIMIT.to_string())];

        match self.get_json::<Vec<GeoPlace>>(&url, &params).await {
            Ok(places) => places
                .iter()
                .map(|p| format_suggestion(p, &self.settings.home_country))
                .collect(),
            Err(e) => {
                warn!("Error fetching suggestions for '{partial}': {e}");
                Vec::new()
            }
        }
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
