//! Lookup sequencing and display state.
//!
//! Every lookup fetches current conditions first and the forecast second,
//! and only publishes a result when both succeed. Each lookup takes a new
//! generation number; a completion that finds a newer generation in place
//! is dropped instead of overwriting fresher state.

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::{GeolocationError, WeatherError},
    forecast::{DayBoundary, aggregate_daily},
    geolocation::Locator,
    model::{CurrentConditions, DailyForecastSummary, LookupRequest, Units, WeatherReport},
    provider::WeatherGateway,
};

pub const EMPTY_SEARCH_MESSAGE: &str = "Please enter a city name.";
pub const REPLAY_PROMPT_MESSAGE: &str =
    "Please search for a city again to see results in the selected units.";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LookupState {
    #[default]
    Idle,
    Loading,
    Loaded(Box<WeatherReport>),
    Failed(String),
}

/// What a front end should show right now.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    Initial,
    Loading,
    Error(String),
    Loaded {
        units: Units,
        current: CurrentConditions,
        /// `None` when the forecast had no samples.
        forecast: Option<Vec<DailyForecastSummary>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Search,
    Geolocation,
    Replay,
}

#[derive(Debug, Default)]
struct Session {
    units: Units,
    last_request: Option<LookupRequest>,
    generation: u64,
    state: LookupState,
}

impl Session {
    /// Enter `Loading`, dropping previous results and error.
    fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.state = LookupState::Loading;
        self.generation
    }
}

#[derive(Debug)]
pub struct Orchestrator {
    gateway: Box<dyn WeatherGateway>,
    locator: Box<dyn Locator>,
    day_boundary: DayBoundary,
    session: Mutex<Session>,
}

impl Orchestrator {
    pub fn new(
        gateway: Box<dyn WeatherGateway>,
        locator: Box<dyn Locator>,
        units: Units,
        day_boundary: DayBoundary,
    ) -> Self {
        Self {
            gateway,
            locator,
            day_boundary,
            session: Mutex::new(Session {
                units,
                ..Session::default()
            }),
        }
    }

    pub fn units(&self) -> Units {
        self.session.lock().units
    }

    pub fn last_request(&self) -> Option<LookupRequest> {
        self.session.lock().last_request.clone()
    }

    pub fn state(&self) -> LookupState {
        self.session.lock().state.clone()
    }

    /// Name of the location currently on display, if any.
    pub fn displayed_location(&self) -> Option<String> {
        match &self.session.lock().state {
            LookupState::Loaded(report) => Some(report.current.location_name.clone()),
            _ => None,
        }
    }

    /// Derive what to show from the current lookup state.
    pub fn display(&self) -> DisplayState {
        let state = self.state();
        match state {
            LookupState::Idle => DisplayState::Initial,
            LookupState::Loading => DisplayState::Loading,
            LookupState::Failed(message) => DisplayState::Error(message),
            LookupState::Loaded(report) => {
                let forecast = aggregate_daily(&report.forecast, self.day_boundary);
                let report = *report;
                DisplayState::Loaded {
                    units: report.units,
                    current: report.current,
                    forecast,
                }
            }
        }
    }

    pub async fn search(&self, city: &str) -> DisplayState {
        let city = city.trim();
        if city.is_empty() {
            let err = WeatherError::Validation(EMPTY_SEARCH_MESSAGE.to_string());
            let mut session = self.session.lock();
            session.begin();
            session.state = LookupState::Failed(err.to_string());
            drop(session);
            return self.display();
        }

        let request = LookupRequest::city(city);
        let (generation, units) = {
            let mut session = self.session.lock();
            session.last_request = Some(request.clone());
            (session.begin(), session.units)
        };

        self.run(request, units, generation, Origin::Search).await
    }

    pub async fn use_current_location(&self) -> DisplayState {
        let (generation, units) = {
            let mut session = self.session.lock();
            (session.begin(), session.units)
        };

        let position = match self.locator.current_position().await {
            Ok(position) => position,
            Err(e) => return self.fail_geolocation(generation, e),
        };

        let request = LookupRequest::coordinates(position);
        {
            let mut session = self.session.lock();
            if session.generation != generation {
                debug!("Position arrived after a newer lookup started; ignoring");
                drop(session);
                return self.display();
            }
            session.last_request = Some(request.clone());
        }

        self.run(request, units, generation, Origin::Geolocation).await
    }

    /// Switch units and replay the last lookup with them.
    pub async fn change_units(&self, units: Units) -> DisplayState {
        let (generation, request) = {
            let mut session = self.session.lock();
            session.units = units;
            let generation = session.begin();
            match session.last_request.clone() {
                Some(request) => (generation, request),
                None => {
                    session.state = LookupState::Failed(REPLAY_PROMPT_MESSAGE.to_string());
                    drop(session);
                    return self.display();
                }
            }
        };

        info!(%units, %request, "Replaying lookup with new units");
        // A replayed position keeps geolocation rules: failure forgets it.
        let origin = match request {
            LookupRequest::Coordinates { .. } => Origin::Geolocation,
            LookupRequest::City { .. } => Origin::Replay,
        };
        self.run(request, units, generation, origin).await
    }

    pub async fn suggestions(&self, partial: &str) -> Vec<String> {
        self.gateway.suggestions(partial).await
    }

    async fn run(
        &self,
        request: LookupRequest,
        units: Units,
        generation: u64,
        origin: Origin,
    ) -> DisplayState {
        debug!(%request, %units, generation, ?origin, "Starting lookup");
        let outcome = self.fetch(&request, units).await;

        let mut session = self.session.lock();
        if session.generation != generation {
            debug!(generation, current = session.generation, "Discarding stale lookup result");
            drop(session);
            return self.display();
        }

        match outcome {
            Ok(report) => {
                session.state = LookupState::Loaded(Box::new(report));
            }
            Err(e) => {
                warn!(%request, "Lookup failed: {e}");
                session.state = LookupState::Failed(e.to_string());
                if origin == Origin::Geolocation {
                    session.last_request = None;
                }
            }
        }
        drop(session);

        self.display()
    }

    async fn fetch(
        &self,
        request: &LookupRequest,
        units: Units,
    ) -> Result<WeatherReport, WeatherError> {
        let current = self.gateway.current_conditions(request, units).await?;
        let forecast = self.gateway.forecast(request, units).await?;

        Ok(WeatherReport {
            request: request.clone(),
            units,
            current,
            forecast,
        })
    }

    fn fail_geolocation(&self, generation: u64, err: GeolocationError) -> DisplayState {
        warn!("Could not determine current position: {err:?}");
        let mut session = self.session.lock();
        if session.generation == generation {
            session.state = LookupState::Failed(WeatherError::from(err).to_string());
            session.last_request = None;
        }
        drop(session);
        self.display()
    }
}
