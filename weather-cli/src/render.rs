use std::fmt::Write;

use chrono::{DateTime, FixedOffset, Utc};
use weather_core::{CurrentConditions, DailyForecastSummary, DisplayState, Units};

/// Render a display state as terminal text.
pub fn display(state: &DisplayState) -> String {
    match state {
        DisplayState::Initial => String::new(),
        DisplayState::Loading => "Loading...\n".to_string(),
        DisplayState::Error(message) => format!("{message}\n"),
        DisplayState::Loaded { units, current, forecast } => {
            let mut out = current_conditions(current, *units);
            out.push('\n');
            match forecast {
                Some(days) => out.push_str(&forecast_days(days, *units)),
                None => out.push_str("No forecast data available\n"),
            }
            out
        }
    }
}

pub fn current_conditions(current: &CurrentConditions, units: Units) -> String {
    let symbol = units.temperature_symbol();
    let mut out = String::new();

    let place = match &current.country {
        Some(country) => format!("{}, {country}", current.location_name),
        None => current.location_name.clone(),
    };
    let _ = writeln!(out, "{place}");
    let _ = writeln!(
        out,
        "  {}{symbol} (feels like {}{symbol})  {}",
        current.temperature.round(),
        current.feels_like.round(),
        capitalize(&current.condition.description),
    );
    let _ = writeln!(out, "  Humidity: {}%", current.humidity_pct);
    let _ = writeln!(out, "  Pressure: {} hPa", current.pressure_hpa.round());

    let wind = match current.wind_direction_deg {
        Some(deg) => format!("{} {} {}", current.wind_speed, units.speed_unit(), compass(deg)),
        None => format!("{} {}", current.wind_speed, units.speed_unit()),
    };
    let _ = writeln!(out, "  Wind: {wind}");
    let _ = writeln!(out, "  Cloudiness: {}%", current.cloudiness_pct);
    if let Some(visibility) = current.visibility_m {
        let _ = writeln!(out, "  Visibility: {:.1} km", f64::from(visibility) / 1000.0);
    }
    if let (Some(rise), Some(set)) = (current.sunrise, current.sunset) {
        let _ = writeln!(
            out,
            "  Sunrise: {}  Sunset: {}",
            local_time(rise, current.utc_offset),
            local_time(set, current.utc_offset),
        );
    }

    out
}

pub fn forecast_days(days: &[DailyForecastSummary], units: Units) -> String {
    let symbol = units.temperature_symbol();
    let mut out = format!("{}-Day Weather Forecast\n", days.len());

    for day in days {
        let _ = writeln!(
            out,
            "  {}  High: {}{symbol} / Low: {}{symbol}  {}",
            day.date,
            day.max_temp.round(),
            day.min_temp.round(),
            capitalize(&day.condition.description),
        );
    }

    out
}

fn local_time(ts: DateTime<Utc>, offset: FixedOffset) -> String {
    ts.with_timezone(&offset).format("%H:%M").to_string()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

fn compass(deg: f64) -> &'static str {
    const POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    let idx = ((deg.rem_euclid(360.0) + 22.5) / 45.0) as usize % 8;
    POINTS[idx]
}
