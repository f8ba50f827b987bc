use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::convert::{celsius_to_fahrenheit, celsius_to_kelvin};

/// City and state a postal code resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub cep: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub text: String,
    pub icon: String,
    pub code: Option<i32>,
}

/// Place as reported by the weather provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub region: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub local_time: Option<String>,
}

/// Meteorological fields the provider sends but the report does not use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ancillary {
    pub feels_like_c: Option<f64>,
    pub humidity_pct: Option<u8>,
    pub cloud_pct: Option<u8>,
    pub wind_kph: Option<f64>,
    pub wind_degree: Option<u16>,
    pub wind_dir: Option<String>,
    pub gust_kph: Option<f64>,
    pub pressure_mb: Option<f64>,
    pub precip_mm: Option<f64>,
    pub visibility_km: Option<f64>,
    pub uv: Option<f64>,
    pub is_day: Option<bool>,
}

/// Current conditions for a location, as returned by a weather provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    /// Provider-supplied; the report derives its own Fahrenheit value.
    pub temperature_f: Option<f64>,
    pub condition: Condition,
    pub place: Place,
    pub ancillary: Ancillary,
    pub observed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportCondition {
    pub text: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLocation {
    pub city: String,
    pub state: String,
    pub country: String,
}

/// Body of a successful lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
    pub condition: ReportCondition,
    pub location: ReportLocation,
}

impl WeatherReport {
    /// Builds the report, computing Fahrenheit and Kelvin from the Celsius
    /// reading so the three temperatures always agree.
    pub fn from_conditions(conditions: &CurrentConditions) -> Self {
        let celsius = conditions.temperature_c;

        Self {
            temp_c: celsius,
            temp_f: celsius_to_fahrenheit(celsius),
            temp_k: celsius_to_kelvin(celsius),
            condition: ReportCondition {
                text: conditions.condition.text.clone(),
                icon: conditions.condition.icon.clone(),
            },
            location: ReportLocation {
                city: conditions.place.name.clone(),
                state: conditions.place.region.clone(),
                country: conditions.place.country.clone(),
            },
        }
    }
}

/// Body of a failed lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub message: String,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[cfg(test)]
pub(crate) fn sample_conditions(temperature_c: f64) -> CurrentConditions {
    CurrentConditions {
        temperature_c,
        temperature_f: Some(999.0),
        condition: Condition {
            text: "Sunny".into(),
            icon: "//cdn.weatherapi.com/weather/64x64/day/113.png".into(),
            code: Some(1000),
        },
        place: Place {
            name: "São Paulo".into(),
            region: "São Paulo".into(),
            country: "Brazil".into(),
            latitude: Some(-23.53),
            longitude: Some(-46.62),
            timezone: Some("America/Sao_Paulo".into()),
            local_time: None,
        },
        ancillary: Ancillary::default(),
        observed_at: None,
    }
}
