use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::measurement::{Distance, Measurement, Speed, Temperature};

use super::{AtmosphericPressure, Coordinates, WeatherState};

/// Current weather at one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weather {
    pub location: Location,
    pub calculated_at: DateTime<Utc>,
    pub states: Vec<WeatherState>,
    pub temperature: TemperatureReading,
    pub pressure: AtmosphericPressure,
    /// Relative humidity, percent.
    pub humidity: u8,
    pub wind: Wind,
    pub visibility: Option<Measurement<Distance>>,
    /// Cloudiness, percent.
    pub clouds: Option<u8>,
    pub rain: Option<Precipitation>,
    pub snow: Option<Precipitation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub country_code: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    /// Shift from UTC in seconds.
    pub timezone_offset: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureReading {
    pub value: Measurement<Temperature>,
    pub feels_like: Option<Measurement<Temperature>>,
    pub min: Option<Measurement<Temperature>>,
    pub max: Option<Measurement<Temperature>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Wind {
    pub speed: Measurement<Speed>,
    /// Meteorological degrees.
    pub degrees: Option<f64>,
    pub gust: Option<Measurement<Speed>>,
}

/// Precipitation volume in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Precipitation {
    pub one_hour: Option<f64>,
    pub three_hours: Option<f64>,
}
