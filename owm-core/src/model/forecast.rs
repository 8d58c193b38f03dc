use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::measurement::{Distance, Measurement};

use super::weather::{TemperatureReading, Wind};
use super::{AtmosphericPressure, Coordinates, WeatherState};

/// Five days of forecasts in three-hour steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub location: ForecastLocation,
    pub entries: Vec<WeatherForecast>,
}

impl Forecast {
    /// Entry whose forecast time is closest to `when`.
    pub fn closest_to(&self, when: DateTime<Utc>) -> Option<&WeatherForecast> {
        let target = when.timestamp();
        self.entries
            .iter()
            .min_by_key(|e| (e.forecast_time.timestamp() - target).abs())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastLocation {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub country_code: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub population: Option<u64>,
    pub timezone_offset: Option<i32>,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherForecast {
    pub forecast_time: DateTime<Utc>,
    pub states: Vec<WeatherState>,
    pub temperature: TemperatureReading,
    pub pressure: AtmosphericPressure,
    pub humidity: u8,
    pub wind: Wind,
    pub visibility: Option<Measurement<Distance>>,
    pub clouds: Option<u8>,
    /// Probability of precipitation, 0.0 to 1.0.
    pub precipitation_probability: Option<f64>,
    /// Rain volume for the last three hours, mm.
    pub rain: Option<f64>,
    /// Snow volume for the last three hours, mm.
    pub snow: Option<f64>,
    pub day_time: Option<DayTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayTime {
    Day,
    Night,
}
