//! Current weather and the five-day / three-hour forecast.

use crate::error::OwmError;
use crate::mapper;
use crate::model::UnitSystem;
use crate::model::forecast::Forecast;
use crate::model::weather::Weather;

use super::place::PlaceEndpoint;
use super::{AcceptsLanguage, AcceptsUnits, Customizer, Endpoint};

/// Provider cap on forecast entries (five days of three-hour steps).
pub const MAX_FORECAST_ENTRIES: u32 = 40;

/// `data/2.5/weather`.
#[derive(Debug)]
pub struct CurrentWeather;

impl Endpoint for CurrentWeather {
    type Output = Weather;

    fn map(body: &str, units: UnitSystem) -> Result<Weather, OwmError> {
        mapper::weather::current_weather(body, units)
    }
}

impl PlaceEndpoint for CurrentWeather {}
impl AcceptsUnits for CurrentWeather {}
impl AcceptsLanguage for CurrentWeather {}

/// `data/2.5/forecast`.
#[derive(Debug)]
pub struct FiveDayForecast;

impl Endpoint for FiveDayForecast {
    type Output = Forecast;

    fn map(body: &str, units: UnitSystem) -> Result<Forecast, OwmError> {
        mapper::forecast::forecast(body, units)
    }
}

impl PlaceEndpoint for FiveDayForecast {}
impl AcceptsUnits for FiveDayForecast {}
impl AcceptsLanguage for FiveDayForecast {}

impl Customizer<FiveDayForecast> {
    /// Limits the number of three-hour entries, 1 to [`MAX_FORECAST_ENTRIES`].
    pub fn count(self, count: u32) -> Result<Self, OwmError> {
        if !(1..=MAX_FORECAST_ENTRIES).contains(&count) {
            return Err(OwmError::invalid_parameter(format!(
                "forecast count must be within 1..={MAX_FORECAST_ENTRIES}, got {count}"
            )));
        }
        Ok(self.set(|s| s.set_query_parameter("cnt", count.to_string())))
    }
}
