//! Current, forecast and historical air pollution.

use chrono::{DateTime, Utc};

use crate::error::OwmError;
use crate::mapper;
use crate::model::air_pollution::AirPollutionDetails;
use crate::model::{Coordinates, UnitSystem};

use super::{Customizer, Endpoint, Requester, Stage};

/// Chooses which air pollution dataset to query.
#[must_use = "pick `current`, `forecast` or `historical`"]
pub struct AirPollutionRequester {
    stage: Stage,
}

impl AirPollutionRequester {
    pub(crate) fn new(stage: Stage) -> Self {
        Self { stage }
    }

    pub fn current(self) -> Requester<CurrentAirPollution> {
        Requester::new(self.stage)
    }

    pub fn forecast(mut self) -> Requester<AirPollutionForecast> {
        self.stage.settings_mut().append_path_segment("forecast");
        Requester::new(self.stage)
    }

    pub fn historical(mut self) -> Requester<HistoricalAirPollution> {
        self.stage.settings_mut().append_path_segment("history");
        Requester::new(self.stage)
    }
}

/// `data/2.5/air_pollution`.
#[derive(Debug)]
pub struct CurrentAirPollution;

/// `data/2.5/air_pollution/forecast`.
#[derive(Debug)]
pub struct AirPollutionForecast;

/// `data/2.5/air_pollution/history`.
#[derive(Debug)]
pub struct HistoricalAirPollution;

impl Endpoint for CurrentAirPollution {
    type Output = AirPollutionDetails;

    fn map(body: &str, _units: UnitSystem) -> Result<AirPollutionDetails, OwmError> {
        mapper::air_pollution::air_pollution(body)
    }
}

impl Endpoint for AirPollutionForecast {
    type Output = AirPollutionDetails;

    fn map(body: &str, _units: UnitSystem) -> Result<AirPollutionDetails, OwmError> {
        mapper::air_pollution::air_pollution(body)
    }
}

impl Endpoint for HistoricalAirPollution {
    type Output = AirPollutionDetails;

    fn map(body: &str, _units: UnitSystem) -> Result<AirPollutionDetails, OwmError> {
        mapper::air_pollution::air_pollution(body)
    }
}

impl Requester<CurrentAirPollution> {
    pub fn by_coordinates(self, coordinates: Coordinates) -> Customizer<CurrentAirPollution> {
        self.locate(|s| write_coordinates(s, coordinates))
    }
}

impl Requester<AirPollutionForecast> {
    pub fn by_coordinates(self, coordinates: Coordinates) -> Customizer<AirPollutionForecast> {
        self.locate(|s| write_coordinates(s, coordinates))
    }
}

impl Requester<HistoricalAirPollution> {
    /// History between `start` and `end`, sent as Unix seconds.
    pub fn by_coordinates_and_period(
        self,
        coordinates: Coordinates,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Customizer<HistoricalAirPollution>, OwmError> {
        if start >= end {
            return Err(OwmError::invalid_parameter(format!(
                "period start ({start}) must be before its end ({end})"
            )));
        }

        Ok(self.locate(|s| {
            write_coordinates(s, coordinates);
            s.set_query_parameter("start", start.timestamp().to_string());
            s.set_query_parameter("end", end.timestamp().to_string());
        }))
    }
}

fn write_coordinates(settings: &mut crate::settings::RequestSettings, coordinates: Coordinates) {
    settings.set_query_parameter("lat", coordinates.latitude().to_string());
    settings.set_query_parameter("lon", coordinates.longitude().to_string());
}
