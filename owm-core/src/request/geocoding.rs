//! Direct, reverse and zip-code geocoding.

use crate::error::OwmError;
use crate::mapper;
use crate::model::geocoding::{Geocoding, ZipCodeGeocoding};
use crate::model::{Coordinates, UnitSystem};

use super::{Customizer, Endpoint, Requester, Stage, country_code, require_text};

/// Provider cap on geocoding results.
pub const MAX_GEOCODING_RESULTS: u8 = 5;

/// Chooses the geocoding flavour.
#[must_use = "pick `direct`, `reverse` or `zip_code`"]
pub struct GeocodingRequester {
    stage: Stage,
}

impl GeocodingRequester {
    pub(crate) fn new(stage: Stage) -> Self {
        Self { stage }
    }

    pub fn direct(mut self) -> Requester<DirectGeocoding> {
        self.stage.settings_mut().append_path_segment("direct");
        Requester::new(self.stage)
    }

    pub fn reverse(mut self) -> Requester<ReverseGeocoding> {
        self.stage.settings_mut().append_path_segment("reverse");
        Requester::new(self.stage)
    }

    pub fn zip_code(mut self) -> Requester<ZipCodeLookup> {
        self.stage.settings_mut().append_path_segment("zip");
        Requester::new(self.stage)
    }
}

/// `geo/1.0/direct`.
#[derive(Debug)]
pub struct DirectGeocoding;

/// `geo/1.0/reverse`.
#[derive(Debug)]
pub struct ReverseGeocoding;

/// `geo/1.0/zip`.
#[derive(Debug)]
pub struct ZipCodeLookup;

impl Endpoint for DirectGeocoding {
    type Output = Vec<Geocoding>;

    fn map(body: &str, _units: UnitSystem) -> Result<Vec<Geocoding>, OwmError> {
        mapper::geocoding::locations(body)
    }
}

impl Endpoint for ReverseGeocoding {
    type Output = Vec<Geocoding>;

    fn map(body: &str, _units: UnitSystem) -> Result<Vec<Geocoding>, OwmError> {
        mapper::geocoding::locations(body)
    }
}

impl Endpoint for ZipCodeLookup {
    type Output = ZipCodeGeocoding;

    fn map(body: &str, _units: UnitSystem) -> Result<ZipCodeGeocoding, OwmError> {
        mapper::geocoding::zip_code(body)
    }
}

impl Requester<DirectGeocoding> {
    /// `name` may carry state and country, e.g. `"London,GB"`.
    pub fn by_location_name(self, name: &str) -> Result<Customizer<DirectGeocoding>, OwmError> {
        let name = require_text("location name", name)?.to_string();
        Ok(self.locate(|s| s.set_query_parameter("q", name)))
    }
}

impl Requester<ReverseGeocoding> {
    pub fn by_coordinates(self, coordinates: Coordinates) -> Customizer<ReverseGeocoding> {
        self.locate(|s| {
            s.set_query_parameter("lat", coordinates.latitude().to_string());
            s.set_query_parameter("lon", coordinates.longitude().to_string());
        })
    }
}

impl Requester<ZipCodeLookup> {
    pub fn by_zip_code_and_country(
        self,
        zip_code: &str,
        country: &str,
    ) -> Result<Customizer<ZipCodeLookup>, OwmError> {
        let zip_code = require_text("zip code", zip_code)?;
        let country = country_code(country)?;
        let query = format!("{zip_code},{country}");
        Ok(self.locate(|s| s.set_query_parameter("zip", query)))
    }
}

impl Customizer<DirectGeocoding> {
    /// Maximum number of places, 1 to [`MAX_GEOCODING_RESULTS`].
    pub fn limit(self, limit: u8) -> Result<Self, OwmError> {
        validate_limit(limit)?;
        Ok(self.set(|s| s.set_query_parameter("limit", limit.to_string())))
    }
}

impl Customizer<ReverseGeocoding> {
    /// Maximum number of places, 1 to [`MAX_GEOCODING_RESULTS`].
    pub fn limit(self, limit: u8) -> Result<Self, OwmError> {
        validate_limit(limit)?;
        Ok(self.set(|s| s.set_query_parameter("limit", limit.to_string())))
    }
}

fn validate_limit(limit: u8) -> Result<(), OwmError> {
    if !(1..=MAX_GEOCODING_RESULTS).contains(&limit) {
        return Err(OwmError::invalid_parameter(format!(
            "geocoding limit must be within 1..={MAX_GEOCODING_RESULTS}, got {limit}"
        )));
    }
    Ok(())
}
