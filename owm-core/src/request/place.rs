//! Locators shared by the families that can be queried by place.

use crate::error::OwmError;
use crate::model::Coordinates;

use super::{Customizer, Endpoint, Requester, country_code, require_text};

/// Families that accept `q`, `id`, `zip` or `lat`/`lon` as their target.
pub trait PlaceEndpoint: Endpoint {}

impl<E: PlaceEndpoint> Requester<E> {
    pub fn by_city_name(self, city_name: &str) -> Result<Customizer<E>, OwmError> {
        let city_name = require_text("city name", city_name)?.to_string();
        Ok(self.locate(|s| s.set_query_parameter("q", city_name)))
    }

    pub fn by_city_name_and_country(
        self,
        city_name: &str,
        country: &str,
    ) -> Result<Customizer<E>, OwmError> {
        let city_name = require_text("city name", city_name)?;
        let country = country_code(country)?;
        let query = format!("{city_name},{country}");
        Ok(self.locate(|s| s.set_query_parameter("q", query)))
    }

    pub fn by_city_id(self, city_id: u64) -> Customizer<E> {
        self.locate(|s| s.set_query_parameter("id", city_id.to_string()))
    }

    pub fn by_coordinates(self, coordinates: Coordinates) -> Customizer<E> {
        self.locate(|s| {
            s.set_query_parameter("lat", coordinates.latitude().to_string());
            s.set_query_parameter("lon", coordinates.longitude().to_string());
        })
    }

    pub fn by_zip_code_and_country(
        self,
        zip_code: &str,
        country: &str,
    ) -> Result<Customizer<E>, OwmError> {
        let zip_code = require_text("zip code", zip_code)?;
        let country = country_code(country)?;
        let query = format!("{zip_code},{country}");
        Ok(self.locate(|s| s.set_query_parameter("zip", query)))
    }
}
