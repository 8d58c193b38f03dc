use serde::Serialize;
use std::collections::BTreeMap;

use super::Coordinates;

/// A place returned by direct or reverse geocoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geocoding {
    pub name: String,
    /// Place name keyed by language code.
    pub local_names: BTreeMap<String, String>,
    pub coordinates: Coordinates,
    pub country_code: String,
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZipCodeGeocoding {
    pub zip: String,
    pub name: String,
    pub coordinates: Coordinates,
    pub country_code: String,
}
