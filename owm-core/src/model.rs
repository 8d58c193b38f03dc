use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::OwmError;
use crate::measurement::{SpeedUnit, TemperatureUnit};

pub mod air_pollution;
pub mod forecast;
pub mod geocoding;
pub mod road_risk;
pub mod weather;

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Fails with [`OwmError::InvalidParameter`] outside [-90, 90] × [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, OwmError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(OwmError::invalid_parameter(format!(
                "latitude must be within [-90, 90], got {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(OwmError::invalid_parameter(format!(
                "longitude must be within [-180, 180], got {longitude}"
            )));
        }

        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat={}, lon={}", self.latitude, self.longitude)
    }
}

/// Unit system the provider should use in its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Kelvin and meters per second.
    #[default]
    Standard,
    /// Celsius and meters per second.
    Metric,
    /// Fahrenheit and miles per hour.
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Standard => "standard",
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    /// Temperature unit of response values in this system.
    pub fn temperature_unit(&self) -> TemperatureUnit {
        match self {
            UnitSystem::Standard => TemperatureUnit::Kelvin,
            UnitSystem::Metric => TemperatureUnit::Celsius,
            UnitSystem::Imperial => TemperatureUnit::Fahrenheit,
        }
    }

    /// Wind speed unit of response values in this system.
    pub fn speed_unit(&self) -> SpeedUnit {
        match self {
            UnitSystem::Standard | UnitSystem::Metric => SpeedUnit::MetersPerSecond,
            UnitSystem::Imperial => SpeedUnit::MilesPerHour,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = OwmError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "standard" => Ok(UnitSystem::Standard),
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(OwmError::invalid_parameter(format!(
                "unknown unit system '{value}'. Supported: standard, metric, imperial."
            ))),
        }
    }
}

/// Languages the provider can translate condition descriptions into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    Arabic,
    Chinese,
    Czech,
    Dutch,
    #[default]
    English,
    Finnish,
    French,
    German,
    Greek,
    Italian,
    Japanese,
    Korean,
    Polish,
    Portuguese,
    Russian,
    Spanish,
    Swedish,
    Turkish,
    Ukrainian,
}

impl Language {
    pub const fn all() -> &'static [Language] {
        &[
            Language::Arabic,
            Language::Chinese,
            Language::Czech,
            Language::Dutch,
            Language::English,
            Language::Finnish,
            Language::French,
            Language::German,
            Language::Greek,
            Language::Italian,
            Language::Japanese,
            Language::Korean,
            Language::Polish,
            Language::Portuguese,
            Language::Russian,
            Language::Spanish,
            Language::Swedish,
            Language::Turkish,
            Language::Ukrainian,
        ]
    }

    /// Provider language code, sent as the `lang` query parameter.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Arabic => "ar",
            Language::Chinese => "zh_cn",
            Language::Czech => "cz",
            Language::Dutch => "nl",
            Language::English => "en",
            Language::Finnish => "fi",
            Language::French => "fr",
            Language::German => "de",
            Language::Greek => "el",
            Language::Italian => "it",
            Language::Japanese => "ja",
            Language::Korean => "kr",
            Language::Polish => "pl",
            Language::Portuguese => "pt",
            Language::Russian => "ru",
            Language::Spanish => "es",
            Language::Swedish => "sv",
            Language::Turkish => "tr",
            Language::Ukrainian => "ua",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = OwmError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lower = value.to_lowercase();
        Language::all()
            .iter()
            .copied()
            .find(|lang| lang.code() == lower)
            .ok_or_else(|| OwmError::invalid_parameter(format!("unsupported language code '{value}'")))
    }
}

impl TryFrom<String> for Language {
    type Error = OwmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Language> for String {
    fn from(value: Language) -> Self {
        value.code().to_string()
    }
}

/// One weather condition reported by the provider, e.g. "light rain".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherState {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub icon_id: String,
}

impl WeatherState {
    /// URL of the provider's icon for this condition.
    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/w/{}.png", self.icon_id)
    }
}

/// Pressure in hPa at sea level, with ground level when the provider reports it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AtmosphericPressure {
    pub sea_level: f64,
    pub ground_level: Option<f64>,
}
