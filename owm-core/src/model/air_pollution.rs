use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Coordinates;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirPollutionDetails {
    pub coordinates: Coordinates,
    pub records: Vec<AirPollutionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirPollutionRecord {
    pub forecast_time: DateTime<Utc>,
    pub index: AirQualityIndex,
    pub components: AirPollutionComponents,
}

/// Concentrations in μg/m³.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AirPollutionComponents {
    pub co: f64,
    pub no: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    pub nh3: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AirQualityIndex {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
}

impl AirQualityIndex {
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::Good),
            2 => Some(Self::Fair),
            3 => Some(Self::Moderate),
            4 => Some(Self::Poor),
            5 => Some(Self::VeryPoor),
            _ => None,
        }
    }

    pub fn value(&self) -> u8 {
        match self {
            Self::Good => 1,
            Self::Fair => 2,
            Self::Moderate => 3,
            Self::Poor => 4,
            Self::VeryPoor => 5,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }
}
