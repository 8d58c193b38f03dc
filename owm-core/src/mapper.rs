//! Turns provider JSON into domain models.
//!
//! Each endpoint family has its own module that spells out which response
//! field feeds which model field. They all walk the document through [`Node`],
//! which remembers the path it was reached by so that a missing or mistyped
//! field is reported as e.g. `list[3].main.temp`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::error::OwmError;
use crate::measurement::{Distance, DistanceUnit, Measurement, Speed, Temperature};
use crate::model::{AtmosphericPressure, Coordinates, UnitSystem, WeatherState};

pub mod air_pollution;
pub mod forecast;
pub mod geocoding;
pub mod road_risk;
pub mod weather;

/// Parses `body` and hands the root node to `map`.
pub(crate) fn parse<T>(
    body: &str,
    map: impl FnOnce(Node<'_>) -> Result<T, OwmError>,
) -> Result<T, OwmError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| OwmError::malformed("$", format!("invalid JSON: {e}"), body))?;
    tracing::trace!(bytes = body.len(), "mapping provider response");
    map(Node::root(&value))
}

/// A JSON value plus the path it was reached by.
#[derive(Debug, Clone)]
pub(crate) struct Node<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Node<'a> {
    pub(crate) fn root(value: &'a Value) -> Self {
        Self {
            value,
            path: "$".to_string(),
        }
    }

    fn child_path(&self, key: &str) -> String {
        if self.path == "$" {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    fn error(&self, reason: impl Into<String>) -> OwmError {
        OwmError::malformed(self.path.clone(), reason, self.value.to_string())
    }

    /// Required member; absent and `null` are both errors.
    pub(crate) fn field(&self, key: &str) -> Result<Node<'a>, OwmError> {
        self.optional(key)?.ok_or_else(|| {
            OwmError::malformed(self.child_path(key), "required field is missing", "null")
        })
    }

    /// Optional member; absent and `null` both map to `None`.
    pub(crate) fn optional(&self, key: &str) -> Result<Option<Node<'a>>, OwmError> {
        let object = self
            .value
            .as_object()
            .ok_or_else(|| self.error("expected an object"))?;

        Ok(object.get(key).filter(|v| !v.is_null()).map(|value| Node {
            value,
            path: self.child_path(key),
        }))
    }

    pub(crate) fn elements(&self) -> Result<Vec<Node<'a>>, OwmError> {
        let array = self
            .value
            .as_array()
            .ok_or_else(|| self.error("expected an array"))?;

        Ok(array
            .iter()
            .enumerate()
            .map(|(i, value)| Node {
                value,
                path: if self.path == "$" {
                    format!("[{i}]")
                } else {
                    format!("{}[{i}]", self.path)
                },
            })
            .collect())
    }

    /// Members of an object as `(key, node)` pairs.
    pub(crate) fn entries(&self) -> Result<Vec<(&'a str, Node<'a>)>, OwmError> {
        let object = self
            .value
            .as_object()
            .ok_or_else(|| self.error("expected an object"))?;

        Ok(object
            .iter()
            .map(|(key, value)| {
                (
                    key.as_str(),
                    Node {
                        value,
                        path: self.child_path(key),
                    },
                )
            })
            .collect())
    }

    pub(crate) fn f64(&self) -> Result<f64, OwmError> {
        self.value.as_f64().ok_or_else(|| self.error("expected a number"))
    }

    pub(crate) fn i64(&self) -> Result<i64, OwmError> {
        self.value
            .as_i64()
            .ok_or_else(|| self.error("expected an integer"))
    }

    pub(crate) fn u64(&self) -> Result<u64, OwmError> {
        self.value
            .as_u64()
            .ok_or_else(|| self.error("expected a non-negative integer"))
    }

    /// Percentages and other small counters.
    pub(crate) fn u8(&self) -> Result<u8, OwmError> {
        let value = self.u64()?;
        u8::try_from(value).map_err(|_| self.error("expected an integer in 0..=255"))
    }

    pub(crate) fn string(&self) -> Result<String, OwmError> {
        self.value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.error("expected a string"))
    }

    /// The number exactly as written in the document, without a detour through binary floats.
    pub(crate) fn decimal(&self) -> Result<Decimal, OwmError> {
        let Value::Number(number) = self.value else {
            return Err(self.error("expected a number"));
        };
        let text = number.to_string();

        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(|_| self.error("number is not representable as a decimal"))
    }

    /// Unix seconds.
    pub(crate) fn timestamp(&self) -> Result<DateTime<Utc>, OwmError> {
        let seconds = self.i64()?;
        DateTime::from_timestamp(seconds, 0).ok_or_else(|| self.error("timestamp out of range"))
    }

    /// A temperature expressed in the response's unit system.
    pub(crate) fn temperature(&self, units: UnitSystem) -> Result<Measurement<Temperature>, OwmError> {
        Measurement::from_unit(self.decimal()?, units.temperature_unit())
    }

    /// A wind speed expressed in the response's unit system.
    pub(crate) fn speed(&self, units: UnitSystem) -> Result<Measurement<Speed>, OwmError> {
        Measurement::from_unit(self.decimal()?, units.speed_unit())
    }

    /// Visibility is reported in meters whatever the unit system.
    pub(crate) fn distance(&self) -> Result<Measurement<Distance>, OwmError> {
        Measurement::from_unit(self.decimal()?, DistanceUnit::Meters)
    }

    /// `{"lat": .., "lon": ..}`.
    pub(crate) fn coordinates(&self) -> Result<Coordinates, OwmError> {
        let lat = self.field("lat")?.f64()?;
        let lon = self.field("lon")?.f64()?;
        Coordinates::new(lat, lon).map_err(|e| self.error(e.to_string()))
    }

    pub(crate) fn optional_f64(&self, key: &str) -> Result<Option<f64>, OwmError> {
        self.optional(key)?.map(|n| n.f64()).transpose()
    }

    pub(crate) fn optional_string(&self, key: &str) -> Result<Option<String>, OwmError> {
        self.optional(key)?.map(|n| n.string()).transpose()
    }

    pub(crate) fn optional_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>, OwmError> {
        self.optional(key)?.map(|n| n.timestamp()).transpose()
    }

    pub(crate) fn optional_temperature(
        &self,
        key: &str,
        units: UnitSystem,
    ) -> Result<Option<Measurement<Temperature>>, OwmError> {
        self.optional(key)?.map(|n| n.temperature(units)).transpose()
    }
}

/// The `weather` array shared by current weather and forecasts.
pub(crate) fn weather_states(node: &Node<'_>) -> Result<Vec<WeatherState>, OwmError> {
    let Some(states) = node.optional("weather")? else {
        return Ok(Vec::new());
    };

    states
        .elements()?
        .iter()
        .map(|state| {
            Ok(WeatherState {
                id: u32::try_from(state.field("id")?.u64()?)
                    .map_err(|_| state.error("condition id out of range"))?,
                name: state.field("main")?.string()?,
                description: state.field("description")?.string()?,
                icon_id: state.field("icon")?.string()?,
            })
        })
        .collect()
}

/// Pressure out of a `main` block.
pub(crate) fn pressure(main: &Node<'_>) -> Result<AtmosphericPressure, OwmError> {
    Ok(AtmosphericPressure {
        sea_level: match main.optional_f64("sea_level")? {
            Some(sea_level) => sea_level,
            None => main.field("pressure")?.f64()?,
        },
        ground_level: main.optional_f64("grnd_level")?,
    })
}
