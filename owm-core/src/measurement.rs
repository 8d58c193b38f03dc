//! Unit-aware physical quantities.
//!
//! A [`Measurement`] stores its value once, in the canonical unit of its
//! quantity (meters, meters per second, Kelvin), and derives every other unit
//! at read time. Conversions are pure and rounded to two decimal places with
//! banker's rounding, so two equal measurements always read the same.
//!
//! The conversion factors are the provider's published approximations
//! (1609.34 m per mile, 2.236936 mph per m/s), not exact physical constants.

use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use std::marker::PhantomData;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::OwmError;

const KILOMETERS_PER_METER: Decimal = Decimal::from_parts(1, 0, 0, false, 3);
const METERS_PER_MILE: Decimal = Decimal::from_parts(160_934, 0, 0, false, 2);
const KMH_PER_MPS: Decimal = Decimal::from_parts(36, 0, 0, false, 1);
const MPH_PER_MPS: Decimal = Decimal::from_parts(2_236_936, 0, 0, false, 6);
const KELVIN_OFFSET: Decimal = Decimal::from_parts(27_315, 0, 0, false, 2);
const FAHRENHEIT_OFFSET: Decimal = Decimal::from_parts(45_967, 0, 0, false, 2);
const FAHRENHEIT_SCALE: Decimal = Decimal::from_parts(18, 0, 0, false, 1);
/// 10^12; anything larger cannot be a weather reading and risks overflow.
const MAX_MAGNITUDE: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

const OUTPUT_SCALE: u32 = 2;

/// Runtime tag of a quantity marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantityKind {
    Distance,
    Speed,
    Temperature,
}

impl QuantityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuantityKind::Distance => "distance",
            QuantityKind::Speed => "speed",
            QuantityKind::Temperature => "temperature",
        }
    }
}

impl Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A kind of physical quantity together with its unit catalogue.
pub trait Quantity: sealed::Sealed + Copy + Debug + PartialEq + Eq + Hash {
    type Unit: Copy + Debug + PartialEq + Eq;

    const KIND: QuantityKind;
    const CANONICAL_UNIT: Self::Unit;
    const ALLOWS_NEGATIVE: bool;

    /// Canonical value expressed in `unit`, unrounded.
    fn from_canonical(canonical: Decimal, unit: Self::Unit) -> Decimal;

    /// Value expressed in `unit`, brought back to the canonical unit.
    fn to_canonical(value: Decimal, unit: Self::Unit) -> Decimal;

    fn symbol(unit: Self::Unit) -> &'static str;
}

/// Distance marker; canonical unit is the meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Distance;

/// Speed marker; canonical unit is meters per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Speed;

/// Temperature marker; canonical unit is the Kelvin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Temperature;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceUnit {
    Meters,
    Kilometers,
    Miles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeedUnit {
    MetersPerSecond,
    KilometersPerHour,
    MilesPerHour,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemperatureUnit {
    Kelvin,
    Celsius,
    Fahrenheit,
}

impl sealed::Sealed for Distance {}
impl sealed::Sealed for Speed {}
impl sealed::Sealed for Temperature {}

impl Quantity for Distance {
    type Unit = DistanceUnit;

    const KIND: QuantityKind = QuantityKind::Distance;
    const CANONICAL_UNIT: DistanceUnit = DistanceUnit::Meters;
    const ALLOWS_NEGATIVE: bool = false;

    fn from_canonical(meters: Decimal, unit: DistanceUnit) -> Decimal {
        match unit {
            DistanceUnit::Meters => meters,
            DistanceUnit::Kilometers => meters * KILOMETERS_PER_METER,
            DistanceUnit::Miles => meters / METERS_PER_MILE,
        }
    }

    fn to_canonical(value: Decimal, unit: DistanceUnit) -> Decimal {
        match unit {
            DistanceUnit::Meters => value,
            DistanceUnit::Kilometers => value / KILOMETERS_PER_METER,
            DistanceUnit::Miles => value * METERS_PER_MILE,
        }
    }

    fn symbol(unit: DistanceUnit) -> &'static str {
        match unit {
            DistanceUnit::Meters => "m",
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "mi",
        }
    }
}

impl Quantity for Speed {
    type Unit = SpeedUnit;

    const KIND: QuantityKind = QuantityKind::Speed;
    const CANONICAL_UNIT: SpeedUnit = SpeedUnit::MetersPerSecond;
    const ALLOWS_NEGATIVE: bool = false;

    fn from_canonical(mps: Decimal, unit: SpeedUnit) -> Decimal {
        match unit {
            SpeedUnit::MetersPerSecond => mps,
            SpeedUnit::KilometersPerHour => mps * KMH_PER_MPS,
            SpeedUnit::MilesPerHour => mps * MPH_PER_MPS,
        }
    }

    fn to_canonical(value: Decimal, unit: SpeedUnit) -> Decimal {
        match unit {
            SpeedUnit::MetersPerSecond => value,
            SpeedUnit::KilometersPerHour => value / KMH_PER_MPS,
            SpeedUnit::MilesPerHour => value / MPH_PER_MPS,
        }
    }

    fn symbol(unit: SpeedUnit) -> &'static str {
        match unit {
            SpeedUnit::MetersPerSecond => "m/s",
            SpeedUnit::KilometersPerHour => "km/h",
            SpeedUnit::MilesPerHour => "mph",
        }
    }
}

impl Quantity for Temperature {
    type Unit = TemperatureUnit;

    const KIND: QuantityKind = QuantityKind::Temperature;
    const CANONICAL_UNIT: TemperatureUnit = TemperatureUnit::Kelvin;
    const ALLOWS_NEGATIVE: bool = true;

    fn from_canonical(kelvin: Decimal, unit: TemperatureUnit) -> Decimal {
        match unit {
            TemperatureUnit::Kelvin => kelvin,
            TemperatureUnit::Celsius => kelvin - KELVIN_OFFSET,
            TemperatureUnit::Fahrenheit => kelvin * FAHRENHEIT_SCALE - FAHRENHEIT_OFFSET,
        }
    }

    fn to_canonical(value: Decimal, unit: TemperatureUnit) -> Decimal {
        match unit {
            TemperatureUnit::Kelvin => value,
            TemperatureUnit::Celsius => value + KELVIN_OFFSET,
            TemperatureUnit::Fahrenheit => (value + FAHRENHEIT_OFFSET) / FAHRENHEIT_SCALE,
        }
    }

    fn symbol(unit: TemperatureUnit) -> &'static str {
        match unit {
            TemperatureUnit::Kelvin => "K",
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

/// An immutable physical quantity stored in its canonical unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Measurement<Q: Quantity> {
    canonical: Decimal,
    quantity: PhantomData<Q>,
}

impl<Q: Quantity> Measurement<Q> {
    /// Wraps a value already expressed in the canonical unit of `Q`.
    pub fn of(canonical: Decimal) -> Result<Self, OwmError> {
        check_magnitude::<Q>(canonical)?;
        if !Q::ALLOWS_NEGATIVE && canonical.is_sign_negative() && !canonical.is_zero() {
            return Err(invalid::<Q>(canonical));
        }

        Ok(Self {
            canonical,
            quantity: PhantomData,
        })
    }

    /// Like [`Measurement::of`], rejecting NaN and infinities.
    pub fn from_f64(canonical: f64) -> Result<Self, OwmError> {
        let value = Decimal::from_f64(canonical).ok_or_else(|| OwmError::InvalidQuantity {
            kind: Q::KIND,
            value: canonical.to_string(),
        })?;
        Self::of(value)
    }

    /// Builds a measurement from a reading in an arbitrary unit of `Q`.
    pub fn from_unit(value: Decimal, unit: Q::Unit) -> Result<Self, OwmError> {
        check_magnitude::<Q>(value)?;
        Self::of(Q::to_canonical(value, unit))
    }

    pub fn kind(&self) -> QuantityKind {
        Q::KIND
    }

    /// Raw canonical value, unrounded.
    pub fn canonical_value(&self) -> Decimal {
        self.canonical
    }

    /// Reads the value in `unit`, rounded half-to-even to two decimal places.
    pub fn convert_to(&self, unit: Q::Unit) -> Decimal {
        Q::from_canonical(self.canonical, unit)
            .round_dp_with_strategy(OUTPUT_SCALE, RoundingStrategy::MidpointNearestEven)
    }

    /// [`Measurement::convert_to`] paired with the unit symbol, e.g. `5.29 °C`.
    pub fn format_in(&self, unit: Q::Unit) -> String {
        format!("{} {}", self.convert_to(unit), Q::symbol(unit))
    }
}

impl<Q: Quantity> Display for Measurement<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_in(Q::CANONICAL_UNIT))
    }
}

impl<Q: Quantity> Serialize for Measurement<Q> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Measurement", 2)?;
        state.serialize_field("value", &self.canonical)?;
        state.serialize_field("unit", Q::symbol(Q::CANONICAL_UNIT))?;
        state.end()
    }
}

fn check_magnitude<Q: Quantity>(value: Decimal) -> Result<(), OwmError> {
    if value.abs() > MAX_MAGNITUDE {
        return Err(invalid::<Q>(value));
    }
    Ok(())
}

fn invalid<Q: Quantity>(value: Decimal) -> OwmError {
    OwmError::InvalidQuantity {
        kind: Q::KIND,
        value: value.to_string(),
    }
}
