//! Staged request builders.
//!
//! A request goes through three stages, each a distinct type:
//!
//! 1. [`Requester`]: pick the target with exactly one locator
//!    (`by_city_name`, `by_coordinates`, ...).
//! 2. [`Customizer`]: set optional modifiers in any order.
//! 3. [`Terminator`] / [`AsyncTerminator`]: execute once and map the response.
//!
//! Every transition consumes the previous stage, so a request cannot be sent
//! before it has a target, cannot be modified after it was sent, and cannot be
//! sent twice. Which modifiers exist depends on the endpoint family through the
//! [`AcceptsUnits`] and [`AcceptsLanguage`] marker traits.
//!
//! ```no_run
//! # fn main() -> Result<(), owm_core::OwmError> {
//! use owm_core::{OpenWeatherMapClient, UnitSystem};
//! use owm_core::measurement::TemperatureUnit;
//!
//! let client = OpenWeatherMapClient::new("API_KEY")?;
//! let weather = client
//!     .current_weather()
//!     .by_city_name("Minsk")?
//!     .unit_system(UnitSystem::Metric)
//!     .retrieve()
//!     .as_model()?;
//! println!("{}", weather.temperature.value.format_in(TemperatureUnit::Celsius));
//! # Ok(())
//! # }
//! ```

use std::{marker::PhantomData, sync::Arc, time::Duration};

use crate::error::OwmError;
use crate::model::{Language, UnitSystem};
use crate::settings::RequestSettings;
use crate::transport::{HttpTransport, classify};

pub mod air_pollution;
pub mod geocoding;
pub mod place;
pub mod road_risk;
pub mod weather;

/// Per-family configuration: what the response maps to.
pub trait Endpoint: Send + 'static {
    type Output: Send + 'static;

    /// Maps a successful response body. `units` is the unit system the
    /// response values are expressed in.
    fn map(body: &str, units: UnitSystem) -> Result<Self::Output, OwmError>;
}

/// Families whose responses honour the `units` parameter.
pub trait AcceptsUnits: Endpoint {}

/// Families whose responses honour the `lang` parameter.
pub trait AcceptsLanguage: Endpoint {}

/// Transport handle plus the settings of the request being built.
pub(crate) struct Stage {
    transport: Arc<dyn HttpTransport>,
    settings: RequestSettings,
}

impl Stage {
    pub(crate) fn new(transport: Arc<dyn HttpTransport>, settings: RequestSettings) -> Self {
        Self { transport, settings }
    }

    pub(crate) fn settings_mut(&mut self) -> &mut RequestSettings {
        &mut self.settings
    }

    fn execute(self) -> Result<(UnitSystem, String), OwmError> {
        let units = self.settings.unit_system();
        let path = self.settings.path();
        let request = self.settings.into_request()?;

        tracing::debug!(method = request.method.as_str(), %path, "sending request");
        let response = self.transport.execute(request)?;
        Ok((units, classify(response)?))
    }

    async fn execute_async(self) -> Result<(UnitSystem, String), OwmError> {
        let units = self.settings.unit_system();
        let path = self.settings.path();
        let request = self.settings.into_request()?;

        tracing::debug!(method = request.method.as_str(), %path, "sending async request");
        let response = self.transport.execute_async(request).await?;
        Ok((units, classify(response)?))
    }
}

/// Target-selection stage. Locators live in the family modules.
#[must_use = "a requester does nothing until a locator is called"]
pub struct Requester<E> {
    stage: Stage,
    endpoint: PhantomData<fn() -> E>,
}

impl<E: Endpoint> Requester<E> {
    pub(crate) fn new(stage: Stage) -> Self {
        Self {
            stage,
            endpoint: PhantomData,
        }
    }

    /// Writes the mandatory parameters and moves on to the modifier stage.
    pub(crate) fn locate(mut self, write: impl FnOnce(&mut RequestSettings)) -> Customizer<E> {
        write(self.stage.settings_mut());
        Customizer {
            stage: self.stage,
            endpoint: PhantomData,
        }
    }
}

/// Modification stage: optional parameters, then one of the two terminals.
#[must_use = "a request is only sent by `retrieve` or `retrieve_async`"]
pub struct Customizer<E> {
    stage: Stage,
    endpoint: PhantomData<fn() -> E>,
}

impl<E: Endpoint> Customizer<E> {
    /// Overrides the client's default request timeout. Zero is rejected.
    pub fn timeout(mut self, timeout: Duration) -> Result<Self, OwmError> {
        if timeout.is_zero() {
            return Err(OwmError::invalid_parameter("timeout must be greater than zero"));
        }
        self.stage.settings_mut().set_timeout(timeout);
        Ok(self)
    }

    pub(crate) fn set(mut self, write: impl FnOnce(&mut RequestSettings)) -> Self {
        write(self.stage.settings_mut());
        self
    }

    /// Synchronous terminal. Blocks the calling thread in [`Terminator::as_model`].
    pub fn retrieve(self) -> Terminator<E> {
        Terminator {
            stage: self.stage,
            endpoint: PhantomData,
        }
    }

    /// Non-blocking terminal.
    pub fn retrieve_async(self) -> AsyncTerminator<E> {
        AsyncTerminator {
            stage: self.stage,
            endpoint: PhantomData,
        }
    }
}

impl<E: AcceptsUnits> Customizer<E> {
    pub fn unit_system(self, unit_system: UnitSystem) -> Self {
        self.set(|s| s.set_unit_system(unit_system))
    }
}

impl<E: AcceptsLanguage> Customizer<E> {
    pub fn language(self, language: Language) -> Self {
        self.set(|s| s.set_language(language))
    }
}

/// Synchronous terminal stage.
#[must_use = "the request is sent by `as_model` or `as_json`"]
pub struct Terminator<E> {
    stage: Stage,
    endpoint: PhantomData<fn() -> E>,
}

impl<E: Endpoint> Terminator<E> {
    /// Sends the request and maps the response into the family's model.
    pub fn as_model(self) -> Result<E::Output, OwmError> {
        let (units, body) = self.stage.execute()?;
        E::map(&body, units)
    }

    /// Sends the request and returns the provider's JSON untouched.
    pub fn as_json(self) -> Result<String, OwmError> {
        self.stage.execute().map(|(_, body)| body)
    }
}

/// Asynchronous terminal stage.
#[must_use = "the request is sent by `as_model` or `as_json`"]
pub struct AsyncTerminator<E> {
    stage: Stage,
    endpoint: PhantomData<fn() -> E>,
}

impl<E: Endpoint> AsyncTerminator<E> {
    pub async fn as_model(self) -> Result<E::Output, OwmError> {
        let (units, body) = self.stage.execute_async().await?;
        E::map(&body, units)
    }

    pub async fn as_json(self) -> Result<String, OwmError> {
        self.stage.execute_async().await.map(|(_, body)| body)
    }
}

/// Trimmed, non-empty text argument.
pub(crate) fn require_text<'a>(what: &str, value: &'a str) -> Result<&'a str, OwmError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(OwmError::invalid_parameter(format!("{what} must not be empty")));
    }
    Ok(trimmed)
}

/// ISO 3166 alpha-2 country code, upper-cased.
pub(crate) fn country_code(value: &str) -> Result<String, OwmError> {
    let trimmed = value.trim();
    if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(OwmError::invalid_parameter(format!(
            "country code must be two letters (ISO 3166), got '{value}'"
        )));
    }
    Ok(trimmed.to_ascii_uppercase())
}
