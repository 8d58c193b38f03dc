//! Core library for the `owm` OpenWeatherMap client.
//!
//! This crate defines:
//! - Unit-aware measurement values (temperature, speed, distance)
//! - Staged request builders, one family per provider API
//! - Response mapping into typed domain models
//! - A swappable transport boundary and the error taxonomy it maps into
//! - On-disk configuration
//!
//! It is used by `owm-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod measurement;
pub mod model;
pub mod request;
pub mod settings;
pub mod transport;

mod mapper;

pub use client::{OpenWeatherMapClient, client_from_config};
pub use config::Config;
pub use error::OwmError;
pub use measurement::{Measurement, QuantityKind};
pub use model::{Coordinates, Language, UnitSystem};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
