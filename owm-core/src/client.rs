use reqwest::Url;
use std::{fmt, sync::Arc, time::Duration};

use crate::Config;
use crate::error::OwmError;
use crate::request::air_pollution::AirPollutionRequester;
use crate::request::geocoding::GeocodingRequester;
use crate::request::road_risk::RoadRisk;
use crate::request::weather::{CurrentWeather, FiveDayForecast};
use crate::request::{Requester, Stage};
use crate::settings::RequestSettings;
use crate::transport::{HttpTransport, ReqwestTransport};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Entry point: holds the credential, defaults and transport shared by every
/// request, and hands out one requester per endpoint family.
///
/// Cloning is cheap and clones share the transport.
#[derive(Clone)]
pub struct OpenWeatherMapClient {
    api_key: Arc<str>,
    base_url: Url,
    timeout: Duration,
    transport: Arc<dyn HttpTransport>,
}

impl OpenWeatherMapClient {
    /// Client with the default reqwest transport.
    pub fn new(api_key: impl Into<String>) -> Result<Self, OwmError> {
        let transport = ReqwestTransport::new(DEFAULT_CONNECT_TIMEOUT)?;
        Self::with_transport(api_key, Arc::new(transport))
    }

    /// Client sending every request through `transport`.
    pub fn with_transport(
        api_key: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, OwmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(OwmError::invalid_parameter("API key must not be empty"));
        }

        let base_url = Url::parse(DEFAULT_BASE_URL)
            .map_err(|e| OwmError::invalid_parameter(format!("invalid base URL: {e}")))?;

        Ok(Self {
            api_key: Arc::from(api_key.trim()),
            base_url,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            transport,
        })
    }

    /// Points the client at another host, e.g. a proxy or a test server.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, OwmError> {
        let url = Url::parse(base_url)
            .map_err(|e| OwmError::invalid_parameter(format!("invalid base URL '{base_url}': {e}")))?;
        if url.cannot_be_a_base() {
            return Err(OwmError::invalid_parameter(format!(
                "base URL '{base_url}' cannot carry a path"
            )));
        }
        self.base_url = url;
        Ok(self)
    }

    /// Default timeout for every request; a customizer can still override it.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, OwmError> {
        if timeout.is_zero() {
            return Err(OwmError::invalid_parameter("timeout must be greater than zero"));
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn current_weather(&self) -> Requester<CurrentWeather> {
        Requester::new(self.stage(&["data", "2.5", "weather"]))
    }

    pub fn forecast_5day_3hour(&self) -> Requester<FiveDayForecast> {
        Requester::new(self.stage(&["data", "2.5", "forecast"]))
    }

    pub fn air_pollution(&self) -> AirPollutionRequester {
        AirPollutionRequester::new(self.stage(&["data", "2.5", "air_pollution"]))
    }

    pub fn geocoding(&self) -> GeocodingRequester {
        GeocodingRequester::new(self.stage(&["geo", "1.0"]))
    }

    pub fn road_risk(&self) -> Requester<RoadRisk> {
        Requester::new(self.stage(&["data", "2.5", "roadrisk"]))
    }

    fn stage(&self, segments: &[&str]) -> Stage {
        let mut settings = RequestSettings::new(self.base_url.clone(), &self.api_key, self.timeout);
        for segment in segments {
            settings.append_path_segment(*segment);
        }
        Stage::new(Arc::clone(&self.transport), settings)
    }
}

impl fmt::Debug for OpenWeatherMapClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherMapClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

/// Construct a client from the on-disk configuration.
pub fn client_from_config(config: &Config) -> anyhow::Result<OpenWeatherMapClient> {
    let api_key = config.resolved_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
             Hint: run `owm configure` or set the {} environment variable.",
            crate::config::API_KEY_ENV
        )
    })?;

    let mut client = OpenWeatherMapClient::new(api_key)?;
    if let Some(base_url) = config.base_url.as_deref() {
        client = client.with_base_url(base_url)?;
    }
    if let Some(timeout) = config.timeout() {
        client = client.with_timeout(timeout)?;
    }

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{HttpRequest, HttpResponse};
    use async_trait::async_trait;

    #[derive(Debug)]
    struct Unreachable;

    #[async_trait]
    impl HttpTransport for Unreachable {
        fn execute(&self, _: HttpRequest) -> Result<HttpResponse, OwmError> {
            Err(OwmError::Transport("offline".into()))
        }

        async fn execute_async(&self, _: HttpRequest) -> Result<HttpResponse, OwmError> {
            Err(OwmError::Transport("offline".into()))
        }
    }

    fn client() -> OpenWeatherMapClient {
        OpenWeatherMapClient::with_transport("KEY", Arc::new(Unreachable)).unwrap()
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let err = OpenWeatherMapClient::with_transport("  ", Arc::new(Unreachable)).unwrap_err();

        assert!(matches!(err, OwmError::InvalidParameter(_)));
    }

    #[test]
    fn defaults_are_applied() {
        let client = client();

        assert_eq!(client.base_url(), "https://api.openweathermap.org/");
        assert_eq!(client.timeout(), DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = client().with_base_url("not a url").unwrap_err();

        assert!(err.to_string().contains("invalid base URL"));
    }

    #[test]
    fn zero_default_timeout_is_rejected() {
        let err = client().with_timeout(Duration::ZERO).unwrap_err();

        assert!(matches!(err, OwmError::InvalidParameter(_)));
    }

    #[test]
    fn debug_output_hides_the_api_key() {
        assert!(!format!("{:?}", client()).contains("KEY"));
    }

    #[test]
    fn client_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        if std::env::var_os(crate::config::API_KEY_ENV).is_some() {
            return;
        }

        let err = client_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn client_from_config_applies_overrides() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            base_url: Some("http://localhost:9000".into()),
            timeout_secs: Some(3),
            ..Config::default()
        };

        let client = client_from_config(&cfg).unwrap();

        assert_eq!(client.base_url(), "http://localhost:9000/");
        assert_eq!(client.timeout(), Duration::from_secs(3));
    }
}
