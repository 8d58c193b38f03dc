//! Per-request accumulator threaded through the builder stages.

use reqwest::Url;
use std::{collections::BTreeMap, fmt, time::Duration};

use crate::error::OwmError;
use crate::model::{Language, UnitSystem};
use crate::transport::{HttpMethod, HttpRequest};

type Serializer = Box<dyn FnOnce() -> Result<String, OwmError> + Send>;

/// Request body together with the strategy that turns it into text.
struct Payload {
    serialize: Serializer,
}

/// Path, query, payload and timeout for one request.
///
/// Created by the client for each request and moved from stage to stage; the
/// terminator consumes it with [`RequestSettings::into_request`].
pub struct RequestSettings {
    base_url: Url,
    path: Vec<String>,
    query: BTreeMap<String, String>,
    payload: Option<Payload>,
    timeout: Duration,
    unit_system: UnitSystem,
}

impl RequestSettings {
    pub fn new(base_url: Url, api_key: &str, timeout: Duration) -> Self {
        let mut settings = Self {
            base_url,
            path: Vec::new(),
            query: BTreeMap::new(),
            payload: None,
            timeout,
            unit_system: UnitSystem::default(),
        };
        settings.set_query_parameter("appid", api_key);
        settings
    }

    pub fn append_path_segment(&mut self, segment: impl Into<String>) {
        self.path.push(segment.into());
    }

    /// Later writes to the same key replace earlier ones.
    pub fn set_query_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.insert(key.into(), value.into());
    }

    /// Replaces any previous payload; the request becomes a POST.
    pub fn set_payload<T>(&mut self, payload: T, serializer: fn(&T) -> Result<String, OwmError>)
    where
        T: Send + 'static,
    {
        self.payload = Some(Payload {
            serialize: Box::new(move || serializer(&payload)),
        });
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn set_unit_system(&mut self, unit_system: UnitSystem) {
        self.unit_system = unit_system;
        self.set_query_parameter("units", unit_system.as_str());
    }

    pub fn set_language(&mut self, language: Language) {
        self.set_query_parameter("lang", language.code());
    }

    /// Unit system the response values will be expressed in.
    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }

    pub fn query_parameter(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Path without base URL or query, for logging.
    pub fn path(&self) -> String {
        self.path.join("/")
    }

    /// Resolves URL, query string and body into the request handed to the transport.
    pub fn into_request(self) -> Result<HttpRequest, OwmError> {
        let mut url = self.base_url;
        if url.cannot_be_a_base() {
            return Err(OwmError::invalid_parameter(format!(
                "base URL '{url}' cannot carry a path"
            )));
        }
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(&self.path);
        }
        url.query_pairs_mut().extend_pairs(&self.query);

        let mut headers = BTreeMap::new();
        headers.insert("accept".to_string(), "application/json".to_string());

        let (method, body) = match self.payload {
            Some(payload) => {
                headers.insert("content-type".to_string(), "application/json".to_string());
                (HttpMethod::Post, Some((payload.serialize)()?))
            }
            None => (HttpMethod::Get, None),
        };

        Ok(HttpRequest {
            method,
            url: url.into(),
            headers,
            body,
            timeout: self.timeout,
        })
    }
}

impl fmt::Debug for RequestSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSettings")
            .field("base_url", &self.base_url.as_str())
            .field("path", &self.path)
            .field("query_keys", &self.query.keys().collect::<Vec<_>>())
            .field("has_payload", &self.payload.is_some())
            .field("timeout", &self.timeout)
            .field("unit_system", &self.unit_system)
            .finish()
    }
}
