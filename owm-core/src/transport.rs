use async_trait::async_trait;
use std::{collections::BTreeMap, fmt::Debug, thread, time::Duration};

use crate::error::{OwmError, truncate_body};

const USER_AGENT: &str = concat!("owm-core/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Fully-resolved request handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    pub timeout: Duration,
}

/// Raw status and body as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Executes HTTP calls on behalf of the request builders.
///
/// Implementations only report what happened on the wire; translating the
/// status into an [`OwmError`] is done by [`classify`]. Network-level failures
/// should be returned as [`OwmError::Transport`].
#[async_trait]
pub trait HttpTransport: Send + Sync + Debug {
    /// Blocks the calling thread until the response arrives.
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, OwmError>;

    async fn execute_async(&self, request: HttpRequest) -> Result<HttpResponse, OwmError>;
}

/// Maps a provider response onto the error taxonomy, returning the body on success.
pub fn classify(response: HttpResponse) -> Result<String, OwmError> {
    if response.is_success() {
        return Ok(response.body);
    }

    let message = provider_message(&response.body).unwrap_or_else(|| truncate_body(&response.body));
    tracing::warn!(status = response.status, %message, "provider returned an error status");

    match response.status {
        401 => Err(OwmError::Unauthorized(message)),
        404 => Err(OwmError::NotFound(message)),
        status => Err(OwmError::Transport(format!(
            "unexpected status {status}: {message}"
        ))),
    }
}

/// The provider's error bodies look like `{"cod":401,"message":"Invalid API key..."}`.
fn provider_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("message")?.as_str().map(str::to_string)
}

/// Production transport backed by reqwest.
///
/// Async calls share one client. Each synchronous call runs on a short-lived
/// thread of its own with a fresh blocking client, so `execute` works from
/// plain threads and from inside a tokio runtime alike.
#[derive(Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    connect_timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(connect_timeout: Duration) -> Result<Self, OwmError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| OwmError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            connect_timeout,
        })
    }

    /// The blocking client carries its own runtime; it must be built and
    /// dropped off any async worker thread.
    fn send_blocking(&self, request: HttpRequest) -> Result<HttpResponse, OwmError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(|e| OwmError::Transport(format!("failed to build HTTP client: {e}")))?;

        let mut builder = match request.method {
            HttpMethod::Get => client.get(&request.url),
            HttpMethod::Post => client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        builder = builder.timeout(request.timeout);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().map_err(request_failed)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(body_unreadable)?;

        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, OwmError> {
        thread::scope(|scope| {
            let worker = thread::Builder::new()
                .name("owm-blocking-request".into())
                .spawn_scoped(scope, move || self.send_blocking(request))
                .map_err(|e| OwmError::Transport(format!("failed to start request thread: {e}")))?;

            worker
                .join()
                .map_err(|_| OwmError::Transport("request thread panicked".into()))?
        })
    }

    async fn execute_async(&self, request: HttpRequest) -> Result<HttpResponse, OwmError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        builder = builder.timeout(request.timeout);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(request_failed)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(body_unreadable)?;

        Ok(HttpResponse { status, body })
    }
}

fn body_unreadable(e: reqwest::Error) -> OwmError {
    OwmError::Transport(format!("failed to read response body: {}", e.without_url()))
}

fn request_failed(e: reqwest::Error) -> OwmError {
    // reqwest errors print the full URL, which carries the API key.
    let e = e.without_url();
    if e.is_timeout() {
        OwmError::Transport(format!("request timeout: {e}"))
    } else if e.is_connect() {
        OwmError::Transport(format!("connection failed: {e}"))
    } else {
        OwmError::Transport(format!("request failed: {e}"))
    }
}
