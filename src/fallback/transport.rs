//! HTTP exchange against a single candidate.
//!
//! # Responsibilities
//! - Build the target URL from a candidate base and the request path
//! - Apply headers, body and content type
//! - Bound the connect wait and every read wait
//! - Map every failure to a [`TransportError`]
//!
//! # Design Decisions
//! - Any status code counts as a completed exchange; interpreting it is
//!   the caller's job
//! - No idle connections are kept; each attempt opens a fresh connection
//! - The read timeout is an inactivity bound, not a total deadline: a
//!   response that keeps producing bytes may take as long as it needs

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use url::Url;

use crate::config::TimeoutConfig;
use crate::fallback::error::TransportError;
use crate::fallback::request::{join_url, Exchange, RequestDescriptor};

/// Performs one HTTP round-trip with bounded waits.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl HttpTransport {
    /// Create a transport with explicit connect and per-read timeouts.
    pub fn new(connect_timeout: Duration, read_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .read_timeout(read_timeout)
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self {
            client,
            connect_timeout,
            read_timeout,
        })
    }

    /// Create a transport from the timeout section of the configuration.
    pub fn from_config(config: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            Duration::from_secs(config.connect_secs),
            Duration::from_secs(config.read_secs),
        )
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Send `request` to `base` and read the full response body.
    pub async fn exchange(
        &self,
        base: &str,
        request: &RequestDescriptor,
    ) -> Result<Exchange, TransportError> {
        let target = join_url(base, request.path());
        let url = Url::parse(&target).map_err(|source| TransportError::InvalidUrl {
            url: target.clone(),
            source,
        })?;
        let method = Method::from_bytes(request.method().as_bytes())
            .map_err(|_| TransportError::InvalidMethod(request.method().to_string()))?;
        let headers = build_headers(request)?;

        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(body) = request.body() {
            builder = builder.body(body.to_vec());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&target, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(&target, e))?;

        Ok(Exchange { status, body })
    }
}

/// Content type first, so an explicit header with the same name wins.
fn build_headers(request: &RequestDescriptor) -> Result<HeaderMap, TransportError> {
    let mut headers = HeaderMap::new();

    if request.body().is_some() {
        if let Some(content_type) = request.content_type() {
            let value = HeaderValue::from_str(content_type).map_err(|_| {
                TransportError::InvalidHeader {
                    name: CONTENT_TYPE.to_string(),
                }
            })?;
            headers.insert(CONTENT_TYPE, value);
        }
    }

    for (name, value) in request.headers() {
        let invalid = || TransportError::InvalidHeader { name: name.clone() };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}
