use std::time::Duration;

use regbridge_domain::constants::DEFAULT_REQUEST_TIMEOUT_SECS;
use regbridge_domain::RegBridgeError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::InfraError;

/// HTTP client with a request timeout and no retries.
///
/// Every failure is handed back to the caller unchanged; a slow vendor
/// endpoint simply makes the enclosing request slow.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, RegBridgeError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder once.
    ///
    /// Only connectivity failures are errors here; any HTTP status is returned
    /// as a response.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, RegBridgeError> {
        let request = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            RegBridgeError::from(infra)
        })?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, url = %url.path(), "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, url = %url.path(), status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, url = %url.path(), error = %err, "HTTP request failed");
                let infra: InfraError = err.into();
                Err(RegBridgeError::from(infra))
            }
        }
    }

    /// Send and decode a JSON body, mapping non-2xx answers to
    /// [`RegBridgeError::Remote`] with the vendor body attached.
    pub async fn send_json<T>(&self, builder: RequestBuilder) -> Result<T, RegBridgeError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(builder).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.ok().filter(|b| !b.is_empty());
            return Err(RegBridgeError::remote(status.as_u16(), body));
        }

        let bytes = response.bytes().await.map_err(|err| {
            let infra: InfraError = err.into();
            RegBridgeError::from(infra)
        })?;

        // Some registrant endpoints answer 2xx with an empty body.
        let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };

        serde_json::from_slice(body).map_err(|err| {
            let infra: InfraError = err.into();
            RegBridgeError::from(infra)
        })
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
    bypass_proxy: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: Some(concat!("regbridge/", env!("CARGO_PKG_VERSION")).to_string()),
            default_headers: None,
            bypass_proxy: false,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Ignore `HTTP_PROXY`/`HTTPS_PROXY` and connect directly.
    pub fn no_proxy(mut self) -> Self {
        self.bypass_proxy = true;
        self
    }

    pub fn build(self) -> Result<HttpClient, RegBridgeError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout);

        if self.bypass_proxy {
            builder = builder.no_proxy();
        }

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            RegBridgeError::from(infra)
        })?;

        Ok(HttpClient { client })
    }
}
