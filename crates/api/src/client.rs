//! HTTP implementation of [`WorkflowApi`].

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use flowsync_types::WorkflowPayload;
use flowsync_util::http::parse_response_json_strict;
use flowsync_util::summarize_response_body;
use reqwest::{Client, Method, RequestBuilder, StatusCode, header};
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::credentials::{ApiKey, LoginCredentials};
use crate::transport::{ApiSurface, WorkflowApi};
use crate::{ApiError, Endpoints};

/// Header carrying the static API key.
pub const API_KEY_HEADER: &str = "x-n8n-api-key";

/// Timeout for the connectivity probe, catalog listing, and credential lookup.
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for the login exchange and workflow writes.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(30);

const ERROR_BODY_LIMIT: usize = 300;

/// Client for one API surface of a remote instance.
#[derive(Debug, Clone)]
pub struct N8nClient {
    http: Client,
    endpoints: Endpoints,
    surface: ApiSurface,
    user_agent: String,
}

impl N8nClient {
    /// Perform the login exchange and return a cookie-bearing session client.
    ///
    /// Any non-success status is an error; the caller falls back to key auth.
    pub async fn login(endpoints: &Endpoints, credentials: &LoginCredentials) -> Result<Self, ApiError> {
        let http = base_builder().cookie_store(true).build()?;
        let client = Self::from_parts(http, endpoints.clone(), ApiSurface::Session);

        let body = json!({
            "emailOrLdapLoginId": credentials.email,
            "password": credentials.password,
        });
        let response = client
            .request(Method::POST, endpoints.login())
            .json(&body)
            .timeout(WRITE_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: summarize_response_body(&text, ERROR_BODY_LIMIT),
            });
        }
        Ok(client)
    }

    /// Build a client that authenticates every request with `key`.
    ///
    /// No network call is made.
    pub fn with_api_key(endpoints: &Endpoints, key: &ApiKey) -> Result<Self, ApiError> {
        let mut default_headers = header::HeaderMap::new();
        let mut key_value = header::HeaderValue::from_str(key.expose()).map_err(|_| ApiError::InvalidApiKey)?;
        key_value.set_sensitive(true);
        default_headers.insert(API_KEY_HEADER, key_value);

        let http = base_builder().default_headers(default_headers).build()?;
        Ok(Self::from_parts(http, endpoints.clone(), ApiSurface::ApiKey))
    }

    fn from_parts(http: Client, endpoints: Endpoints, surface: ApiSurface) -> Self {
        Self {
            http,
            endpoints,
            surface,
            user_agent: format!("flowsync/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        }
    }

    /// Build a request for an absolute URL with the configured User-Agent.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!(%method, %url, surface = %self.surface, "building request");
        self.http.request(method, url).header(header::USER_AGENT, &self.user_agent)
    }

    fn workflows_url(&self) -> &str {
        match self.surface {
            ApiSurface::Session => self.endpoints.rest_workflows(),
            ApiSurface::ApiKey => self.endpoints.api_workflows(),
        }
    }

    /// Send and require a success status. The body is returned unparsed.
    async fn send_checked(
        &self,
        builder: RequestBuilder,
        timeout: Duration,
    ) -> Result<(StatusCode, String), ApiError> {
        let response = builder.timeout(timeout).send().await?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: summarize_response_body(&text, ERROR_BODY_LIMIT),
            });
        }
        Ok((status, text))
    }

    async fn send_json(&self, builder: RequestBuilder, timeout: Duration) -> Result<Value, ApiError> {
        let (status, text) = self.send_checked(builder, timeout).await?;
        Ok(parse_response_json_strict(&text, Some(status))?)
    }
}

/// Append `id` to a collection URL as a single, percent-encoded path segment.
pub fn item_url(collection: &str, id: &str) -> Result<Url, ApiError> {
    let invalid = || ApiError::InvalidUrl(collection.to_string());
    let mut url = Url::parse(collection).map_err(|_| invalid())?;
    url.path_segments_mut().map_err(|()| invalid())?.pop_if_empty().push(id);
    Ok(url)
}

fn base_builder() -> reqwest::ClientBuilder {
    let mut default_headers = header::HeaderMap::new();
    default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
    Client::builder().default_headers(default_headers)
}

#[async_trait]
impl WorkflowApi for N8nClient {
    fn surface(&self) -> ApiSurface {
        self.surface
    }

    fn base_url(&self) -> &str {
        self.endpoints.base_url()
    }

    async fn probe(&self) -> Result<(), ApiError> {
        let builder = self.request(Method::GET, self.workflows_url());
        self.send_checked(builder, READ_TIMEOUT).await.map(|_| ())
    }

    async fn list_workflows(&self, cursor: Option<&str>) -> Result<Value, ApiError> {
        let mut builder = self.request(Method::GET, self.workflows_url());
        if let Some(cursor) = cursor {
            builder = builder.query(&[("cursor", cursor)]);
        }
        self.send_json(builder, READ_TIMEOUT).await
    }

    async fn create_workflow(&self, payload: &WorkflowPayload) -> Result<Value, ApiError> {
        let builder = self.request(Method::POST, self.workflows_url()).json(payload);
        self.send_json(builder, WRITE_TIMEOUT).await
    }

    async fn update_workflow(&self, id: &str, payload: &WorkflowPayload) -> Result<Value, ApiError> {
        let url = item_url(self.workflows_url(), id)?;
        let builder = self.request(Method::PUT, url.as_str()).json(payload);
        self.send_json(builder, WRITE_TIMEOUT).await
    }

    async fn list_credentials(&self) -> Result<Value, ApiError> {
        let builder = self.request(Method::GET, self.endpoints.credentials());
        self.send_json(builder, READ_TIMEOUT).await
    }
}
