use std::fmt;
use std::path::Path;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tokio_util::io::ReaderStream;
use url::Url;

use crate::envelope;
use crate::error::{Result, StraicoError};
use crate::types::{ImageGenerationRequest, PromptCompletionRequest};

/// Default Straico API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.straico.com/v1";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Path prefix given to bases that carry none
const V1_PREFIX: &str = "/v1";

/// Connection settings for a [`StraicoClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key sent as a bearer token
    pub api_key: SecretString,
    /// Base URL for v1 endpoints
    pub base_url: String,
    /// Timeout applied to every request
    pub timeout: Duration,
}

impl ClientConfig {
    /// Settings for the production API with the default timeout
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Request body for a single dispatch
enum Body {
    /// No body (GET)
    Empty,
    /// JSON-encoded value
    Json(Value),
    /// Multipart form (file uploads)
    Multipart(reqwest::multipart::Form),
}

/// Typed client for the Straico API
#[derive(Clone)]
pub struct StraicoClient {
    http: reqwest::Client,
    api_key: SecretString,
    /// Normalized base without trailing slash, e.g. `https://api.straico.com/v1`
    base_url: String,
    /// Scheme, host and port of the base, e.g. `https://api.straico.com`
    ///
    /// Userinfo in the base is not carried over; the API key is the only credential sent.
    origin: String,
    timeout: Duration,
}

impl fmt::Debug for StraicoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StraicoClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl StraicoClient {
    /// Create a client from connection settings
    ///
    /// # Errors
    ///
    /// Returns [`StraicoError::Config`] if the API key or base URL is empty,
    /// or the base URL has no scheme and host
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.api_key.expose_secret().trim().is_empty() {
            return Err(StraicoError::Config("Straico API key is required".to_owned()));
        }

        let (base_url, origin) = normalize_base_url(&config.base_url)?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StraicoError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key: config.api_key,
            base_url,
            origin,
            timeout: config.timeout,
        })
    }

    /// Normalized base URL used for v1 endpoints
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Configured request timeout
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    // -- Models --

    /// List the available chat and image models
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports a failure
    pub async fn list_models(&self) -> Result<Value> {
        self.dispatch(reqwest::Method::GET, "models", Body::Empty).await
    }

    // -- Completions --

    /// Create completions for a prompt across one or more models
    ///
    /// # Errors
    ///
    /// Returns [`StraicoError::Validation`] if no model is given, otherwise an
    /// error if the request fails or the service reports a failure
    pub async fn create_prompt_completion(&self, req: &PromptCompletionRequest) -> Result<Value> {
        req.validate()?;

        self.dispatch(reqwest::Method::POST, "prompt/completion", json_body(req)?).await
    }

    // -- Files --

    /// Upload a local file for use as completion context
    ///
    /// The upload is named `file_name`, or the path's base name when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`StraicoError::Validation`] if the file does not exist or
    /// cannot be read, without contacting the service
    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        file_name: Option<&str>,
    ) -> Result<Value> {
        let path = path.as_ref();

        let metadata = tokio::fs::metadata(path).await.map_err(|_| {
            StraicoError::validation(format!("file not found at path: {}", path.display()))
        })?;
        if !metadata.is_file() {
            return Err(StraicoError::validation(format!(
                "not a regular file at path: {}",
                path.display()
            )));
        }

        let file = tokio::fs::File::open(path).await.map_err(|e| {
            StraicoError::validation(format!(
                "file is not readable at path: {}: {e}",
                path.display()
            ))
        })?;

        let file_name = match file_name {
            Some(name) => name.to_owned(),
            None => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    StraicoError::validation(format!("path has no file name: {}", path.display()))
                })?,
        };

        let mime = mime_guess::from_path(&file_name).first_or_octet_stream();

        let part = reqwest::multipart::Part::stream_with_length(
            reqwest::Body::wrap_stream(ReaderStream::new(file)),
            metadata.len(),
        )
        .file_name(file_name)
        .mime_str(mime.as_ref())
        .map_err(|e| StraicoError::Config(format!("invalid mime type: {e}")))?;

        let form = reqwest::multipart::Form::new().part("file", part);

        let url = format!("{}/v0/file/upload", self.origin);
        self.dispatch(reqwest::Method::POST, &url, Body::Multipart(form)).await
    }

    // -- Image Generation --

    /// Generate images from a text description
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports a failure
    pub async fn create_image_generation(&self, req: &ImageGenerationRequest) -> Result<Value> {
        let url = format!("{}/v0/image/generation", self.origin);
        self.dispatch(reqwest::Method::POST, &url, json_body(req)?).await
    }

    // -- Dispatch --

    /// Send one request and normalize its response
    async fn dispatch(&self, method: reqwest::Method, target: &str, body: Body) -> Result<Value> {
        let url = self.resolve(target);

        tracing::debug!(method = %method, url = %url, "sending Straico API request");

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key.expose_secret()))
            .header(ACCEPT, "application/json");

        builder = match body {
            Body::Empty => builder,
            Body::Json(value) => builder
                .header(CONTENT_TYPE, "application/json")
                .json(&value),
            Body::Multipart(form) => builder.multipart(form),
        };

        let response = builder.send().await.map_err(|e| {
            tracing::error!(method = %method, url = %url, error = %e, "Straico API request failed");
            StraicoError::from(e)
        })?;

        let status = response.status().as_u16();

        let raw = response.text().await.map_err(|source| {
            tracing::error!(
                url = %url,
                status,
                error = %source,
                "failed to read Straico API response body"
            );
            StraicoError::Transport {
                status: Some(status),
                source,
            }
        })?;

        tracing::debug!(url = %url, status, "Straico API request complete");

        envelope::decode(status, &raw)
    }

    /// Resolve a target against the base, leaving absolute URLs untouched
    fn resolve(&self, target: &str) -> String {
        if is_absolute(target) {
            target.to_owned()
        } else {
            format!("{}/{}", self.base_url, target.trim_start_matches('/'))
        }
    }
}

// -- Helper functions --

/// Serialize a request into a JSON body
fn json_body<T: Serialize>(req: &T) -> Result<Body> {
    serde_json::to_value(req)
        .map(Body::Json)
        .map_err(|e| StraicoError::validation(format!("request is not JSON-serializable: {e}")))
}

fn is_absolute(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}

/// Normalize a configured base URL into `(base, origin)`
///
/// Trailing slashes are stripped; a bare host gets the `/v1` prefix. Query
/// strings and fragments are rejected since targets are appended to the path.
fn normalize_base_url(raw: &str) -> Result<(String, String)> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(StraicoError::Config("Straico base URL is required".to_owned()));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| StraicoError::Config(format!("invalid base URL `{trimmed}`: {e}")))?;

    if url.cannot_be_a_base() || url.host_str().is_none_or(str::is_empty) {
        return Err(StraicoError::Config(format!(
            "could not determine base host from `{trimmed}`"
        )));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(StraicoError::Config(format!(
            "base URL `{trimmed}` must not carry a query string or fragment"
        )));
    }

    let origin = url.origin().ascii_serialization();

    let base = if url.path() == "/" {
        format!("{origin}{V1_PREFIX}")
    } else {
        trimmed.to_owned()
    };

    Ok((base, origin))
}
