//! JSON parse-endpoint resolver.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};
use tvplay_core::{Error, Headers, HttpError, PlayResult, Result};

use crate::task::{Resolution, ResolutionCallback, ResolutionHandle, Resolver};

/// Default timeout for a single parser request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 12; TV) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Prefix some providers put in front of JSON parse endpoints.
const JSON_PREFIX: &str = "json:";

/// A parse endpoint. The media URL is appended to `endpoint`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Parser {
    pub name: String,
    pub endpoint: String,
    #[serde(default, alias = "header")]
    pub headers: Headers,
}

impl Parser {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            headers: Headers::new(),
        }
    }

    /// Request URL for resolving `url` through this parser.
    pub fn request_url(&self, url: &str) -> String {
        let endpoint = self.endpoint.strip_prefix(JSON_PREFIX).unwrap_or(&self.endpoint);
        format!("{endpoint}{url}")
    }
}

/// Resolver settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Parsers tried in order when a result names no endpoint of its own.
    #[serde(default)]
    pub parsers: Vec<Parser>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            parsers: Vec::new(),
        }
    }
}

impl ResolverConfig {
    #[must_use]
    pub fn with_parsers(mut self, parsers: Vec<Parser>) -> Self {
        self.parsers = parsers;
        self
    }

    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Resolves through JSON parse endpoints on a tokio runtime.
#[derive(Clone)]
pub struct HttpResolver {
    http: reqwest::Client,
    runtime: Handle,
    config: Arc<ResolverConfig>,
}

impl HttpResolver {
    /// Create a resolver with default settings spawning onto `runtime`.
    pub fn new(runtime: Handle) -> Result<Self> {
        Self::with_config(runtime, ResolverConfig::default())
    }

    pub fn with_config(runtime: Handle, config: ResolverConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            runtime,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Parsers to try for `result`, in order.
    pub fn candidates(&self, result: &PlayResult, use_alternate: bool) -> Vec<Parser> {
        if use_alternate {
            if let Some(alternate) = &result.alternate {
                return vec![Parser::new(&alternate.name, &alternate.endpoint)];
            }
            debug!("No alternate source on result, using default parsers");
        }
        if !result.play_url.is_empty() {
            return vec![Parser::new("", &result.play_url)];
        }
        self.config.parsers.clone()
    }
}

impl Resolver for HttpResolver {
    fn launch(
        &self,
        result: &PlayResult,
        use_alternate: bool,
        callback: ResolutionCallback,
    ) -> ResolutionHandle {
        let handle = callback.handle();
        let candidates = self.candidates(result, use_alternate);

        if candidates.is_empty() {
            warn!("No parser available for {}", result.url);
            callback.fail();
            return handle;
        }

        let http = self.http.clone();
        let url = result.url.clone();
        let headers = result.headers.clone();

        let task = self.runtime.spawn(async move {
            match resolve(&http, &candidates, &url, &headers).await {
                Some(resolution) => {
                    callback.succeed(resolution.headers, resolution.url, resolution.label);
                }
                None => {
                    callback.fail();
                }
            }
        });
        handle.attach(task);
        handle
    }
}

/// Try each parser in turn; the first usable URL wins.
async fn resolve(
    http: &reqwest::Client,
    parsers: &[Parser],
    url: &str,
    headers: &Headers,
) -> Option<Resolution> {
    for parser in parsers {
        match fetch(http, parser, url, headers).await {
            Ok(resolution) => {
                info!("Resolved {url} via {:?}", parser.name);
                return Some(resolution);
            }
            Err(e) => warn!("Parser {:?} failed for {url}: {e}", parser.name),
        }
    }
    None
}

async fn fetch(
    http: &reqwest::Client,
    parser: &Parser,
    url: &str,
    headers: &Headers,
) -> Result<Resolution> {
    let request_url = parser.request_url(url);
    debug!("Requesting {request_url}");

    let mut request = http.get(&request_url);
    for (key, value) in headers.iter().chain(parser.headers.iter()) {
        request = request.header(key, value);
    }

    let response = request
        .send()
        .await
        .map_err(|e| request_error(&e, &request_url))?;

    let status = response.status();
    if !status.is_success() {
        return Err(HttpError::StatusError {
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or_default().to_string(),
        }
        .into());
    }

    let body = response
        .text()
        .await
        .map_err(|e| request_error(&e, &request_url))?;

    let (url, headers) = parse_response(&body)?;
    Ok(Resolution {
        headers,
        url,
        label: parser.name.clone(),
    })
}

fn request_error(e: &reqwest::Error, request_url: &str) -> Error {
    if e.is_timeout() {
        HttpError::Timeout.into()
    } else if e.is_connect() {
        HttpError::ConnectionFailed(e.to_string()).into()
    } else if e.is_builder() {
        HttpError::InvalidUrl(request_url.to_string()).into()
    } else {
        Error::Network(format!("Parse request failed: {e}"))
    }
}

/// Extract the playable URL and its headers from a parser response.
///
/// Accepts `{"url": .., "header": {..}}`, `headers` as an alias, and the
/// same shape nested under `data`.
pub fn parse_response(body: &str) -> Result<(String, Headers)> {
    let value: Value = serde_json::from_str(body)?;
    let object = match value.get("data") {
        Some(data) if data.get("url").is_some() => data,
        _ => &value,
    };

    let url = object
        .get("url")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    if url.is_empty() {
        return Err(Error::Resolution("Parser returned no URL".to_string()));
    }

    let headers: Headers = object
        .get("header")
        .or_else(|| object.get("headers"))
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .map(|(k, v)| {
                    let v = v.as_str().map_or_else(|| v.to_string(), String::from);
                    (k.clone(), v)
                })
                .collect()
        })
        .unwrap_or_default();

    Ok((url.to_string(), headers))
}
