// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client implementation

use std::sync::Arc;
use std::time::{Duration, Instant};

use base64::Engine;
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::Client;
use url::Url;

use super::cookie::{Cookie, CookieJar};
use super::request::Request;
use super::response::Response;
use super::{headers, quote, DEFAULT_USER_AGENT};
use crate::error::{Error, Result};

/// Name of the cookie the router reads credentials from
pub const AUTH_COOKIE: &str = "Authorization";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User agent string
    pub user_agent: String,
    /// Default timeout
    pub timeout: Duration,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Default headers
    pub default_headers: HeaderMap,
    /// Enable cookie handling
    pub handle_cookies: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            headers::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,*/*;q=0.8"),
        );

        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            max_redirects: 10,
            default_headers,
            handle_cookies: true,
        }
    }
}

/// HTTP client with cookie management
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    cookie_jar: CookieJar,
    /// Referer attached to every request once set
    referer: Arc<RwLock<Option<String>>>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(Policy::limited(config.max_redirects))
            .default_headers(config.default_headers.clone())
            .cookie_store(false) // We handle cookies ourselves
            .build()?;

        Ok(Self {
            client,
            config,
            cookie_jar: CookieJar::new(),
            referer: Arc::new(RwLock::new(None)),
        })
    }

    /// Get the cookie jar
    pub fn cookie_jar(&self) -> &CookieJar {
        &self.cookie_jar
    }

    /// Store Basic credentials as a cookie for `url`'s host.
    ///
    /// The value is `Basic base64(user:password)`, percent-quoted, with
    /// path `/`. Nothing is sent until the next request.
    pub fn set_cookie_auth(&self, url: &Url, user: &str, password: &str) -> Result<()> {
        let host = url
            .host_str()
            .ok_or_else(|| Error::auth(format!("{} has no host", url)))?;

        let cookie = Cookie::new(AUTH_COOKIE, basic_auth_cookie_value(user, password))
            .domain(host)
            .path("/");
        self.cookie_jar.add(cookie);
        Ok(())
    }

    /// Drop stored credentials
    pub fn clear_auth(&self) {
        self.cookie_jar.remove_named(AUTH_COOKIE);
    }

    /// Send `referer` with every following request
    pub fn set_referer(&self, referer: impl Into<String>) {
        *self.referer.write() = Some(referer.into());
    }

    /// Execute a GET request
    pub async fn get(&self, url: impl AsRef<str>) -> Result<Response> {
        self.execute(Request::get(url)?).await
    }

    /// Execute a request
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let start = Instant::now();

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());

        // Per-request referer wins over the session one
        if !request.headers.contains_key(headers::REFERER) {
            if let Some(ref referer) = *self.referer.read() {
                builder = builder.header(headers::REFERER, referer.as_str());
            }
        }

        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }

        if self.config.handle_cookies {
            if let Some(cookie_header) = self.cookie_jar.get_cookie_header(&request.url) {
                builder = builder.header(headers::COOKIE, cookie_header);
            }
        }

        tracing::debug!(method = %request.method, url = %request.url, "Sending request");

        let response = builder.send().await?;
        let final_url = response.url().clone();
        let status = response.status();
        let response_headers = response.headers().clone();

        if self.config.handle_cookies {
            for cookie in response_headers.get_all(headers::SET_COOKIE) {
                if let Ok(cookie_str) = cookie.to_str() {
                    self.cookie_jar.add_from_header(cookie_str, &final_url);
                }
            }
        }

        let body = response.bytes().await?;
        let response_time = start.elapsed().as_millis() as u64;

        tracing::debug!(
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = response_time,
            "Received response"
        );

        Ok(Response::new(
            status,
            response_headers,
            body,
            final_url,
            response_time,
        ))
    }

    /// Get client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

/// Cookie value carrying Basic credentials: `quote("Basic " + base64(user:password))`
pub fn basic_auth_cookie_value(user: &str, password: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", user, password));
    quote(&format!("Basic {}", encoded))
}
