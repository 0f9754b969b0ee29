//! Network section: proxy, timeouts and TLS material.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};

/// Network settings for the tool under configuration.
///
/// Numeric fields are signed so that out-of-range input survives until the
/// validator reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Intercepting proxy endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
    /// Request timeout in seconds, valid range 1..=300.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    /// Retry attempts, valid range 0..=10.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<i64>,
    /// Whether server certificates are verified. Absent means `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_ssl: Option<bool>,
    /// User agent sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Custom TLS material.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl: Option<SslConfig>,
}

impl NetworkConfig {
    /// Effective certificate verification flag.
    #[must_use]
    pub fn verifies_ssl(&self) -> bool {
        self.verify_ssl.unwrap_or(true)
    }

    /// Replaces the proxy subtree.
    #[must_use]
    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Replaces the TLS subtree.
    #[must_use]
    pub fn with_ssl(mut self, ssl: SslConfig) -> Self {
        self.ssl = Some(ssl);
        self
    }

    /// Sets the timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: i64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Sets the retry count.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: i64) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Sets certificate verification.
    #[must_use]
    pub const fn with_verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = Some(verify);
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// Proxy endpoints, one per request scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy used for plain HTTP traffic (e.g. `http://127.0.0.1:8080`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<String>,
    /// Proxy used for HTTPS traffic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub https: Option<String>,
}

impl ProxyConfig {
    /// Routes both schemes through the same proxy URL.
    #[must_use]
    pub fn both(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            http: Some(url.clone()),
            https: Some(url),
        }
    }

    /// Check whether at least one endpoint is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        [&self.http, &self.https]
            .into_iter()
            .any(|url| url.as_deref().is_some_and(|u| !u.is_empty()))
    }

    /// Parses every configured endpoint, http first.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUrl`] when a configured URL does not
    /// parse and [`DomainError::MissingHost`] when it has no host.
    pub fn endpoints(&self) -> DomainResult<Vec<ProxyEndpoint>> {
        [(ProxyScheme::Http, &self.http), (ProxyScheme::Https, &self.https)]
            .into_iter()
            .filter_map(|(scheme, url)| {
                url.as_deref()
                    .filter(|u| !u.trim().is_empty())
                    .map(|u| ProxyEndpoint::parse(scheme, u))
            })
            .collect()
    }
}

/// Which traffic a proxy endpoint carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyScheme {
    /// Plain HTTP traffic.
    Http,
    /// HTTPS traffic.
    Https,
}

impl ProxyScheme {
    /// Key used in the document.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// A parsed proxy endpoint, ready for a reachability probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEndpoint {
    /// Traffic carried by this proxy.
    pub scheme: ProxyScheme,
    /// Parsed proxy URL.
    pub url: Url,
    /// Proxy host.
    pub host: String,
    /// Proxy port; scheme default when the URL omits it.
    pub port: u16,
}

/// Port assumed for proxy schemes without a well-known default (e.g. socks5).
const FALLBACK_PROXY_PORT: u16 = 8080;

impl ProxyEndpoint {
    fn parse(scheme: ProxyScheme, raw: &str) -> DomainResult<Self> {
        let url = Url::parse(raw.trim()).map_err(|e| DomainError::InvalidUrl(format!("{raw}: {e}")))?;
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| DomainError::MissingHost(raw.to_string()))?
            .to_string();
        let port = url.port_or_known_default().unwrap_or(FALLBACK_PROXY_PORT);
        Ok(Self {
            scheme,
            url,
            host,
            port,
        })
    }

    /// `host:port` pair suitable for a socket connect.
    #[must_use]
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Custom TLS material paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SslConfig {
    /// CA bundle used to verify the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_bundle: Option<String>,
    /// Client certificate for mTLS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_path: Option<String>,
    /// Private key for the client certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_path: Option<String>,
}
