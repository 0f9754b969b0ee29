//! TCP connect probe for proxy endpoints.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::debug;
use wexcfg_application::ports::{ProbeOutcome, ProxyProbe};
use wexcfg_domain::ProxyEndpoint;

/// Probes a proxy by opening and immediately closing a TCP connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProxyProbe;

impl TcpProxyProbe {
    /// Creates a new probe.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProxyProbe for TcpProxyProbe {
    async fn probe(&self, endpoint: &ProxyEndpoint, timeout: Duration) -> ProbeOutcome {
        let authority = endpoint.authority();
        debug!(proxy = %authority, ?timeout, "probing proxy");

        let started = Instant::now();
        match tokio::time::timeout(timeout, TcpStream::connect(authority.as_str())).await {
            Ok(Ok(_stream)) => ProbeOutcome::Reachable {
                latency: started.elapsed(),
            },
            Ok(Err(e)) => ProbeOutcome::Unreachable {
                reason: e.to_string(),
            },
            Err(_) => ProbeOutcome::Unreachable {
                reason: format!("timed out after {}ms", timeout.as_millis()),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;
    use wexcfg_domain::ProxyConfig;

    fn endpoint(port: u16) -> ProxyEndpoint {
        ProxyConfig::both(format!("http://127.0.0.1:{port}"))
            .endpoints()
            .unwrap()
            .remove(0)
    }

    #[tokio::test]
    async fn test_listening_proxy_is_reachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let outcome = TcpProxyProbe::new()
            .probe(&endpoint(port), Duration::from_secs(2))
            .await;

        assert!(outcome.is_reachable(), "unexpected outcome: {outcome:?}");
    }

    #[tokio::test]
    async fn test_closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let outcome = TcpProxyProbe::new()
            .probe(&endpoint(port), Duration::from_secs(2))
            .await;

        assert!(matches!(outcome, ProbeOutcome::Unreachable { .. }));
    }
}
