//! Proxy reachability port.
//!
//! Probing is I/O-bound and non-deterministic, so it lives behind a port and
//! never feeds back into the document.

use std::time::Duration;

use async_trait::async_trait;
use wexcfg_domain::ProxyEndpoint;

/// Result of probing one proxy endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The endpoint accepted a connection.
    Reachable {
        /// Time to establish the connection.
        latency: Duration,
    },
    /// The endpoint could not be reached.
    Unreachable {
        /// Human-readable failure reason.
        reason: String,
    },
}

impl ProbeOutcome {
    /// Check whether the endpoint was reachable.
    #[must_use]
    pub const fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable { .. })
    }
}

/// Port for checking whether a proxy endpoint accepts connections.
#[async_trait]
pub trait ProxyProbe: Send + Sync {
    /// Probes `endpoint`, giving up after `timeout`.
    async fn probe(&self, endpoint: &ProxyEndpoint, timeout: Duration) -> ProbeOutcome;
}
