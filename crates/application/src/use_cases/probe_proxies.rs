//! Probe proxies use case

use std::time::Duration;

use tracing::{info, warn};
use wexcfg_domain::{NetworkConfig, ProxyEndpoint};

use crate::error::ApplicationResult;
use crate::ports::{ProbeOutcome, ProxyProbe};

/// Default time allowed for each probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of probing one configured endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// The probed endpoint.
    pub endpoint: ProxyEndpoint,
    /// What happened.
    pub outcome: ProbeOutcome,
}

/// Checks every configured proxy endpoint for reachability.
///
/// The document is only read; probe results never change it.
pub struct ProbeProxies<P> {
    probe: P,
    timeout: Duration,
}

impl<P: ProxyProbe> ProbeProxies<P> {
    /// Creates a new `ProbeProxies` use case with the default timeout.
    pub const fn new(probe: P) -> Self {
        Self {
            probe,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Sets the per-endpoint timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Executes the use case.
    ///
    /// Returns one report per configured endpoint, `http` first. No proxy
    /// yields an empty list.
    ///
    /// # Errors
    /// Returns an error if a configured proxy URL cannot be parsed.
    pub async fn execute(&self, network: &NetworkConfig) -> ApplicationResult<Vec<ProbeReport>> {
        let Some(proxy) = network.proxy.as_ref() else {
            return Ok(Vec::new());
        };

        let mut reports = Vec::new();
        for endpoint in proxy.endpoints()? {
            let outcome = self.probe.probe(&endpoint, self.timeout).await;
            match &outcome {
                ProbeOutcome::Reachable { latency } => {
                    info!(proxy = %endpoint.authority(), ?latency, "proxy reachable");
                }
                ProbeOutcome::Unreachable { reason } => {
                    warn!(proxy = %endpoint.authority(), %reason, "proxy unreachable");
                }
            }
            reports.push(ProbeReport { endpoint, outcome });
        }
        Ok(reports)
    }
}
