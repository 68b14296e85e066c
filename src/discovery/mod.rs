// Device discovery seam
//
// The negotiator drives discovery through the DiscoveryService trait; the
// transport behind it (mDNS here, cloud relay elsewhere) is a deployment
// choice. Candidates are owned by the service and handed out as shared
// references for the duration of one attempt.

pub mod mdns;

pub use mdns::{MdnsDiscovery, SERVICE_TYPE};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::dialog::DialogResult;

/// How long one discovery attempt may run. The flow never overrides this;
/// `DiscoveryRequest::with_timeout` exists for tests and tuning.
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(20);

/// A discoverable device, as seen by the dialogue layer.
pub trait DeviceCandidate: Send + Sync {
    /// Display name used in prompts and choice lists.
    fn name(&self) -> &str;

    /// Whether this candidate matches a discovery-kind filter.
    fn has_kind(&self, kind: &str) -> bool;
}

/// What a completed (non-failed) discovery call produced.
pub enum DiscoveryOutcome {
    /// The attempt was short-circuited by something other than success,
    /// failure, or cancellation (for example a supervising dialogue loop
    /// took over). Terminal and deliberately silent.
    Superseded,

    /// The candidates found, possibly none.
    Matches(Vec<Arc<dyn DeviceCandidate>>),
}

/// One discovery attempt's parameters. Created per invocation, discarded
/// when the flow completes.
#[derive(Debug, Clone)]
pub struct DiscoveryRequest {
    pub timeout: Duration,
    /// Backend selector forwarded to the service (for example an advertised
    /// protocol family). None browses everything.
    pub discovery_type: Option<String>,
    /// Post-service filter: keep only candidates with this kind.
    pub kind: Option<String>,
    /// Human-readable target name, interpolated into prompts when present.
    pub name: Option<String>,
}

impl DiscoveryRequest {
    pub fn new() -> Self {
        Self {
            timeout: DISCOVERY_TIMEOUT,
            discovery_type: None,
            kind: None,
            name: None,
        }
    }

    pub fn with_discovery_type(mut self, discovery_type: impl Into<String>) -> Self {
        self.discovery_type = Some(discovery_type.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for DiscoveryRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Time-bounded device search. Both operations are suspension points.
#[async_trait]
pub trait DiscoveryService: Send + Sync {
    /// Run one bounded search. The service enforces the bound itself and
    /// returns a single outcome once it elapses; cancellation and failure
    /// travel as `DialogError`.
    async fn run_discovery(
        &self,
        timeout: Duration,
        discovery_type: Option<&str>,
    ) -> DialogResult<DiscoveryOutcome>;

    /// Best-effort cleanup after a failed search. Failures here are
    /// non-fatal to the flow.
    async fn stop_discovery(&self) -> DialogResult<()>;
}
