// mDNS discovery backend
//
// Devices waiting to be set up advertise _wren-setup._tcp with TXT records
// describing themselves. One bounded browse collects and deduplicates
// whatever resolves before the deadline. A cancellation token aborts the
// browse early and surfaces as DialogError::Cancelled.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use mdns_sd::{ServiceDaemon, ServiceEvent, ServiceInfo};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::dialog::{DialogError, DialogResult};
use crate::discovery::{DeviceCandidate, DiscoveryOutcome, DiscoveryService};

/// Service type devices advertise while they wait to be set up.
pub const SERVICE_TYPE: &str = "_wren-setup._tcp.local.";

/// One advertised device, parsed from its resolved service info.
pub struct MdnsDevice {
    name: String,
    kinds: Vec<String>,
    discovery_type: Option<String>,
}

impl MdnsDevice {
    /// TXT records carry the presentation name ("name"), the
    /// comma-separated kind list ("kinds") and the protocol family
    /// ("type"). The instance name fills in for a missing name record.
    fn from_service(info: &ServiceInfo) -> Self {
        let instance = info
            .get_fullname()
            .split('.')
            .next()
            .unwrap_or(info.get_fullname())
            .to_string();
        let name = info
            .get_property_val_str("name")
            .map(str::to_string)
            .unwrap_or(instance);
        let kinds = info
            .get_property_val_str("kinds")
            .map(parse_kinds)
            .unwrap_or_default();
        let discovery_type = info.get_property_val_str("type").map(str::to_string);
        Self {
            name,
            kinds,
            discovery_type,
        }
    }

    fn matches_discovery_type(&self, requested: Option<&str>) -> bool {
        match requested {
            None => true,
            Some(requested) => self.discovery_type.as_deref() == Some(requested),
        }
    }
}

impl DeviceCandidate for MdnsDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_kind(&self, kind: &str) -> bool {
        self.kinds.iter().any(|k| k == kind)
    }
}

fn parse_kinds(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|kind| !kind.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct MdnsDiscovery {
    daemon: ServiceDaemon,
    cancel: CancellationToken,
}

impl MdnsDiscovery {
    pub fn new() -> Result<Self> {
        let daemon = ServiceDaemon::new().context("failed to create mDNS daemon")?;
        Ok(Self {
            daemon,
            cancel: CancellationToken::new(),
        })
    }

    /// Token that aborts an in-flight browse. Cancel it from a signal
    /// handler or a competing flow.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Tear the daemon down once no more browses are coming.
    pub fn shutdown(&self) -> Result<()> {
        self.daemon
            .shutdown()
            .context("failed to shut down mDNS daemon")?;
        Ok(())
    }

    /// Best-effort teardown of the active browse.
    fn finish_browse(&self) {
        if let Err(err) = self.daemon.stop_browse(SERVICE_TYPE) {
            debug!(error = %err, "stopping finished browse failed");
        }
    }
}

#[async_trait]
impl DiscoveryService for MdnsDiscovery {
    async fn run_discovery(
        &self,
        timeout: Duration,
        discovery_type: Option<&str>,
    ) -> DialogResult<DiscoveryOutcome> {
        let receiver = self
            .daemon
            .browse(SERVICE_TYPE)
            .context("failed to start mDNS browse")?;

        let deadline = Instant::now() + timeout;
        let mut devices: Vec<Arc<dyn DeviceCandidate>> = Vec::new();
        let mut seen = HashSet::new();

        info!(service = SERVICE_TYPE, timeout_secs = timeout.as_secs(), "browsing for devices");
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            let event = tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!("browse cancelled");
                    self.finish_browse();
                    return Err(DialogError::Cancelled);
                }
                event = tokio::time::timeout(remaining, receiver.recv_async()) => event,
            };
            let event = match event {
                Ok(Ok(event)) => event,
                // Deadline hit with no event in flight.
                Err(_) => break,
                Ok(Err(err)) => {
                    warn!(error = %err, "mDNS event channel closed early");
                    break;
                }
            };
            match event {
                ServiceEvent::ServiceResolved(service) => {
                    if !seen.insert(service.get_fullname().to_string()) {
                        continue;
                    }
                    let device = MdnsDevice::from_service(&service);
                    if !device.matches_discovery_type(discovery_type) {
                        debug!(
                            device = device.name(),
                            "skipping device of another protocol family"
                        );
                        continue;
                    }
                    debug!(device = device.name(), "device resolved");
                    devices.push(Arc::new(device));
                }
                ServiceEvent::SearchStopped(ty) if ty == SERVICE_TYPE => break,
                _ => {}
            }
        }

        self.finish_browse();
        info!(matches = devices.len(), "browse finished");
        Ok(DiscoveryOutcome::Matches(devices))
    }

    async fn stop_discovery(&self) -> DialogResult<()> {
        self.daemon
            .stop_browse(SERVICE_TYPE)
            .context("failed to stop mDNS browse")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolved(instance: &str, txt: &[(&str, &str)]) -> ServiceInfo {
        let properties: HashMap<String, String> = txt
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServiceInfo::new(
            SERVICE_TYPE,
            instance,
            "wren-test-host.local.",
            (),
            8089,
            Some(properties),
        )
        .unwrap()
    }

    #[test]
    fn test_device_uses_txt_name_when_present() {
        let info = resolved("abc123", &[("name", "security camera"), ("kinds", "camera, onvif")]);
        let device = MdnsDevice::from_service(&info);
        assert_eq!(device.name(), "security camera");
        assert!(device.has_kind("camera"));
        assert!(device.has_kind("onvif"));
        assert!(!device.has_kind("light"));
    }

    #[test]
    fn test_device_falls_back_to_instance_name() {
        let info = resolved("bulb-a1", &[]);
        let device = MdnsDevice::from_service(&info);
        assert_eq!(device.name(), "bulb-a1");
        assert!(!device.has_kind("light"));
    }

    #[test]
    fn test_kind_list_parsing_ignores_blanks() {
        assert_eq!(parse_kinds("light,, switch , "), vec!["light", "switch"]);
    }

    #[test]
    fn test_discovery_type_filter() {
        let info = resolved("cam-1", &[("type", "upnp")]);
        let device = MdnsDevice::from_service(&info);
        assert!(device.matches_discovery_type(None));
        assert!(device.matches_discovery_type(Some("upnp")));
        assert!(!device.matches_discovery_type(Some("bluetooth")));
    }

    // Browsing needs real multicast and a live daemon; that path is
    // exercised manually, not in unit tests.
}
