// Discovery dialogue
//
// One bounded discovery attempt from request to (at most) one configured
// device: guard checks, the search itself, kind filtering, disambiguation,
// and handoff to the configurer. Collaborators are called in a fixed
// order, and cancellation raised by any of them unwinds the whole flow
// unchanged.

use std::sync::Arc;

use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::channel::InteractionChannel;
use crate::configure::{DeviceClass, DeviceConfigurer};
use crate::dialog::delegate::ChannelDelegate;
use crate::dialog::{DialogError, DialogResult};
use crate::discovery::{DeviceCandidate, DiscoveryOutcome, DiscoveryRequest, DiscoveryService};
use crate::session::SessionPolicy;
use crate::stats::UsageRecorder;

/// Counter name predates the project rename; existing dashboards key on it.
const CONFIRM_EVENT: &str = "sabrina-confirm";

pub struct DiscoveryNegotiator {
    discovery: Option<Arc<dyn DiscoveryService>>,
    devices: Arc<dyn DeviceConfigurer>,
    session: Arc<dyn SessionPolicy>,
    usage: Arc<dyn UsageRecorder>,
}

impl DiscoveryNegotiator {
    /// `discovery` is None when this deployment ships without a discovery
    /// service at all; the flow then reports unavailability and stops.
    pub fn new(
        discovery: Option<Arc<dyn DiscoveryService>>,
        devices: Arc<dyn DeviceConfigurer>,
        session: Arc<dyn SessionPolicy>,
        usage: Arc<dyn UsageRecorder>,
    ) -> Self {
        Self {
            discovery,
            devices,
            session,
            usage,
        }
    }

    /// Run one discovery attempt over `channel`.
    ///
    /// Every terminal outcome (guard miss, failure already reported, no
    /// matches, device configured, user declined) returns Ok(()). The one
    /// exception is cancellation, which is re-raised so the caller can
    /// unwind whatever conversation contains this flow.
    pub async fn run_discovery_flow(
        &self,
        channel: Arc<dyn InteractionChannel>,
        request: DiscoveryRequest,
    ) -> DialogResult<()> {
        // Guards, in order: service present, user known, user allowed.
        // Each miss is a clean terminal reply, not an error.
        let Some(discovery) = &self.discovery else {
            channel
                .reply("Discovery is not available in this installation of Wren.")
                .await?;
            return Ok(());
        };
        if self.session.is_anonymous() {
            channel
                .reply("Sorry, to discover new devices you must log in to your personal account.")
                .await?;
            channel.reply_link("Register for Wren", "/user/register").await?;
            return Ok(());
        }
        if !self.session.can_configure_device(None) {
            channel.forbid().await?;
            return Ok(());
        }

        let attempt = Uuid::new_v4();
        debug!(
            %attempt,
            discovery_type = ?request.discovery_type,
            kind = ?request.kind,
            "starting discovery"
        );

        match &request.name {
            Some(name) => {
                channel
                    .reply_interp("Searching for ${device}…", &[("device", name.as_str())])
                    .await?
            }
            None => channel.reply("Searching for devices nearby…").await?,
        }

        let outcome = discovery
            .run_discovery(request.timeout, request.discovery_type.as_deref())
            .await;
        let mut devices = match outcome {
            Ok(DiscoveryOutcome::Matches(devices)) => devices,
            // Another flow took this attempt over; nothing more to say here.
            Ok(DiscoveryOutcome::Superseded) => {
                debug!(%attempt, "discovery superseded");
                return Ok(());
            }
            Err(DialogError::Cancelled) => return Err(DialogError::Cancelled),
            Err(err @ (DialogError::Failed { .. } | DialogError::Other(_))) => {
                // Stop the search before telling the user it failed. A
                // cancellation raised by the stop itself still wins.
                match discovery.stop_discovery().await {
                    Ok(()) => {}
                    Err(DialogError::Cancelled) => return Err(DialogError::Cancelled),
                    Err(stop_err) => {
                        warn!(%attempt, error = %stop_err, "could not stop discovery after failure")
                    }
                }
                let reason = err.to_string();
                channel
                    .reply_interp("Discovery failed: ${error}.", &[("error", reason.as_str())])
                    .await?;
                return Ok(());
            }
        };

        if let Some(kind) = &request.kind {
            devices.retain(|device| device.has_kind(kind));
        }
        debug!(%attempt, matches = devices.len(), "discovery finished");

        if devices.is_empty() {
            match &request.name {
                Some(name) => {
                    channel
                        .reply_interp(
                            "Can't find any ${device} around.",
                            &[("device", name.as_str())],
                        )
                        .await?
                }
                None => channel.reply("Can't find any device around.").await?,
            }
            return Ok(());
        }

        if devices.len() == 1 {
            let device = devices.remove(0);
            let set_up = channel
                .ask_yes_no(
                    "I found a ${device}. Do you want to set it up now?",
                    &[("device", device.name())],
                )
                .await?;
            if set_up {
                self.usage.hit(CONFIRM_EVENT);
                self.complete_discovery(&channel, device).await?;
            } else {
                channel.reset().await?;
            }
            return Ok(());
        }

        // Several candidates: the user picks by position in the filtered
        // list, so the chosen index maps straight back into `devices`.
        let labels: Vec<String> = devices
            .iter()
            .map(|device| device.name().to_string())
            .collect();
        let choice = channel
            .ask_choices("I found the following devices. Which one do you want to set up?", &labels)
            .await?;
        self.usage.hit(CONFIRM_EVENT);
        let device = devices.into_iter().nth(choice).ok_or_else(|| {
            DialogError::Other(anyhow::anyhow!(
                "selection {} is outside the presented list",
                choice
            ))
        })?;
        self.complete_discovery(&channel, device).await?;
        Ok(())
    }

    /// Hand the chosen candidate to the configurer. Cancellation from the
    /// configurer unwinds the flow; any other failure is logged and
    /// swallowed, because the configurer reports its own user-facing
    /// errors through the delegate.
    async fn complete_discovery(
        &self,
        channel: &Arc<dyn InteractionChannel>,
        device: Arc<dyn DeviceCandidate>,
    ) -> DialogResult<()> {
        let delegate = Arc::new(ChannelDelegate::new(
            Arc::clone(channel),
            DeviceClass::default(),
        ));
        match self.devices.complete_discovery(device, delegate).await {
            Ok(()) => Ok(()),
            Err(DialogError::Cancelled) => Err(DialogError::Cancelled),
            Err(err @ (DialogError::Failed { .. } | DialogError::Other(_))) => {
                error!(error = %err, "failed to complete discovery configuration");
                Ok(())
            }
        }
    }
}
