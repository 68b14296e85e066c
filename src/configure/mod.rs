// Device configuration seam
//
// Once the user picks a candidate, the dialogue layer hands it to a
// DeviceConfigurer together with a ConfigDelegate. The configurer owns the
// device-specific setup protocol; the delegate routes its questions and
// completion notices back into the active conversation.

pub mod manual;

pub use manual::ManualConfigurer;

use async_trait::async_trait;
use std::sync::Arc;

use crate::dialog::DialogResult;
use crate::discovery::DeviceCandidate;

/// Broad class of the thing being set up. Picks the wording of the
/// completion notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceClass {
    /// A physical device on the local network.
    #[default]
    Physical,
    /// An account-backed online service.
    Online,
    /// A passive data source.
    Data,
}

/// Conversation-facing surface a configurer drives while it runs: progress
/// questions while setup is underway and a notice once it is done.
#[async_trait]
pub trait ConfigDelegate: Send + Sync {
    /// Setup finished successfully.
    async fn config_done(&self) -> DialogResult<()>;

    /// Setup failed; `error` is a short human-readable cause.
    async fn config_failed(&self, error: &str) -> DialogResult<()>;

    /// Ask the user a yes/no question mid-setup.
    async fn confirm(&self, question: &str) -> DialogResult<bool>;

    /// Ask the user for a short code (pairing PINs and similar).
    async fn request_code(&self, question: &str) -> DialogResult<String>;
}

/// Finalizes configuration of a chosen device candidate.
#[async_trait]
pub trait DeviceConfigurer: Send + Sync {
    async fn complete_discovery(
        &self,
        device: Arc<dyn DeviceCandidate>,
        delegate: Arc<dyn ConfigDelegate>,
    ) -> DialogResult<()>;
}
