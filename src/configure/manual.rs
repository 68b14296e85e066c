// Manual configurer
//
// Stand-in for a real per-device setup protocol. It acknowledges the
// chosen candidate through the delegate so the discovery flow is usable
// end to end from the terminal; actual pairing happens out of band.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::{ConfigDelegate, DeviceConfigurer};
use crate::dialog::DialogResult;
use crate::discovery::DeviceCandidate;

pub struct ManualConfigurer;

impl ManualConfigurer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ManualConfigurer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceConfigurer for ManualConfigurer {
    async fn complete_discovery(
        &self,
        device: Arc<dyn DeviceCandidate>,
        delegate: Arc<dyn ConfigDelegate>,
    ) -> DialogResult<()> {
        info!(device = device.name(), "device chosen for setup");
        delegate.config_done().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingDelegate {
        notices: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ConfigDelegate for RecordingDelegate {
        async fn config_done(&self) -> DialogResult<()> {
            self.notices.lock().unwrap().push("done".to_string());
            Ok(())
        }

        async fn config_failed(&self, error: &str) -> DialogResult<()> {
            self.notices.lock().unwrap().push(format!("failed: {}", error));
            Ok(())
        }

        async fn confirm(&self, _question: &str) -> DialogResult<bool> {
            Ok(true)
        }

        async fn request_code(&self, _question: &str) -> DialogResult<String> {
            Ok("0000".to_string())
        }
    }

    struct NamedDevice(&'static str);

    impl DeviceCandidate for NamedDevice {
        fn name(&self) -> &str {
            self.0
        }

        fn has_kind(&self, _kind: &str) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_manual_configurer_reports_done() {
        let delegate = Arc::new(RecordingDelegate {
            notices: Mutex::new(Vec::new()),
        });
        let configurer = ManualConfigurer::new();
        configurer
            .complete_discovery(Arc::new(NamedDevice("lamp")), delegate.clone())
            .await
            .unwrap();
        assert_eq!(*delegate.notices.lock().unwrap(), vec!["done".to_string()]);
    }
}
