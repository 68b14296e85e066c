// Channel-backed configuration delegate
//
// Built by the negotiator for each completion attempt. Forwards the
// configurer's questions and notices to the interaction channel, with the
// completion wording chosen by device class.

use async_trait::async_trait;
use std::sync::Arc;

use crate::channel::InteractionChannel;
use crate::configure::{ConfigDelegate, DeviceClass};
use crate::dialog::DialogResult;

pub struct ChannelDelegate {
    channel: Arc<dyn InteractionChannel>,
    device_class: DeviceClass,
}

impl ChannelDelegate {
    pub fn new(channel: Arc<dyn InteractionChannel>, device_class: DeviceClass) -> Self {
        Self {
            channel,
            device_class,
        }
    }
}

#[async_trait]
impl ConfigDelegate for ChannelDelegate {
    async fn config_done(&self) -> DialogResult<()> {
        let notice = match self.device_class {
            DeviceClass::Physical => "The device has been set up.",
            DeviceClass::Online => "The account has been linked.",
            DeviceClass::Data => "The data source has been enabled.",
        };
        self.channel.reply(notice).await
    }

    async fn config_failed(&self, error: &str) -> DialogResult<()> {
        self.channel
            .reply_interp("Configuration failed: ${error}.", &[("error", error)])
            .await
    }

    async fn confirm(&self, question: &str) -> DialogResult<bool> {
        self.channel.ask_yes_no(question, &[]).await
    }

    async fn request_code(&self, question: &str) -> DialogResult<String> {
        self.channel.ask_code(question).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingChannel {
        lines: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl InteractionChannel for RecordingChannel {
        async fn reply(&self, text: &str) -> DialogResult<()> {
            self.lines.lock().unwrap().push(text.to_string());
            Ok(())
        }

        async fn reply_interp(
            &self,
            template: &str,
            bindings: &[(&str, &str)],
        ) -> DialogResult<()> {
            let mut rendered = template.to_string();
            for (key, value) in bindings {
                rendered = rendered.replace(&format!("${{{}}}", key), value);
            }
            self.lines.lock().unwrap().push(rendered);
            Ok(())
        }

        async fn reply_link(&self, text: &str, url: &str) -> DialogResult<()> {
            self.lines.lock().unwrap().push(format!("{} -> {}", text, url));
            Ok(())
        }

        async fn ask_yes_no(
            &self,
            question: &str,
            _bindings: &[(&str, &str)],
        ) -> DialogResult<bool> {
            self.lines.lock().unwrap().push(format!("ask: {}", question));
            Ok(true)
        }

        async fn ask_choices(&self, _question: &str, _labels: &[String]) -> DialogResult<usize> {
            Ok(0)
        }

        async fn ask_code(&self, question: &str) -> DialogResult<String> {
            self.lines.lock().unwrap().push(format!("code: {}", question));
            Ok("1234".to_string())
        }

        async fn forbid(&self) -> DialogResult<()> {
            Ok(())
        }

        async fn reset(&self) -> DialogResult<()> {
            Ok(())
        }
    }

    fn channel() -> Arc<RecordingChannel> {
        Arc::new(RecordingChannel::default())
    }

    #[tokio::test]
    async fn test_done_notice_follows_device_class() {
        for (class, notice) in [
            (DeviceClass::Physical, "The device has been set up."),
            (DeviceClass::Online, "The account has been linked."),
            (DeviceClass::Data, "The data source has been enabled."),
        ] {
            let chan = channel();
            let delegate = ChannelDelegate::new(chan.clone(), class);
            delegate.config_done().await.unwrap();
            assert_eq!(*chan.lines.lock().unwrap(), vec![notice.to_string()]);
        }
    }

    #[tokio::test]
    async fn test_failed_notice_includes_cause() {
        let chan = channel();
        let delegate = ChannelDelegate::new(chan.clone(), DeviceClass::Physical);
        delegate.config_failed("pairing timed out").await.unwrap();
        assert_eq!(
            *chan.lines.lock().unwrap(),
            vec!["Configuration failed: pairing timed out.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_questions_are_forwarded() {
        let chan = channel();
        let delegate = ChannelDelegate::new(chan.clone(), DeviceClass::Physical);
        assert!(delegate.confirm("Reset the device first?").await.unwrap());
        assert_eq!(delegate.request_code("Enter the PIN").await.unwrap(), "1234");
        assert_eq!(
            *chan.lines.lock().unwrap(),
            vec![
                "ask: Reset the device first?".to_string(),
                "code: Enter the PIN".to_string()
            ]
        );
    }
}
