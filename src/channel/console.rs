// Console channel
//
// Terminal realization of the interaction channel: replies go to stdout,
// questions become inquire prompts run on the blocking pool. Esc and
// Ctrl-C inside a prompt surface as DialogError::Cancelled so the dialogue
// layer can unwind the whole conversation.

use async_trait::async_trait;
use inquire::error::InquireError;
use tokio::task;

use super::menu::{Menu, MenuOption};
use super::InteractionChannel;
use crate::dialog::{DialogError, DialogResult};

pub struct ConsoleChannel;

impl ConsoleChannel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a `${key}` template with its bindings. Keys without a binding
/// are left verbatim.
fn interpolate(template: &str, bindings: &[(&str, &str)]) -> String {
    let mut rendered = template.to_string();
    for (key, value) in bindings {
        rendered = rendered.replace(&format!("${{{}}}", key), value);
    }
    rendered
}

/// Classify a prompt error: user interrupts mean the conversation is
/// cancelled, everything else is a real failure.
fn prompt_error(err: InquireError) -> DialogError {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            DialogError::Cancelled
        }
        other => DialogError::Other(anyhow::Error::new(other)),
    }
}

/// Run a blocking inquire prompt without stalling the runtime.
async fn run_prompt<T, F>(prompt: F) -> DialogResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, InquireError> + Send + 'static,
{
    task::spawn_blocking(prompt)
        .await
        .map_err(|err| DialogError::Other(anyhow::Error::new(err)))?
        .map_err(prompt_error)
}

#[async_trait]
impl InteractionChannel for ConsoleChannel {
    async fn reply(&self, text: &str) -> DialogResult<()> {
        println!("{}", text);
        Ok(())
    }

    async fn reply_interp(&self, template: &str, bindings: &[(&str, &str)]) -> DialogResult<()> {
        println!("{}", interpolate(template, bindings));
        Ok(())
    }

    async fn reply_link(&self, text: &str, url: &str) -> DialogResult<()> {
        println!("{}: {}", text, url);
        Ok(())
    }

    async fn ask_yes_no(&self, question: &str, bindings: &[(&str, &str)]) -> DialogResult<bool> {
        let question = interpolate(question, bindings);
        run_prompt(move || Menu::confirm(&question, true)).await
    }

    async fn ask_choices(&self, question: &str, labels: &[String]) -> DialogResult<usize> {
        let question = question.to_string();
        let options: Vec<MenuOption<usize>> = labels
            .iter()
            .cloned()
            .enumerate()
            .map(|(idx, label)| MenuOption::new(label, idx))
            .collect();
        run_prompt(move || {
            Menu::select(
                &question,
                options,
                Some("arrows or number keys to choose, enter to confirm"),
            )
        })
        .await
    }

    async fn ask_code(&self, question: &str) -> DialogResult<String> {
        let question = question.to_string();
        run_prompt(move || Menu::text_input(&question, None)).await
    }

    async fn forbid(&self) -> DialogResult<()> {
        println!("Sorry, you are not allowed to do that.");
        Ok(())
    }

    async fn reset(&self) -> DialogResult<()> {
        println!("OK, never mind.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_single_binding() {
        let rendered = interpolate("I found a ${device}.", &[("device", "security camera")]);
        assert_eq!(rendered, "I found a security camera.");
    }

    #[test]
    fn test_interpolate_multiple_bindings() {
        let rendered = interpolate("${a} and ${b}", &[("a", "one"), ("b", "two")]);
        assert_eq!(rendered, "one and two");
    }

    #[test]
    fn test_interpolate_leaves_unbound_keys() {
        let rendered = interpolate("Discovery failed: ${error}.", &[]);
        assert_eq!(rendered, "Discovery failed: ${error}.");
    }

    #[test]
    fn test_prompt_interrupts_become_cancelled() {
        assert!(prompt_error(InquireError::OperationCanceled).is_cancelled());
        assert!(prompt_error(InquireError::OperationInterrupted).is_cancelled());
    }

    #[test]
    fn test_prompt_failures_stay_failures() {
        let err = prompt_error(InquireError::NotTTY);
        assert!(!err.is_cancelled());
    }
}
