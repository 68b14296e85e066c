// Interaction channel
//
// The conversational surface the dialogue layer talks through. Rendering
// (templates, localization, link presentation) belongs to the channel;
// the dialogue layer only supplies text and bindings. Every method is a
// suspension point and may raise DialogError::Cancelled when the user
// interrupts the conversation mid-prompt.

mod console;
pub mod menu;

pub use console::ConsoleChannel;

use async_trait::async_trait;

use crate::dialog::DialogResult;

#[async_trait]
pub trait InteractionChannel: Send + Sync {
    /// Send a plain message.
    async fn reply(&self, text: &str) -> DialogResult<()>;

    /// Send a message rendered from a `${key}` template and its bindings.
    async fn reply_interp(&self, template: &str, bindings: &[(&str, &str)]) -> DialogResult<()>;

    /// Send a message carrying a link.
    async fn reply_link(&self, text: &str, url: &str) -> DialogResult<()>;

    /// Ask a yes/no question (template plus bindings, like `reply_interp`).
    async fn ask_yes_no(&self, question: &str, bindings: &[(&str, &str)]) -> DialogResult<bool>;

    /// Ask the user to pick one of `labels`; returns the chosen index,
    /// valid within `0..labels.len()` of the presented list.
    async fn ask_choices(&self, question: &str, labels: &[String]) -> DialogResult<usize>;

    /// Ask for a short free-form code (setup PINs and the like).
    async fn ask_code(&self, question: &str) -> DialogResult<String>;

    /// Report that the current user is not allowed to do this.
    async fn forbid(&self) -> DialogResult<()>;

    /// Abandon the current conversational context.
    async fn reset(&self) -> DialogResult<()>;
}
