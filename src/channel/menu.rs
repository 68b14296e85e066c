// Terminal prompt helpers
//
// Thin wrappers over inquire used by the console channel. These return the
// raw InquireError so the caller can classify user interrupts (Esc, Ctrl-C)
// as conversation cancellation rather than failures.

use inquire::error::InquireError;
use inquire::{Confirm, Select, Text};
use std::io::IsTerminal;

/// One selectable entry: the label shown to the user and the value handed
/// back when it is chosen.
pub struct MenuOption<T> {
    pub label: String,
    pub value: T,
}

impl<T> MenuOption<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

pub struct Menu;

impl Menu {
    /// Single selection from a numbered list. Labels are prefixed with
    /// "1.", "2.", ... so entries can also be picked by number.
    pub fn select<T>(
        prompt: &str,
        options: Vec<MenuOption<T>>,
        help_message: Option<&str>,
    ) -> Result<T, InquireError> {
        if options.is_empty() {
            return Err(InquireError::InvalidConfiguration(
                "menu requires at least one option".to_string(),
            ));
        }
        if !std::io::stdin().is_terminal() {
            return Err(InquireError::NotTTY);
        }

        let labels: Vec<String> = options
            .iter()
            .enumerate()
            .map(|(idx, option)| format!("{}. {}", idx + 1, option.label))
            .collect();

        let mut select = Select::new(prompt, labels);
        select.vim_mode = true;
        select.page_size = 10;
        if let Some(help) = help_message {
            select.help_message = Some(help);
        }

        let selection = select.prompt()?;
        // Recover the index from the "N." prefix we added above.
        let number = selection
            .split('.')
            .next()
            .and_then(|n| n.trim().parse::<usize>().ok())
            .ok_or_else(|| InquireError::Custom("selected label lost its number prefix".into()))?;
        options
            .into_iter()
            .nth(number.saturating_sub(1))
            .map(|option| option.value)
            .ok_or_else(|| InquireError::Custom("selected number is out of range".into()))
    }

    /// Yes/no prompt.
    pub fn confirm(prompt: &str, default: bool) -> Result<bool, InquireError> {
        if !std::io::stdin().is_terminal() {
            return Err(InquireError::NotTTY);
        }
        Confirm::new(prompt).with_default(default).prompt()
    }

    /// Free-form line of input.
    pub fn text_input(prompt: &str, help_message: Option<&str>) -> Result<String, InquireError> {
        if !std::io::stdin().is_terminal() {
            return Err(InquireError::NotTTY);
        }
        let mut text = Text::new(prompt);
        if let Some(help) = help_message {
            text.help_message = Some(help);
        }
        text.prompt()
    }
}
