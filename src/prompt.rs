use dialoguer::{theme::ColorfulTheme, Confirm};
use log::warn;

use crate::confirm_setting::ConfirmSetting;

/// Blocking user interaction used to gate destructive actions and report
/// their failures.
pub trait UserPrompt: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;

    fn alert(&self, message: &str);
}

#[derive(Debug, Clone)]
pub struct TerminalPrompt {
    setting: ConfirmSetting,
}

impl TerminalPrompt {
    pub fn new(setting: ConfirmSetting) -> Self {
        TerminalPrompt { setting }
    }
}

impl UserPrompt for TerminalPrompt {
    fn confirm(&self, prompt: &str) -> bool {
        match self.setting {
            ConfirmSetting::Yes => true,
            ConfirmSetting::No => false,
            ConfirmSetting::Ask => Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .default(false)
                .interact()
                .unwrap_or_else(|err| {
                    warn!("Could not ask for confirmation, treating as declined: {}", err);
                    false
                }),
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("{}", message);
    }
}
