use clap::ValueEnum;
use serde::Deserialize;

/// How confirmation prompts are answered.
#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, PartialEq, Eq, Default)]
#[clap(rename_all = "kebab_case")]
#[serde(rename_all = "kebab-case")]
pub enum ConfirmSetting {
    #[default]
    Ask,
    Yes,
    No,
}
