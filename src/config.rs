use std::path::Path;

use reqwest::Url;
use serde::Deserialize;
use snafu::{ResultExt, Whatever};

use crate::{
    arguments::Arguments,
    confirm_setting::ConfirmSetting,
    util::{CONFIG_FILE, DEFAULT_BASE_URL, DEFAULT_ROOT, DEFAULT_USERNAME},
};

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub root: Option<String>,
    pub confirm: Option<ConfirmSetting>,
}

impl Config {
    /// Reads `path`, or the default config file if none is given. Only a
    /// missing default file is tolerated.
    pub fn load(path: Option<&Path>) -> Result<Config, Whatever> {
        let path = match path {
            Some(path) => path,
            None if Path::new(CONFIG_FILE).exists() => Path::new(CONFIG_FILE),
            None => return Ok(Config::default()),
        };

        let contents = std::fs::read_to_string(path)
            .with_whatever_context(|_| format!("Could not read config {}", path.display()))?;
        toml::from_str(&contents)
            .with_whatever_context(|_| format!("Could not parse config {}", path.display()))
    }
}

/// Effective settings: arguments win over the config file, which wins over
/// the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: Url,
    pub username: String,
    pub root: String,
    pub confirm: ConfirmSetting,
}

impl Settings {
    pub fn resolve(arguments: &Arguments, config: Config) -> Result<Settings, Whatever> {
        let base_url = arguments
            .base_url
            .clone()
            .or(config.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url)
            .with_whatever_context(|_| format!("Invalid base url {}", base_url))?;

        Ok(Settings {
            base_url,
            username: arguments
                .username
                .clone()
                .or(config.username)
                .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            root: arguments
                .root
                .clone()
                .or(config.root)
                .unwrap_or_else(|| DEFAULT_ROOT.to_string()),
            confirm: arguments.confirm.or(config.confirm).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_load_parses_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
base_url = "https://files.example.com/api/"
username = "ada"
confirm = "no"
"#
        )
        .unwrap();

        let actual = Config::load(Some(file.path())).unwrap();

        let expected = Config {
            base_url: Some("https://files.example.com/api/".to_string()),
            username: Some("ada".to_string()),
            root: None,
            confirm: Some(ConfirmSetting::No),
        };
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.toml");

        assert!(Config::load(Some(missing.as_path())).is_err());
    }

    #[test]
    fn test_arguments_override_config() {
        let arguments =
            Arguments::try_parse_from(["resume_wipe", "list", "--root", "/resumes"]).unwrap();
        let config = Config {
            base_url: Some("https://files.example.com/api/".to_string()),
            username: None,
            root: Some("./".to_string()),
            confirm: Some(ConfirmSetting::Yes),
        };

        let actual = Settings::resolve(&arguments, config).unwrap();

        let expected = Settings {
            base_url: Url::parse("https://files.example.com/api/").unwrap(),
            username: DEFAULT_USERNAME.to_string(),
            root: "/resumes".to_string(),
            confirm: ConfirmSetting::Yes,
        };
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let arguments =
            Arguments::try_parse_from(["resume_wipe", "list", "--base-url", "not a url"]).unwrap();

        assert!(Settings::resolve(&arguments, Config::default()).is_err());
    }
}
