pub const DEFAULT_BASE_URL: &str = "https://api.resumind.app/v1/";

pub const DEFAULT_ROOT: &str = "./";

pub const DEFAULT_USERNAME: &str = "default";

pub const CONFIG_FILE: &str = "resume_wipe.toml";

/// Keyring service the API token is stored under.
pub const KEYRING_SERVICE: &str = "resume_wipe";

/// View to come back to after the login flow.
pub const WIPE_VIEW: &str = "/wipe";
