//! Initialize configuration from file or env var.
//!
//! All environment variables are prefixed with `CAMPUS_QUEST_`.
use campus_quest_configuration::{Configuration, Info};

// Default values
pub const DEFAULT_PATH_CONFIG: &str = "./share/default/config/campus-quest.development.sqlite3.toml";

/// It loads the application configuration from the environment.
///
/// There are two methods to inject the configuration:
///
/// 1. By using a config file: `campus-quest.toml`.
/// 2. Environment variable: `CAMPUS_QUEST_CONFIG_TOML`. The variable contains the same contents as the `campus-quest.toml` file.
///
/// Environment variable has priority over the config file.
///
/// # Panics
///
/// Will panic if it can't load the configuration from either
/// `./campus-quest.toml` file or the env var `CAMPUS_QUEST_CONFIG_TOML`.
#[must_use]
pub fn initialize_configuration() -> Configuration {
    let info = Info::new(DEFAULT_PATH_CONFIG.to_string()).expect("it should load the configuration info");

    Configuration::load(&info).expect("it should load the configuration")
}
