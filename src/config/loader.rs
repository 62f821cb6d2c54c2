use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::config::AppConfig;

const CONFIG_DIR: &str = "instrument-selector";
const CONFIG_FILE: &str = "config.toml";

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load the user's config file, falling back to defaults when there is none.
/// A file that exists but does not parse is an error.
pub fn load() -> color_eyre::Result<AppConfig> {
    let Some(path) = config_path() else {
        debug!("No config directory found, using defaults");
        return Ok(AppConfig::default());
    };

    if !path.exists() {
        debug!("Config file not found at {:?}, using defaults", path);
        return Ok(AppConfig::default());
    }

    let config = parse(&fs::read_to_string(&path)?)?;
    debug!("Loaded config from {:?}", path);
    Ok(config)
}

pub fn parse(content: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str(content)
}
