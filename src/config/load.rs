use std::{
    env,
    path::{Path, PathBuf},
};

use super::schema::Settings;

const APP_DIR: &str = "encore";
const ENV_PREFIX: &str = "ENCORE";
const CONFIG_PATH_VAR: &str = "ENCORE_CONFIG_PATH";

impl Settings {
    /// Layer struct defaults, the optional config file and `ENCORE__*`
    /// environment variables, later sources winning.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        Self::load_from(resolve_config_path().as_deref())
    }

    fn load_from(config_file: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = config_file {
            builder = builder.add_source(::config::File::from(path).required(false));
        }
        builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Reject values the player cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        let audio = &self.audio;
        if !(0.0..=1.0).contains(&audio.initial_volume) {
            return Err("audio.initial_volume must be within [0, 1]".to_string());
        }
        if !(audio.volume_step > 0.0 && audio.volume_step <= 1.0) {
            return Err("audio.volume_step must be within (0, 1]".to_string());
        }
        if self.search.limit == 0 {
            return Err("search.limit must be >= 1".to_string());
        }
        if self.search.endpoint.trim().is_empty() {
            return Err("search.endpoint must not be empty".to_string());
        }
        Ok(())
    }
}

/// `$<xdg_var>/encore`, or `~/<home_fallback>/encore` when the variable is unset.
fn xdg_app_dir(xdg_var: &str, home_fallback: &[&str]) -> Option<PathBuf> {
    let base = match env::var_os(xdg_var) {
        Some(xdg) => PathBuf::from(xdg),
        None => {
            let mut home = PathBuf::from(env::var_os("HOME")?);
            home.extend(home_fallback);
            home
        }
    };
    Some(base.join(APP_DIR))
}

/// `ENCORE_CONFIG_PATH` when set, else the XDG default.
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .or_else(default_config_path)
}

/// `$XDG_CONFIG_HOME/encore/config.toml` or `~/.config/encore/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_app_dir("XDG_CONFIG_HOME", &[".config"]).map(|d| d.join("config.toml"))
}

/// Log directory: `$XDG_STATE_HOME/encore` or `~/.local/state/encore`.
pub fn default_state_dir() -> Option<PathBuf> {
    xdg_app_dir("XDG_STATE_HOME", &[".local", "state"])
}
