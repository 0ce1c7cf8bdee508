use std::{env, path::PathBuf};

use crate::storage::Store;

use super::schema::{SETTINGS_KEY, Settings};

impl Settings {
    /// Load settings: saved store copy first, then config file / environment,
    /// then struct defaults. Failures at any layer fall through to the next.
    pub fn load(store: &Store) -> Self {
        if let Some(saved) = store.get::<Settings>(SETTINGS_KEY) {
            return saved;
        }
        match Self::load_from_config() {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load config, using defaults");
                Settings::default()
            }
        }
    }

    /// Load from the optional TOML config file and `GROOVEZILLA__` env vars.
    pub fn load_from_config() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("GROOVEZILLA")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }
}

/// Resolve the config path from `GROOVEZILLA_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("GROOVEZILLA_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/groovezilla/config.toml`
/// or `~/.config/groovezilla/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("groovezilla").join("config.toml"))
}
