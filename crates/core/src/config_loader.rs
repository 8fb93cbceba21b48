use std::path::Path;

use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads application configuration by merging defaults, the TOML file
    /// at `path`, environment variables, and JSON.
    ///
    /// A missing file is not an error; defaults and the environment still
    /// apply. Environment variables use the `APP_` prefix and `__` for
    /// nesting, e.g. `APP_ANALYSIS__SEED=7`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be parsed or the
    /// resulting analysis parameters are invalid.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let config: AppConfig = Self::figment(path.as_ref()).extract()?;
        config.analysis.validate()?;
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("APP_").split("__"))
            .join(Json::file("config/Config.json"))
    }
}
