use crate::config::ReserveConfig;
use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from `config/Reserve.toml` and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or the result fails validation.
    pub fn load() -> Result<ReserveConfig> {
        Self::load_from("config/Reserve.toml")
    }

    /// Loads configuration by layering built-in defaults, the TOML file at `path`
    /// (skipped when absent), and `RESERVE_` prefixed environment variables.
    /// Nested keys use `__`, e.g. `RESERVE_CACHE__SUPPLY_TTL_MS=2000`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or the result fails validation.
    pub fn load_from(path: impl AsRef<Path>) -> Result<ReserveConfig> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading reserve config");

        let config: ReserveConfig = Figment::from(Serialized::defaults(ReserveConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("RESERVE_").split("__"))
            .extract()?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Rejects configurations the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns an error if the call timeout is zero, a token is listed twice,
    /// or the primary token is not part of the batch.
    pub fn validate(config: &ReserveConfig) -> Result<()> {
        if config.timeouts.call_timeout_ms == 0 {
            bail!("timeouts.call_timeout_ms must be greater than zero");
        }

        let mut seen = std::collections::HashSet::new();
        for token in config.all_tokens() {
            if !seen.insert(token.symbol.as_str()) {
                bail!("token {} is configured more than once", token.symbol);
            }
        }

        if !config.stables.iter().any(|t| t.symbol == config.primary_token) {
            bail!(
                "primary token {} is not in the stables batch",
                config.primary_token
            );
        }

        Ok(())
    }
}
