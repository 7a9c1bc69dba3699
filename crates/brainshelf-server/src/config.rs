use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

const DEV_JWT_SECRET: &str = "brainshelf-dev-secret";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid {key} value {value:?}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub jwt_secret: String,
    pub seed_path: Option<PathBuf>,
    pub sweep_hour: u32,
    pub sweep_minute: u32,
    pub probe_timeout: Duration,
    pub max_concurrent_probes: usize,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// `lookup` に環境変数の読み出しを差し込めるようにしたもの
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup("BRAINSHELF_JWT_SECRET").unwrap_or_else(|| {
            warn!("BRAINSHELF_JWT_SECRET not set, using the development secret");
            DEV_JWT_SECRET.to_string()
        });
        let seed_path = lookup("BRAINSHELF_SEED_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            port: try_load(&lookup, "BRAINSHELF_PORT", "8080")?,
            jwt_secret,
            seed_path,
            sweep_hour: try_load(&lookup, "BRAINSHELF_SWEEP_HOUR", "2")?,
            sweep_minute: try_load(&lookup, "BRAINSHELF_SWEEP_MINUTE", "0")?,
            probe_timeout: Duration::from_secs(try_load(
                &lookup,
                "BRAINSHELF_PROBE_TIMEOUT_SECS",
                "10",
            )?),
            max_concurrent_probes: try_load(&lookup, "BRAINSHELF_MAX_CONCURRENT_PROBES", "16")?,
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    value.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError {
            key,
            value: value.clone(),
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.seed_path, None);
        assert_eq!((config.sweep_hour, config.sweep_minute), (2, 0));
        assert_eq!(config.probe_timeout, Duration::from_secs(10));
        assert_eq!(config.max_concurrent_probes, 16);
    }

    #[test]
    fn overrides() {
        let config = Config::from_lookup(lookup(&[
            ("BRAINSHELF_PORT", "9000"),
            ("BRAINSHELF_JWT_SECRET", "s3cret"),
            ("BRAINSHELF_SEED_PATH", "seed/apps.json"),
            ("BRAINSHELF_SWEEP_HOUR", "4"),
            ("BRAINSHELF_SWEEP_MINUTE", "30"),
            ("BRAINSHELF_PROBE_TIMEOUT_SECS", "3"),
            ("BRAINSHELF_MAX_CONCURRENT_PROBES", " 4 "),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.seed_path, Some(PathBuf::from("seed/apps.json")));
        assert_eq!((config.sweep_hour, config.sweep_minute), (4, 30));
        assert_eq!(config.probe_timeout, Duration::from_secs(3));
        assert_eq!(config.max_concurrent_probes, 4);
    }

    #[test]
    fn invalid_value_is_reported() {
        let err = Config::from_lookup(lookup(&[("BRAINSHELF_PORT", "eighty")])).unwrap_err();
        assert_eq!(err.key, "BRAINSHELF_PORT");
        assert_eq!(err.value, "eighty");
    }
}
