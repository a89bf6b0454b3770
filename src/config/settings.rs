use crate::core::constants::check_security;
use crate::crypto::CurlMode;
use crate::error::{Result, TernaryError};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(Config::new);

const POW_THREADS_KEY: &str = "TERNARY_POW_THREADS";
const MWM_KEY: &str = "TERNARY_MWM";
const SECURITY_KEY: &str = "TERNARY_SECURITY";

const DEFAULT_MIN_WEIGHT_MAGNITUDE: usize = 14;
const DEFAULT_SECURITY_LEVEL: u8 = 2;
const DEFAULT_CURL_ROUNDS: usize = 81;

/// Values a node or CLI run can tune. Missing keys in a file keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Proof-of-work threads, 0 means one per available core
    pub pow_threads: usize,
    pub min_weight_magnitude: usize,
    pub security_level: u8,
    /// Rounds of the transaction-hash Curl, 27 or 81
    pub curl_rounds: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            pow_threads: 0,
            min_weight_magnitude: DEFAULT_MIN_WEIGHT_MAGNITUDE,
            security_level: DEFAULT_SECURITY_LEVEL,
            curl_rounds: DEFAULT_CURL_ROUNDS,
        }
    }
}

impl Settings {
    /// Parses a TOML document
    pub fn from_toml(text: &str) -> Result<Settings> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        check_security(self.security_level)?;
        if CurlMode::from_rounds(self.curl_rounds).is_none() {
            return Err(TernaryError::Config(format!(
                "curl_rounds must be 27 or 81, got {}",
                self.curl_rounds
            )));
        }
        Ok(())
    }

    // Unparsable or out-of-range values are logged and skipped
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(threads) = parse_override::<usize, _>(&lookup, POW_THREADS_KEY) {
            self.pow_threads = threads;
        }
        if let Some(mwm) = parse_override::<usize, _>(&lookup, MWM_KEY) {
            self.min_weight_magnitude = mwm;
        }
        if let Some(security) = parse_override::<u8, _>(&lookup, SECURITY_KEY) {
            match check_security(security) {
                Ok(security) => self.security_level = security,
                Err(e) => warn!("Ignoring {SECURITY_KEY}: {e}"),
            }
        }
    }
}

fn parse_override<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {key}={raw}: not a number");
            None
        }
    }
}

pub struct Config {
    inner: RwLock<Settings>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Config {
        let mut settings = Settings::default();
        settings.apply_overrides(|key| env::var(key).ok());
        Config {
            inner: RwLock::new(settings),
        }
    }

    pub fn from_settings(settings: Settings) -> Config {
        Config {
            inner: RwLock::new(settings),
        }
    }

    // Poisoned locks are recovered, not propagated
    fn read(&self) -> RwLockReadGuard<'_, Settings> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Settings> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the settings with a TOML file's, environment still wins
    pub fn load_file(&self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path)?;
        let mut settings = Settings::from_toml(&text)?;
        settings.apply_overrides(|key| env::var(key).ok());
        info!("Loaded configuration from {}", path.display());
        *self.write() = settings;
        Ok(())
    }

    pub fn get_settings(&self) -> Settings {
        self.read().clone()
    }

    pub fn get_pow_threads(&self) -> usize {
        self.read().pow_threads
    }

    pub fn set_pow_threads(&self, threads: usize) {
        self.write().pow_threads = threads;
    }

    pub fn get_min_weight_magnitude(&self) -> usize {
        self.read().min_weight_magnitude
    }

    pub fn set_min_weight_magnitude(&self, mwm: usize) {
        self.write().min_weight_magnitude = mwm;
    }

    pub fn get_security_level(&self) -> u8 {
        self.read().security_level
    }

    pub fn set_security_level(&self, security: u8) -> Result<()> {
        self.write().security_level = check_security(security)?;
        Ok(())
    }

    pub fn get_curl_mode(&self) -> CurlMode {
        CurlMode::from_rounds(self.read().curl_rounds).unwrap_or_default()
    }

    pub fn set_curl_mode(&self, mode: CurlMode) {
        self.write().curl_rounds = mode.rounds();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::from_settings(Settings::default());
        assert_eq!(config.get_pow_threads(), 0);
        assert_eq!(config.get_min_weight_magnitude(), 14);
        assert_eq!(config.get_security_level(), 2);
        assert_eq!(config.get_curl_mode(), CurlMode::CurlP81);
    }

    #[test]
    fn test_setters() {
        let config = Config::from_settings(Settings::default());
        config.set_pow_threads(4);
        config.set_min_weight_magnitude(9);
        config.set_curl_mode(CurlMode::CurlP27);
        assert!(config.set_security_level(5).is_err());
        config.set_security_level(3).unwrap();

        let settings = config.get_settings();
        assert_eq!(settings.pow_threads, 4);
        assert_eq!(settings.min_weight_magnitude, 9);
        assert_eq!(settings.security_level, 3);
        assert_eq!(settings.curl_rounds, 27);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml("min_weight_magnitude = 9\n").unwrap();
        assert_eq!(settings.min_weight_magnitude, 9);
        assert_eq!(settings.security_level, 2);

        assert!(matches!(
            Settings::from_toml("curl_rounds = 50\n"),
            Err(TernaryError::Config(_))
        ));
        assert!(Settings::from_toml("security_level = 7\n").is_err());
        assert!(Settings::from_toml("pow_threads = \"many\"\n").is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (POW_THREADS_KEY, "3"),
            (MWM_KEY, "not-a-number"),
            (SECURITY_KEY, "9"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(settings.pow_threads, 3);
        // Bad values leave the previous setting alone
        assert_eq!(settings.min_weight_magnitude, DEFAULT_MIN_WEIGHT_MAGNITUDE);
        assert_eq!(settings.security_level, DEFAULT_SECURITY_LEVEL);
    }

    #[test]
    fn test_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ternary.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "pow_threads = 2").unwrap();
        writeln!(file, "curl_rounds = 27").unwrap();

        let config = Config::from_settings(Settings::default());
        config.load_file(&path).unwrap();
        assert_eq!(config.get_curl_mode(), CurlMode::CurlP27);

        assert!(matches!(
            config.load_file(&dir.path().join("missing.toml")),
            Err(TernaryError::Io(_))
        ));
    }
}
