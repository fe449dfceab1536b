use crate::world::{WorldParams, DEFAULT_GRID_SIZE, DEFAULT_PIT_PROBABILITY};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "wumpus.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub advisor: AdvisorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_grid_size")]
    pub grid_size: i32,
    #[serde(default = "default_pit_probability")]
    pub pit_probability: f64,
    /// Fixed seed for reproducible caves; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u32,
}

/// Remote advisor settings, passed explicitly to whoever builds the advisor
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdvisorConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_hint_temperature")]
    pub hint_temperature: f32,
    #[serde(default = "default_hint_max_tokens")]
    pub hint_max_tokens: u32,
    #[serde(default = "default_action_temperature")]
    pub action_temperature: f32,
    #[serde(default = "default_action_max_tokens")]
    pub action_max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default = "default_enable_action_log")]
    pub enable_action_log: bool,
    #[serde(default = "default_action_log_path")]
    pub action_log_path: String,
}

// Default values
fn default_grid_size() -> i32 { DEFAULT_GRID_SIZE }
fn default_pit_probability() -> f64 { DEFAULT_PIT_PROBABILITY }
fn default_tick_ms() -> u64 { 1000 }
fn default_max_ticks() -> u32 { 200 }
fn default_model() -> String { "gemini-pro".to_string() }
fn default_api_key_env() -> String { "GOOGLE_AI_API_KEY".to_string() }
fn default_endpoint() -> String { "https://generativelanguage.googleapis.com/v1beta".to_string() }
fn default_timeout_ms() -> u64 { 10_000 }
fn default_hint_temperature() -> f32 { 0.4 }
fn default_hint_max_tokens() -> u32 { 200 }
fn default_action_temperature() -> f32 { 0.1 }
fn default_action_max_tokens() -> u32 { 10 }
fn default_filter() -> String { "info".to_string() }
fn default_enable_action_log() -> bool { true }
fn default_action_log_path() -> String { "action_log.json".to_string() }

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            pit_probability: default_pit_probability(),
            seed: None,
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            max_ticks: default_max_ticks(),
        }
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: default_model(),
            api_key_env: default_api_key_env(),
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
            hint_temperature: default_hint_temperature(),
            hint_max_tokens: default_hint_max_tokens(),
            action_temperature: default_action_temperature(),
            action_max_tokens: default_action_max_tokens(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            enable_action_log: default_enable_action_log(),
            action_log_path: default_action_log_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            bot: BotConfig::default(),
            advisor: AdvisorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl WorldConfig {
    pub fn params(&self) -> WorldParams {
        WorldParams {
            grid_size: self.grid_size,
            pit_probability: self.pit_probability,
        }
    }
}

impl Config {
    /// Load configuration from `wumpus.toml`, or use defaults if it doesn't exist
    pub fn load() -> Self {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from `path`. Missing or malformed files fall back to defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to parse configuration, using defaults");
                    Config::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no configuration file found, using defaults");
                Config::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.world.grid_size, 4);
        assert_eq!(config.world.pit_probability, 0.2);
        assert!(!config.advisor.enabled);
        assert_eq!(config.advisor.model, "gemini-pro");
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
            [world]
            grid_size = 6
            seed = 42

            [advisor]
            enabled = true
            model = "gemini-1.5-flash"
            "#,
        )
        .unwrap();

        assert_eq!(config.world.grid_size, 6);
        assert_eq!(config.world.seed, Some(42));
        assert_eq!(config.world.pit_probability, 0.2);
        assert!(config.advisor.enabled);
        assert_eq!(config.advisor.model, "gemini-1.5-flash");
        assert_eq!(config.advisor.timeout_ms, 10_000);
        assert_eq!(config.bot.max_ticks, 200);
    }

    #[test]
    fn test_bad_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wumpus.toml");
        std::fs::write(&path, "[world\ngrid_size = ").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
        assert_eq!(Config::load_from(dir.path().join("missing.toml")), Config::default());
    }
}
