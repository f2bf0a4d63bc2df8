use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::ConfigError;
use crate::timeline::normalizer::{MAX_DELAY_MS, MIN_DELAY_MS};
use crate::timeline::parser::{ParsePolicy, TimedWordParser, DEFAULT_SYNTHESIZED_DURATION_MS};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Synchronization settings
    #[serde(default)]
    pub sync: SyncConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings that drive the timing pipeline and the playback loop
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SyncConfig {
    /// Global delay applied to every word, in ms
    #[serde(default)]
    pub delay_ms: i64,

    /// Collapse each line into a single timed unit
    #[serde(default)]
    pub merge_sentences: bool,

    /// How to treat words without an end time
    #[serde(default)]
    pub parse_policy: ParsePolicy,

    /// Duration synthesized for words without an end time (lenient policy only)
    #[serde(default = "default_lenient_duration_ms")]
    pub lenient_default_duration_ms: i64,

    /// Interval between playback ticks, in ms
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl SyncConfig {
    // @returns: Parser matching the configured policy
    pub fn parser(&self) -> TimedWordParser {
        TimedWordParser::new(self.parse_policy)
            .with_synthesized_duration(self.lenient_default_duration_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            delay_ms: 0,
            merge_sentences: false,
            parse_policy: ParsePolicy::default(),
            lenient_default_duration_ms: default_lenient_duration_ms(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_lenient_duration_ms() -> i64 {
    DEFAULT_SYNTHESIZED_DURATION_MS
}

fn default_tick_interval_ms() -> u64 {
    100
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values.
    ///
    /// A delay typed into the config file is rejected when out of range,
    /// unlike runtime control values which are clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let delay_ms = self.sync.delay_ms;
        if !(MIN_DELAY_MS..=MAX_DELAY_MS).contains(&delay_ms) {
            return Err(ConfigError::DelayOutOfRange {
                delay_ms,
                min_ms: MIN_DELAY_MS,
                max_ms: MAX_DELAY_MS,
            });
        }

        // Anything above a minute per tick is certainly a unit mistake
        if self.sync.tick_interval_ms == 0 || self.sync.tick_interval_ms > 60_000 {
            return Err(ConfigError::InvalidTickInterval(self.sync.tick_interval_ms));
        }

        if self.sync.lenient_default_duration_ms <= 0 {
            return Err(ConfigError::InvalidLenientDuration(
                self.sync.lenient_default_duration_ms,
            ));
        }

        Ok(())
    }
}
