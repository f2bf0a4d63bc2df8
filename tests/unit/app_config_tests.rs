/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use lyricsync::app_config::{Config, LogLevel, SyncConfig};
use lyricsync::errors::ConfigError;
use lyricsync::timeline::ParsePolicy;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.sync.delay_ms, 0);
    assert!(!config.sync.merge_sentences);
    assert_eq!(config.sync.parse_policy, ParsePolicy::Strict);
    assert_eq!(config.sync.lenient_default_duration_ms, 500);
    assert_eq!(config.sync.tick_interval_ms, 100);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.sync.delay_ms = -10_000;
    assert!(config.validate().is_ok());

    config.sync.delay_ms = -10_001;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::DelayOutOfRange { delay_ms: -10_001, .. })
    ));
    config.sync.delay_ms = 0;

    config.sync.lenient_default_duration_ms = 0;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidLenientDuration(0))));
    config.sync.lenient_default_duration_ms = 500;

    config.sync.tick_interval_ms = 120_000;
    assert!(config.validate().is_err());
}

/// Test saving and loading through a file
#[test]
fn test_config_saveAndLoad_withTempFile_shouldPreserveValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config {
        sync: SyncConfig {
            delay_ms: -350,
            merge_sentences: true,
            parse_policy: ParsePolicy::Lenient,
            lenient_default_duration_ms: 800,
            tick_interval_ms: 50,
        },
        log_level: LogLevel::Debug,
    };
    config.save_to_file(&path)?;

    let loaded = Config::from_file(&path)?;

    assert_eq!(loaded, config);
    Ok(())
}

/// Test that lowercase enum names are used on disk
#[test]
fn test_config_serialization_shouldUseLowercaseNames() -> Result<()> {
    let mut config = Config::default();
    config.sync.parse_policy = ParsePolicy::Lenient;
    config.log_level = LogLevel::Trace;

    let json = serde_json::to_string(&config)?;

    assert!(json.contains("\"lenient\""));
    assert!(json.contains("\"trace\""));
    Ok(())
}

/// Test loading a malformed config file
#[test]
fn test_config_fromFile_withBrokenJson_shouldReturnParseError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ \"sync\": ")?;

    assert!(matches!(Config::from_file(&path), Err(ConfigError::Parse(_))));
    Ok(())
}

/// Test that the configured parser carries policy and duration
#[test]
fn test_syncConfig_parser_shouldReflectSettings() {
    let sync = SyncConfig {
        parse_policy: ParsePolicy::Lenient,
        ..Default::default()
    };

    assert_eq!(sync.parser().policy(), ParsePolicy::Lenient);
}

/// Test log level conversion
#[test]
fn test_logLevel_toLevelFilter_shouldMatch() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::default().to_level_filter(), log::LevelFilter::Info);
}
