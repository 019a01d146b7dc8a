//! Unit tests for the config module

use checkin_history::config::AppConfig;

#[test]
fn test_default_database_config() {
    let config = AppConfig::default();

    assert_eq!(config.database.url, "sqlite:data/visits.db");
    assert_eq!(config.database.max_connections, 10);
}

#[test]
fn test_default_logging_config() {
    let config = AppConfig::default();

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file_path, None);
    assert_eq!(config.logging.format, "text");
}

#[test]
fn test_default_aggregator_config() {
    let config = AppConfig::default();

    assert!((config.aggregator.half_life_days - 30.0).abs() < f64::EPSILON);
}

#[test]
fn test_default_export_config() {
    let config = AppConfig::default();

    assert_eq!(config.export.default_format, "txt");
    assert_eq!(config.export.output_directory, "./output");
}

#[test]
fn test_config_validation_success() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_empty_database_url() {
    let mut config = AppConfig::default();
    config.database.url = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_zero_max_connections() {
    let mut config = AppConfig::default();
    config.database.max_connections = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_bad_log_level() {
    let mut config = AppConfig::default();
    config.logging.level = "verbose".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_bad_log_format() {
    let mut config = AppConfig::default();
    config.logging.format = "xml".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_negative_half_life() {
    let mut config = AppConfig::default();
    config.aggregator.half_life_days = -1.0;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_nan_half_life() {
    let mut config = AppConfig::default();
    config.aggregator.half_life_days = f64::NAN;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_bad_export_format() {
    let mut config = AppConfig::default();
    config.export.default_format = "xlsx".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_database_url_env_override() {
    let config = AppConfig::default();

    // Without the env var the configured URL wins
    std::env::remove_var("DATABASE_URL");
    assert_eq!(config.get_database_url(), "sqlite:data/visits.db");
}
