mod common;

use installment_core::config::{Config, ConfigManager};
use installment_core::render::DateStyle;
use installment_core::schedule::{AmountPrecision, TimeUnit};

#[test]
fn save_then_load_restores_settings() {
    let base = common::temp_home();
    let manager = ConfigManager::with_base_dir(base.clone()).unwrap();

    let mut config = Config::default();
    config.set("currency_symbol", "€").unwrap();
    config.set("default_interval", "Week").unwrap();
    config.set("default_interval_count", "2").unwrap();
    config.set("display_precision", "none").unwrap();
    config.set("api_key", "sk_test_abc").unwrap();
    config.set("idempotency_key", "order-42").unwrap();
    manager.save(&config).unwrap();

    let loaded = ConfigManager::with_base_dir(base).unwrap().load().unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.default_interval, TimeUnit::Week);
    assert_eq!(loaded.display_precision, None);
    let credentials = loaded.credentials().unwrap();
    assert_eq!(credentials.api_key, "sk_test_abc");
    assert_eq!(credentials.idempotency_key, "order-42");
}

#[test]
fn partial_file_falls_back_to_defaults() {
    let base = common::temp_home();
    std::fs::write(base.join("config.json"), r#"{"date_style":"short"}"#).unwrap();
    let config = ConfigManager::with_base_dir(base).unwrap().load().unwrap();
    assert_eq!(config.date_style, DateStyle::Short);
    assert_eq!(config.amount_precision, AmountPrecision::Exact);
    assert_eq!(config.currency_symbol, "$");
}

#[test]
fn corrupt_file_is_an_error() {
    let base = common::temp_home();
    std::fs::write(base.join("config.json"), "{ not json").unwrap();
    assert!(ConfigManager::with_base_dir(base).unwrap().load().is_err());
}

#[test]
fn display_options_follow_config() {
    let mut config = Config::default();
    config.set("date_style", "short").unwrap();
    config.set("display_precision", "0").unwrap();
    let options = config.display_options();
    assert_eq!(options.date_style, DateStyle::Short);
    assert_eq!(options.precision, Some(0));
    assert_eq!(options.currency_symbol, "$");
}
