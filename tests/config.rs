mod common;

use bulky_book::config::{AppConfig, ConfigError, Environment};
use common::test_env;

fn load_without(missing: &str) -> Result<AppConfig, ConfigError> {
    let env = test_env();
    AppConfig::from_lookup(|key| if key == missing { None } else { env.get(key).cloned() })
}

#[test]
fn missing_stripe_secret_key_is_fatal() {
    let err = load_without("STRIPE_SECRET_KEY").unwrap_err();
    assert!(matches!(err, ConfigError::MissingStripeKey("STRIPE_SECRET_KEY")));
}

#[test]
fn missing_stripe_publishable_key_is_fatal() {
    let err = load_without("STRIPE_PUBLISHABLE_KEY").unwrap_err();
    assert!(matches!(err, ConfigError::MissingStripeKey("STRIPE_PUBLISHABLE_KEY")));
}

#[test]
fn blank_stripe_key_counts_as_missing() {
    let mut env = test_env();
    env.insert("STRIPE_SECRET_KEY", "   ".to_string());
    let err = AppConfig::from_lookup(|key| env.get(key).cloned()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingStripeKey(_)));
}

#[test]
fn optional_values_fall_back_to_defaults() {
    let env = test_env();
    let config = AppConfig::from_lookup(|key| match key {
        "APP_ENV" | "APP_BASE_URL" => None,
        _ => env.get(key).cloned(),
    })
    .expect("config");

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 3000);
    assert_eq!(config.environment, Environment::Production);
    assert_eq!(config.base_url, "http://127.0.0.1:3000");
    assert_eq!(config.web_root, std::path::PathBuf::from("wwwroot"));
    assert_eq!(config.stripe.api_base, "https://api.stripe.com");
    assert_eq!(config.stripe.publishable_key, "pk_test_123");
}

#[test]
fn invalid_port_is_rejected() {
    let mut env = test_env();
    env.insert("APP_PORT", "not-a-port".to_string());
    let err = AppConfig::from_lookup(|key| env.get(key).cloned()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar("APP_PORT", _)));
}
