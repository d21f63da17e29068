//! Runtime configuration and serde forms

use valuekit::prelude::*;
use valuekit::RuntimeConfig;

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = RuntimeConfig::from_toml_str("buffer_warn_threshold = 10\n").unwrap();
    assert_eq!(config.buffer_warn_threshold, 10);
    assert_eq!(config.cause_chain_limit, RuntimeConfig::default().cause_chain_limit);
}

#[test]
fn test_default_toml_parses_to_defaults() {
    let parsed = RuntimeConfig::from_toml_str(RuntimeConfig::default_toml()).unwrap();
    assert_eq!(parsed, RuntimeConfig::default());
}

#[test]
fn test_bad_toml_is_config_error() {
    let err = RuntimeConfig::from_toml_str("cause_chain_limit = \"many\"").unwrap_err();
    assert_eq!(err.kind_name(), "ConfigError");
}

#[test]
fn test_numbers_round_trip_through_json() {
    let values = vec![
        Number::Long(Long(-7)),
        Number::Decimal(Decimal::parse("12.340").unwrap()),
        Number::Double(Double(0.5)),
    ];
    let json = serde_json::to_string(&values).unwrap();
    let back: Vec<Number> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, values);
    assert_eq!(back[1].to_string(), "12.340");
}

#[test]
fn test_error_becomes_throwable() {
    let t = Throwable::from(Error::arithmetic("/ by zero"));
    assert_eq!(t.kind(), "ArithmeticError");
    assert_eq!(t.get_message(), Some("/ by zero"));
    let wrapped = Throwable::with_cause("IllegalStateError", "outer", t);
    assert_eq!(wrapped.root_cause().kind(), "ArithmeticError");
    assert_eq!(wrapped.causes().count(), 1);
}
