//! Unit tests for configuration defaults, parsing, and validation.

use std::str::FromStr;

use rstest::rstest;

use super::*;

#[test]
fn defaults_enable_scheme_querying() {
    let config = Config::default();
    assert_eq!(config.scheme_query(), SchemeQueryPolicy::Enabled);
    assert_eq!(config.return_launch(), ReturnLaunchPolicy::FireAndForget);
    assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
    assert_eq!(config.log_format(), LogFormat::Json);
    assert!(config.source_app().is_none());
    assert!(!config.require_source_app());
}

#[test]
fn empty_document_deserialises_to_defaults() {
    let config: Config = serde_json::from_str("{}").expect("empty config parses");
    assert_eq!(config, Config::default());
}

#[test]
fn deserialises_snake_case_policies() {
    let json = r#"{
        "source_app": "Notes",
        "scheme_query": "disabled",
        "return_launch": "query_scheme",
        "source_app_policy": "required",
        "log_format": "compact"
    }"#;
    let config: Config = serde_json::from_str(json).expect("config parses");
    assert_eq!(config.source_app(), Some("Notes"));
    assert_eq!(config.scheme_query(), SchemeQueryPolicy::Disabled);
    assert_eq!(config.return_launch(), ReturnLaunchPolicy::QueryScheme);
    assert_eq!(config.source_app_policy(), SourceAppPolicy::Required);
    assert!(config.require_source_app());
    assert_eq!(config.log_format(), LogFormat::Compact);
}

#[rstest]
#[case::json("json", LogFormat::Json)]
#[case::compact_upper("COMPACT", LogFormat::Compact)]
fn log_format_parses_case_insensitively(#[case] text: &str, #[case] expected: LogFormat) {
    assert_eq!(LogFormat::from_str(text).expect("format parses"), expected);
}

#[test]
fn policy_display_is_snake_case() {
    assert_eq!(ReturnLaunchPolicy::FireAndForget.to_string(), "fire_and_forget");
    assert_eq!(SchemeQueryPolicy::Disabled.to_string(), "disabled");
}

#[rstest]
#[case::required(true, SourceAppPolicy::Required)]
#[case::optional(false, SourceAppPolicy::Optional)]
fn required_source_app_builder_sets_policy(
    #[case] required: bool,
    #[case] expected: SourceAppPolicy,
) {
    let config = Config::default().with_required_source_app(required);
    assert_eq!(config.source_app_policy(), expected);
    assert_eq!(config.require_source_app(), required);
}

#[test]
fn builder_sets_fields() {
    let config = Config::default()
        .with_source_app("Notes")
        .with_scheme_query(SchemeQueryPolicy::Disabled)
        .with_expected_scheme("notes")
        .with_required_source_app(true)
        .with_log_filter("debug");
    assert_eq!(config.source_app(), Some("Notes"));
    assert!(!config.scheme_query().is_enabled());
    assert_eq!(config.expected_scheme(), Some("notes"));
    assert!(config.require_source_app());
    assert_eq!(config.log_filter(), "debug");
    assert!(config.validate().is_ok());
}

#[rstest]
#[case::blank_source(Config::default().with_source_app("  "), ConfigError::EmptySourceApp)]
#[case::bad_scheme(
    Config::default().with_expected_scheme("1notes"),
    ConfigError::InvalidExpectedScheme { scheme: "1notes".into() }
)]
#[case::blank_filter(Config::default().with_log_filter(""), ConfigError::EmptyLogFilter)]
fn validate_rejects_unusable_values(#[case] config: Config, #[case] expected: ConfigError) {
    assert_eq!(config.validate().expect_err("validation fails"), expected);
}
