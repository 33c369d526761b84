use super::*;

#[test]
fn new_uses_defaults() {
    let config = SessionConfig::new("http://localhost:9091");
    assert_eq!(config.endpoint, "/transmission/rpc");
    assert_eq!(config.tries, 3);
    assert!(config.credentials.is_none());
    assert_eq!(config.url(), "http://localhost:9091/transmission/rpc");
}

#[test]
fn endpoint_can_be_overridden() {
    let config = SessionConfig::new("http://nas:9091").with_endpoint("/rpc");
    assert_eq!(config.url(), "http://nas:9091/rpc");
}

#[test]
fn validate_rejects_empty_address() {
    assert_eq!(SessionConfig::new("  ").validate(), Err(ConfigError::EmptyAddress));
}

#[test]
fn validate_rejects_zero_tries() {
    let config = SessionConfig::new("http://localhost:9091").with_tries(0);
    assert_eq!(config.validate(), Err(ConfigError::ZeroTries));
}

#[test]
fn deserialises_with_only_address() {
    let config: SessionConfig = serde_json::from_str(r#"{ "address": "http://localhost:9091" }"#).unwrap();
    assert_eq!(config, SessionConfig::new("http://localhost:9091"));
}

#[test]
fn deserialises_credentials() {
    let config: SessionConfig = serde_json::from_str(
        r#"{ "address": "http://h:1", "tries": 5, "credentials": { "login": "admin", "password": "hunter2" } }"#,
    )
    .unwrap();
    assert_eq!(config.tries, 5);
    assert_eq!(config.credentials, Some(Credentials::new("admin", "hunter2")));
}

#[test]
fn credentials_debug_redacts_password() {
    let rendered = format!("{:?}", Credentials::new("admin", "hunter2"));
    assert!(rendered.contains("admin"));
    assert!(!rendered.contains("hunter2"));
}
