use super::*;
use clap::Parser;
use std::io::Write;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("transmission-rpc").chain(args.iter().copied())).unwrap()
}

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn defaults_without_file_or_flags() {
    let settings = resolve(&parse(&["session-get", "--address", DEFAULT_ADDRESS])).unwrap();
    assert_eq!(settings.session, SessionConfig::new(DEFAULT_ADDRESS));
    assert_eq!(settings.transport.timeout, None);
}

#[test]
fn flags_set_connection_settings() {
    let cli = parse(&[
        "torrent-get",
        r#"{"ids":[1]}"#,
        "--address",
        "http://nas:9091",
        "--endpoint",
        "/rpc",
        "--tries",
        "5",
        "--timeout-secs",
        "10",
    ]);
    let settings = resolve(&cli).unwrap();

    assert_eq!(cli.arguments, r#"{"ids":[1]}"#);
    assert_eq!(settings.session.url(), "http://nas:9091/rpc");
    assert_eq!(settings.session.tries, 5);
    assert_eq!(settings.transport.timeout, Some(Duration::from_secs(10)));
}

#[test]
fn username_enables_credentials() {
    let cli = parse(&["session-get", "--address", "http://h:1", "-u", "admin", "-p", "secret"]);
    let settings = resolve(&cli).unwrap();
    assert_eq!(settings.session.credentials, Some(Credentials::new("admin", "secret")));
}

#[test]
fn file_values_are_loaded() {
    let file = config_file(
        r#"
address = "http://nas.local:9091"
tries = 4
timeout_secs = 30

[credentials]
login = "admin"
password = "secret"
"#,
    );
    let path = file.path().to_str().unwrap();
    let settings = resolve(&parse(&["session-get", "--config", path])).unwrap();

    assert_eq!(settings.session.address, "http://nas.local:9091");
    assert_eq!(settings.session.endpoint, "/transmission/rpc");
    assert_eq!(settings.session.tries, 4);
    assert_eq!(settings.session.credentials, Some(Credentials::new("admin", "secret")));
    assert_eq!(settings.transport.timeout, Some(Duration::from_secs(30)));
}

#[test]
fn flags_override_file_values() {
    let file = config_file("address = \"http://nas.local:9091\"\ntries = 4\n");
    let path = file.path().to_str().unwrap();
    let settings =
        resolve(&parse(&["session-get", "--config", path, "--address", "http://other:1", "--tries", "2"])).unwrap();

    assert_eq!(settings.session.address, "http://other:1");
    assert_eq!(settings.session.tries, 2);
}

#[test]
fn missing_file_is_an_error() {
    let error = resolve(&parse(&["session-get", "--config", "/nonexistent/transmission-rpc.toml"])).unwrap_err();
    assert!(error.to_string().contains("failed to read config file"));
}

#[test]
fn zero_tries_is_rejected() {
    let error = resolve(&parse(&["session-get", "--address", "http://h:1", "--tries", "0"])).unwrap_err();
    assert!(error.to_string().contains("invalid connection settings"));
}

#[test]
fn password_without_username_is_rejected() {
    let cli = Cli {
        username: None,
        password: Some("secret".to_string()),
        ..parse(&["session-get", "--address", "http://h:1"])
    };
    assert!(resolve(&cli).is_err());
}
