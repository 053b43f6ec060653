use std::collections::HashMap;
use std::time::Duration;

use homework_core::{ConfigError, Credentials, InitialCursor, PollConfig};

fn lookup_in(vars: HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<String> {
    move |name| vars.get(name).map(|value| value.to_string())
}

#[test]
fn credentials_load_when_all_present() {
    let vars = HashMap::from([
        ("PRACTICUM_TOKEN", "practicum"),
        ("TELEGRAM_TOKEN", "telegram"),
        ("TELEGRAM_CHAT_ID", "42"),
    ]);
    let credentials = Credentials::from_lookup(lookup_in(vars)).unwrap();
    assert_eq!(credentials.practicum_token, "practicum");
    assert_eq!(credentials.telegram_chat_id, "42");

    let debug = format!("{credentials:?}");
    assert!(!debug.contains("practicum\""));
    assert!(!debug.contains("telegram\""));
}

#[test]
fn credentials_report_every_missing_variable() {
    let vars = HashMap::from([("TELEGRAM_TOKEN", "telegram"), ("TELEGRAM_CHAT_ID", "  ")]);
    match Credentials::from_lookup(lookup_in(vars)) {
        Err(ConfigError::MissingVariables(missing)) => {
            assert_eq!(missing, vec!["PRACTICUM_TOKEN", "TELEGRAM_CHAT_ID"]);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn poll_config_reads_partial_file_with_defaults() {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "homework_bot_config_{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.json");
    std::fs::write(&path, br#"{"retry_period_secs": 60, "initial_cursor": "now"}"#).unwrap();

    let config = PollConfig::from_file(&path);
    assert_eq!(config.retry_period(), Duration::from_secs(60));
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
    assert_eq!(config.initial_cursor, InitialCursor::Now);
    assert_eq!(config.endpoint, PollConfig::default().endpoint);

    let _ = std::fs::remove_dir_all(&dir);
}

fn write_config(name: &str, body: &[u8]) -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "homework_bot_{name}_{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.json");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn poll_config_replaces_zero_periods_with_defaults() {
    let path = write_config("zero", br#"{"retry_period_secs": 0, "request_timeout_secs": 0}"#);

    let config = PollConfig::from_file(&path);
    assert_eq!(config.retry_period(), Duration::from_secs(600));
    assert_eq!(config.request_timeout(), Duration::from_secs(30));

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn poll_config_falls_back_to_defaults() {
    let config = PollConfig::from_file("/nonexistent/homework-bot/config.json");
    assert_eq!(config.retry_period(), Duration::from_secs(600));
    assert_eq!(config.initial_cursor, InitialCursor::Epoch);
    assert_eq!(InitialCursor::Epoch.timestamp(), 0);
    assert!(InitialCursor::Now.timestamp() > 0);
}
