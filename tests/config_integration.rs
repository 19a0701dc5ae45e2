use chat_widget::config::AppConfig;
use chat_widget::widget::ContentPolicy;
use serial_test::serial;
use std::env;
use std::fs;
use std::time::Duration;

const BIN: &str = "chat-widget";

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        for var in [
            "CHAT__SERVER__PORT",
            "CHAT__SERVER__ALLOWED_ORIGINS",
            "CHAT__RESPONDER__TIMEOUT_SECS",
            "CHAT__WIDGET__CONTENT_POLICY",
            "CONFIG_FILE",
            "PORT",
            "RESPONDER_URL",
            "CONTENT_POLICY",
            "LOG_JSON",
        ] {
            env::remove_var(var);
        }
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args([BIN]).expect("defaults should load");

    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert!(config.server.allowed_origins.is_empty());
    assert_eq!(
        config.responder.url.as_str(),
        "http://127.0.0.1:3000/api/chat"
    );
    assert_eq!(config.responder.timeout(), None);
    assert_eq!(config.widget.content_policy, ContentPolicy::Markup);
    assert_eq!(config.widget.session_idle(), Duration::from_secs(1800));
    assert!(config.directory.enabled);
    assert!(!config.log.json);
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("CHAT__SERVER__PORT", "9090");
        env::set_var("CHAT__RESPONDER__TIMEOUT_SECS", "15");
        env::set_var("CHAT__WIDGET__CONTENT_POLICY", "escape");
        env::set_var(
            "CHAT__SERVER__ALLOWED_ORIGINS",
            "http://localhost:5173,https://saude.example.org",
        );
    }

    let config = AppConfig::load_from_args([BIN]).expect("Failed to load config");
    clear_env_vars();

    assert_eq!(config.server.port, 9090);
    assert_eq!(config.responder.timeout(), Some(Duration::from_secs(15)));
    assert_eq!(config.widget.content_policy, ContentPolicy::Escape);
    assert_eq!(
        config.server.allowed_origins,
        vec!["http://localhost:5173", "https://saude.example.org"]
    );
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join("widget.yaml");
    fs::write(
        &file_path,
        r#"
server:
  port: 7070
responder:
  url: "http://responder.internal:5000/api/chat"
"#,
    )
    .expect("Failed to write temp config");

    let path = file_path.to_string_lossy().to_string();
    let config = AppConfig::load_from_args([BIN, "--config", path.as_str()])
        .expect("Failed to load config from file");

    assert_eq!(config.server.port, 7070);
    assert_eq!(config.responder.url.host_str(), Some("responder.internal"));
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args([BIN, "--config", "does-not-exist.yaml"]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_cli_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("CHAT__SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args([
        BIN,
        "--port",
        "4000",
        "--responder-url",
        "http://10.0.0.5:8000/api/chat",
        "--content-policy",
        "escape",
        "--log-json",
        "true",
    ])
    .expect("Failed to load config");
    clear_env_vars();

    assert_eq!(config.server.port, 4000);
    assert_eq!(config.responder.url.as_str(), "http://10.0.0.5:8000/api/chat");
    assert_eq!(config.widget.content_policy, ContentPolicy::Escape);
    assert!(config.log.json);
}

#[test]
#[serial]
fn test_invalid_responder_url_is_rejected() {
    clear_env_vars();

    let result = AppConfig::load_from_args([BIN, "--responder-url", "not a url"]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_cwd_config_fallback() {
    clear_env_vars();

    let cwd_path = "config.yaml";
    fs::write(cwd_path, "server:\n  port: 6060\n").expect("Failed to write ./config.yaml");

    let config = AppConfig::load_from_args([BIN]);
    fs::remove_file(cwd_path).expect("Failed to remove ./config.yaml");

    assert_eq!(config.expect("Failed to load config").server.port, 6060);
}
