use super::*;
use secrecy::ExposeSecret;

#[test]
fn test_defaults_without_file() {
    let config = Config::default();
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.bind_addr(), "127.0.0.1:5000");
    assert_eq!(config.render.indent, 2);
    assert!(!config.render.mono);
    assert_eq!(config.security.csrf_time_limit_secs, 3600);
}

#[test]
fn test_partial_toml_fills_defaults() {
    let config = Config::from_toml_str(
        r#"
        [server]
        port = 8080

        [render]
        mono = true
        "#,
    )
    .unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.host, "127.0.0.1");
    assert!(config.render.mono);
    assert_eq!(config.render.indent, 2);
}

#[test]
fn test_invalid_values_rejected() {
    let err = Config::from_toml_str("[server]\nmax_input_bytes = 0\n").unwrap_err();
    assert!(err.to_string().contains("max_input_bytes"));

    let err = Config::from_toml_str("[render]\nindent = 40\n").unwrap_err();
    assert!(err.to_string().contains("indent"));
}

#[test]
fn test_csrf_time_limit_is_bounded() {
    let err = Config::from_toml_str("[security]\ncsrf_time_limit_secs = 0\n").unwrap_err();
    assert!(err.to_string().contains("csrf_time_limit_secs"));

    let err = Config::from_toml_str("[security]\ncsrf_time_limit_secs = 9223372036854775807\n")
        .unwrap_err();
    assert!(matches!(err, JelloWebError::Config(_)));

    let week = format!("[security]\ncsrf_time_limit_secs = {}\n", MAX_CSRF_TIME_LIMIT_SECS);
    let config = Config::from_toml_str(&week).unwrap();
    assert_eq!(config.security.csrf_time_limit_secs, 604_800);
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let err = Config::from_toml_str("[server\nport = 1").unwrap_err();
    assert!(matches!(err, JelloWebError::Toml(_)));
}

#[test]
fn test_development_key_fallback() {
    let (key, source) = Config::default().resolve_secret_with(None);
    assert_eq!(source, KeySource::Development);
    assert_eq!(key.expose_secret(), DEVELOPMENT_KEY);
}

#[test]
fn test_app_key_wins_over_file_key() {
    let mut config = Config::default();
    config.security.secret_key = Some("from-file".to_string());

    let (key, source) = config.resolve_secret_with(Some("from-env".to_string()));
    assert_eq!(source, KeySource::Production);
    assert_eq!(key.expose_secret(), "from-env");

    let (key, source) = config.resolve_secret_with(Some(String::new()));
    assert_eq!(source, KeySource::Production);
    assert_eq!(key.expose_secret(), "from-file");
}

#[test]
fn test_key_source_startup_line() {
    let (_, source) = Config::default().resolve_secret_with(None);
    assert_eq!(source.describe(), "Using development key (set APP_KEY in production)");

    let (_, source) = Config::default().resolve_secret_with(Some("k".to_string()));
    assert_eq!(source.describe(), "Using production key");
}
