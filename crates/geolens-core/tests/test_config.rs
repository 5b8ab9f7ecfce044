mod common;

use geolens_core::config::AppConfig;
use geolens_core::consts::DEFAULT_ENDPOINT;
use geolens_core::error::GeolensError;

#[test]
fn test_default_config_values() {
    let config = AppConfig::default();
    assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.viewport.padding_px, 20.0);
    assert_eq!(config.viewport.fallback_zoom, 2.0);
    assert_eq!(config.upload.tick_ms, 500);
    assert_eq!(config.upload.step, 10);
    assert_eq!(config.upload.cap, 90);
    assert!((config.overlay.opacity - 0.7).abs() < 1e-6);
    assert!(config.validate().is_ok());
}

#[test]
fn test_default_config_toml_round_trip() {
    let config = AppConfig::default();
    let text = config.to_toml().unwrap();
    assert!(text.contains("[upload]"));
    assert!(text.contains("[viewport]"));
    assert_eq!(AppConfig::from_toml(&text).unwrap(), config);
}

#[test]
fn test_partial_config_keeps_defaults() {
    let config = AppConfig::from_toml(
        r#"
endpoint = "https://analysis.example.org/upload"

[upload]
cap = 80
"#,
    )
    .unwrap();
    assert_eq!(config.endpoint, "https://analysis.example.org/upload");
    assert_eq!(config.upload.cap, 80);
    assert_eq!(config.upload.step, 10);
    assert_eq!(config.overlay, Default::default());
}

#[test]
fn test_empty_config_is_default() {
    assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
}

#[test]
fn test_invalid_values_are_rejected() {
    for text in [
        "endpoint = \"ftp://host/upload\"",
        "[overlay]\nopacity = 1.5",
        "[upload]\ncap = 100",
        "[upload]\ntick_ms = 0",
        "[viewport]\npadding_px = -1.0",
    ] {
        assert!(
            matches!(AppConfig::from_toml(text), Err(GeolensError::Config(_))),
            "{text}"
        );
    }
}

#[test]
fn test_malformed_toml_is_config_error() {
    assert!(matches!(
        AppConfig::from_toml("endpoint = "),
        Err(GeolensError::Config(_))
    ));
}

#[test]
fn test_load_from_file() {
    let (_dir, path) = common::write_temp("geolens.toml", b"[overlay]\nresolution = 512\n");
    let config = AppConfig::load(&path).unwrap();
    assert_eq!(config.overlay.resolution, 512);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let err = AppConfig::load(std::path::Path::new("/nonexistent/geolens.toml")).unwrap_err();
    assert!(matches!(err, GeolensError::Io(_)));
}
