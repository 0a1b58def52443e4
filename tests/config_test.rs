use apisim::cli::Cli;
use apisim::config::{Settings, StorageBackend};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_missing_file_yields_defaults() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;

    let settings = Settings::from_file(temp_dir.path().join("apisim.toml"))?;
    assert_eq!(settings, Settings::default());
    Ok(())
}

#[test]
fn test_load_partial_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("apisim.toml");
    fs::write(
        &path,
        r#"
[api]
prefix = "/mock"

[storage]
backend = "memory"
"#,
    )?;

    let settings = Settings::from_file(&path)?;
    assert_eq!(settings.api.prefix, "/mock");
    assert_eq!(settings.storage.backend, StorageBackend::Memory);
    assert_eq!(settings.storage.path, PathBuf::from(".apisim"));
    assert_eq!(settings.storage.key, "api-documentation");
    Ok(())
}

#[test]
fn test_cli_overrides_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("apisim.toml");
    fs::write(&path, "[api]\nprefix = \"/from-file\"\n")?;

    let cli = Cli::parse_from([
        "apisim".to_string(),
        "--config".to_string(),
        path.display().to_string(),
        "--prefix".to_string(),
        "/from-cli".to_string(),
        "--storage-path".to_string(),
        "data".to_string(),
        "routes".to_string(),
    ]);

    let settings = Settings::new_with_cli(&cli)?;
    assert_eq!(settings.api.prefix, "/from-cli");
    assert_eq!(settings.storage.path, PathBuf::from("data"));
    Ok(())
}

#[test]
fn test_invalid_settings_are_rejected() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("apisim.toml");
    fs::write(&path, "[api]\nprefix = \"no-slash\"\n\n[storage]\nkey = \"a/b\"\n")?;

    let err = Settings::from_file(&path).unwrap_err().to_string();
    assert!(err.starts_with("Configuration validation failed"));
    assert!(err.contains("api.prefix"));
    assert!(err.contains("storage.key"));
    Ok(())
}

#[test]
fn test_save_then_reload() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("apisim.toml");

    let mut settings = Settings::default();
    settings.api.prefix = "/api/v2".to_string();
    settings.storage.key = "shop".to_string();
    settings.save_to(&path)?;

    assert_eq!(Settings::from_file(&path)?, settings);
    Ok(())
}
