// Configuration loader
// Reads ~/.wren/config.toml; a missing file means defaults.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::Settings;

pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(".wren").join("config.toml"))
}

pub fn load_settings() -> Result<Settings> {
    let path = config_path()?;
    load_settings_from(&path)
}

pub fn load_settings_from(path: &Path) -> Result<Settings> {
    let settings = if path.exists() {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str::<Settings>(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?
    } else {
        Settings::default()
    };
    settings
        .validate()
        .context("configuration validation failed")?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join("config.toml")).unwrap();
        assert!(settings.discovery.enabled);
        assert_eq!(settings.discovery.timeout_secs, 20);
        assert!(!settings.session.anonymous);
    }

    #[test]
    fn test_full_file_parses() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[discovery]
enabled = false
timeout_secs = 5

[session]
anonymous = true
allow_configure = false

[location]
latitude = 52.52
longitude = 13.405
display = "Berlin"
"#,
        )
        .unwrap();

        let settings = load_settings_from(&path).unwrap();
        assert!(!settings.discovery.enabled);
        assert_eq!(settings.discovery.timeout_secs, 5);
        assert!(settings.session.anonymous);
        assert!(!settings.session.allow_configure);
        let location = settings.location.unwrap();
        assert_eq!(location.latitude, 52.52);
        assert_eq!(location.display.as_deref(), Some("Berlin"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[session]\nanonymous = true\n").unwrap();

        let settings = load_settings_from(&path).unwrap();
        assert!(settings.session.anonymous);
        assert!(settings.session.allow_configure);
        assert!(settings.discovery.enabled);
        assert_eq!(settings.discovery.timeout_secs, 20);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[discovery]\ntimeout_secs = 0\n").unwrap();
        assert!(load_settings_from(&path).is_err());
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "not toml [[").unwrap();
        assert!(load_settings_from(&path).is_err());
    }
}
