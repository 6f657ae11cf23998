use std::{fs, path::Path};

use anyhow::Context;
use client_core::{encoding::DEFAULT_SAMPLE_COUNT, INPUTS_STORAGE_KEY};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub database_url: String,
    pub storage_key: String,
    pub curve_samples: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".into(),
            database_url: "sqlite://./data/dashboard.db".into(),
            storage_key: INPUTS_STORAGE_KEY.into(),
            curve_samples: DEFAULT_SAMPLE_COUNT,
        }
    }
}

/// Keys accepted in `dashboard.toml`; all optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_url: Option<String>,
    database_url: Option<String>,
    storage_key: Option<String>,
    curve_samples: Option<usize>,
}

/// Defaults, then the config file if it exists, then the process environment.
pub fn load_settings(config_path: &Path) -> anyhow::Result<Settings> {
    let file = match fs::read_to_string(config_path) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config '{}'", config_path.display()))
        }
    };
    settings_from(file.as_deref(), |key| std::env::var(key).ok())
        .with_context(|| format!("invalid config '{}'", config_path.display()))
}

pub fn settings_from(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file_cfg.api_url {
            settings.api_url = v;
        }
        if let Some(v) = file_cfg.database_url {
            settings.database_url = v;
        }
        if let Some(v) = file_cfg.storage_key {
            settings.storage_key = v;
        }
        if let Some(v) = file_cfg.curve_samples {
            settings.curve_samples = v;
        }
    }

    if let Some(v) = env("API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = env("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Some(v) = env("APP__STORAGE_KEY") {
        settings.storage_key = v;
    }

    if let Some(v) = env("APP__CURVE_SAMPLES") {
        if let Ok(parsed) = v.trim().parse::<usize>() {
            settings.curve_samples = parsed;
        }
    }

    Ok(settings)
}

/// Turns plain paths and `sqlite:` shorthands into `sqlite://` urls.
pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:") || raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        return format!("sqlite://{}", path.replace('\\', "/"));
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
