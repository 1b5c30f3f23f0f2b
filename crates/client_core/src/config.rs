use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub cache_database_url: String,
    pub event_buffer: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://inc-calculation-backend.vercel.app/api".into(),
            cache_database_url: "sqlite://./data/client_cache.sqlite3".into(),
            event_buffer: 64,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    cache_database_url: Option<String>,
    event_buffer: Option<usize>,
}

/// Defaults, then `client.toml` (or `path`), then environment variables.
pub fn load_settings(path: Option<&Path>) -> Result<ClientSettings> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));
    let file = match fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    };
    resolve_settings(file.as_deref(), |key| std::env::var(key).ok())
}

pub(crate) fn resolve_settings<F>(file: Option<&str>, env: F) -> Result<ClientSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = ClientSettings::default();

    if let Some(raw) = file {
        let file_cfg: FileSettings = toml::from_str(raw).context("invalid settings file")?;
        if let Some(v) = file_cfg.api_base_url {
            settings.api_base_url = v;
        }
        if let Some(v) = file_cfg.cache_database_url {
            settings.cache_database_url = v;
        }
        if let Some(v) = file_cfg.event_buffer {
            settings.event_buffer = v;
        }
    }

    if let Some(v) = env("API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("CACHE_DATABASE_URL") {
        settings.cache_database_url = v;
    }
    if let Some(v) = env("APP__CACHE_DATABASE_URL") {
        settings.cache_database_url = v;
    }

    if let Some(v) = env("APP__EVENT_BUFFER") {
        settings.event_buffer = v
            .parse()
            .with_context(|| format!("APP__EVENT_BUFFER must be a positive integer, got '{v}'"))?;
    }

    validate_base_url(&settings.api_base_url)?;
    Ok(settings)
}

pub fn validate_base_url(raw: &str) -> Result<()> {
    let url = Url::parse(raw).with_context(|| format!("invalid api base url '{raw}'"))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => anyhow::bail!("api base url must use http or https, got '{other}'"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
