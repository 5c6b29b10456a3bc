use std::{fs, path::Path};

use anyhow::{bail, Context};
use client_core::DEFAULT_API_BASE_URL;
use serde::Deserialize;
use url::Url;

pub const SETTINGS_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    log_filter: Option<String>,
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Layers defaults, the optional settings file, then environment overrides.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?;
        if let Some(v) = file_cfg.api_base_url {
            settings.api_base_url = v;
        }
        if let Some(v) = file_cfg.log_filter {
            settings.log_filter = v;
        }
    }

    if let Some(v) = env("TRACKING_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    settings.api_base_url = normalize_api_base_url(&settings.api_base_url)?;
    Ok(settings)
}

pub fn normalize_api_base_url(raw_api_base_url: &str) -> anyhow::Result<String> {
    let raw_api_base_url = raw_api_base_url.trim();

    if raw_api_base_url.is_empty() {
        return Ok(DEFAULT_API_BASE_URL.to_string());
    }

    let with_scheme = if raw_api_base_url.contains("://") {
        raw_api_base_url.to_string()
    } else {
        format!("http://{raw_api_base_url}")
    };

    let parsed = Url::parse(&with_scheme)
        .with_context(|| format!("invalid api base url '{raw_api_base_url}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!(
            "unsupported scheme '{}' in api base url '{raw_api_base_url}'",
            parsed.scheme()
        );
    }

    Ok(with_scheme.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
