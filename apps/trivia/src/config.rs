use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            log_filter: "warn".into(),
        }
    }
}

/// Defaults, then the TOML file at `path` if it exists, then environment.
pub fn load_settings(path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        apply_file_settings(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("TRIVIA_SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Ok(v) = std::env::var("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    settings
}

fn apply_file_settings(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("server_url") {
            settings.server_url = v.clone();
        }
        if let Some(v) = file_cfg.get("log_filter") {
            settings.log_filter = v.clone();
        }
    }
}

pub fn normalize_server_url(raw_server_url: &str) -> anyhow::Result<String> {
    let raw_server_url = raw_server_url.trim();

    if raw_server_url.is_empty() {
        return Ok(Settings::default().server_url);
    }

    let candidate = if raw_server_url.contains("://") {
        raw_server_url.to_string()
    } else {
        format!("http://{raw_server_url}")
    };

    let url = Url::parse(&candidate)
        .with_context(|| format!("invalid server url '{raw_server_url}'"))?;
    match url.scheme() {
        "http" | "https" => {}
        other => bail!("unsupported scheme '{other}' in server url '{raw_server_url}'"),
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}
